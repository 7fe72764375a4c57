use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::texture::{Cubemap, Image, CUBE_FACE_NAMES};

/// Load `right/left/top/bottom/front/back.jpg` from `dir`
pub fn load_cubemap(dir: impl AsRef<Path>) -> Result<Cubemap> {
    let dir = dir.as_ref();
    log::info!("Loading cubemap from {:?}", dir);

    let faces = CUBE_FACE_NAMES
        .iter()
        .map(|name| {
            let path = dir.join(format!("{}.jpg", name));
            let rgba = image::open(&path)
                .with_context(|| format!("Failed to read cubemap face {:?}", path))?
                .to_rgba8();
            let (width, height) = rgba.dimensions();
            Image::from_rgba(width, height, rgba.into_raw())
                .with_context(|| format!("Cubemap face {:?} is empty", path))
        })
        .collect::<Result<Vec<_>>>()?;

    let faces: [Image; 6] = faces
        .try_into()
        .map_err(|_| anyhow!("Expected six cubemap faces"))?;
    Ok(Cubemap::new(faces))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_names_the_face() {
        let err = load_cubemap("does/not/exist").err().map(|e| format!("{:#}", e));
        let message = err.unwrap_or_default();
        assert!(message.contains("right.jpg"), "{}", message);
    }
}
