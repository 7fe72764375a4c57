mod cubemap;
mod gltf;
mod pending;

pub use cubemap::load_cubemap;
pub use gltf::load_model;
pub use pending::Pending;
