use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::geometry::{Geometry, Vertex};
use crate::material::PhysicalMaterial;
use crate::math::Color;
use crate::mesh::{Mesh, Model, Transform};

/// Load every mesh of a glTF/GLB file into a [`Model`]
///
/// Node transforms are baked into the vertex data, so the returned model has
/// an identity root transform. Missing normals are computed from the faces.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut meshes = Vec::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file contains no scenes")?;
    for node in scene.nodes() {
        process_node(&node, &buffers, &Mat4::IDENTITY, &mut meshes)?;
    }

    if meshes.is_empty() {
        log::warn!("No geometry found in {:?}", path);
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let model = Model {
        name,
        transform: Transform::default(),
        meshes,
    };
    log::info!(
        "Loaded {} ({} meshes, {} triangles)",
        model.name,
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    meshes: &mut Vec<Mesh>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, meshes)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, meshes)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    meshes: &mut Vec<Mesh>,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();
    let mesh_name = mesh.name().unwrap_or("mesh");

    for (index, primitive) in mesh.primitives().enumerate() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping non-triangle primitive {} of {}", index, mesh_name);
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .with_context(|| format!("Primitive {} of {} has no positions", index, mesh_name))?
            .map(|p| transform.transform_point3(Vec3::from_array(p)))
            .collect();
        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let mut geometry = match reader.read_normals() {
            Some(normals) => Geometry {
                vertices: positions
                    .iter()
                    .zip(normals)
                    .map(|(&p, n)| {
                        let normal = (normal_matrix * Vec3::from_array(n)).normalize_or_zero();
                        Vertex::new(p, normal, Vec2::ZERO)
                    })
                    .collect(),
                indices,
            },
            None => Geometry::from_positions(&positions, indices),
        };

        // glTF puts v = 0 at the top of the image
        if let Some(uvs) = reader.read_tex_coords(0) {
            for (vertex, uv) in geometry.vertices.iter_mut().zip(uvs.into_f32()) {
                vertex.uv = Vec2::new(uv[0], 1.0 - uv[1]);
            }
        }

        meshes.push(Mesh::new(
            format!("{}#{}", mesh_name, index),
            geometry,
            convert_material(&primitive.material()),
        ));
    }

    Ok(())
}

fn convert_material(material: &gltf::Material) -> PhysicalMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, alpha] = pbr.base_color_factor();
    PhysicalMaterial {
        color: Color::new(r, g, b),
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        transparent: alpha < 1.0 || material.alpha_mode() == gltf::material::AlphaMode::Blend,
        transmission: 1.0 - alpha.clamp(0.0, 1.0),
        ..Default::default()
    }
}
