//! GLB decoding into a single flat triangle list.

use crate::error::{Result, SceneError};
use glam::{Mat3, Mat4, Vec3, Vec4};
use gltf::buffer::Source;
use gltf::mesh::Mode;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// A decoded model with node transforms baked into the vertices.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    min: Vec3,
    max: Vec3,
}

impl Model {
    /// Decode a binary glTF container. Only the embedded binary chunk is used
    /// as buffer storage.
    pub fn from_glb(bytes: &[u8]) -> Result<Model> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let blob = gltf.blob.as_deref();
        let document = &gltf.document;
        let mut model = Model::default();

        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    visit_node(&node, Mat4::IDENTITY, blob, &mut model)?;
                }
            }
            None => {
                log::warn!("[model] no scene in asset; using meshes without node transforms");
                for mesh in document.meshes() {
                    append_mesh(&mesh, Mat4::IDENTITY, blob, &mut model)?;
                }
            }
        }

        if model.indices.is_empty() {
            return Err(SceneError::EmptyModel);
        }
        model.compute_bounds();
        Ok(model)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds in model space.
    #[inline]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    fn compute_bounds(&mut self) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        self.min = min;
        self.max = max;
    }
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    blob: Option<&[u8]>,
    out: &mut Model,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, blob, out)?;
    }
    for child in node.children() {
        visit_node(&child, world, blob, out)?;
    }
    Ok(())
}

fn ensure_embedded(accessor: &gltf::Accessor, blob: Option<&[u8]>) -> Result<()> {
    if let Some(view) = accessor.view() {
        let buffer = view.buffer();
        if blob.is_none() || !matches!(buffer.source(), Source::Bin) {
            return Err(SceneError::MissingBuffer {
                index: buffer.index(),
            });
        }
    }
    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh,
    world: Mat4,
    blob: Option<&[u8]>,
    out: &mut Model,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    for prim in mesh.primitives() {
        if prim.mode() != Mode::Triangles {
            log::warn!("[model] skipping primitive with mode {:?}", prim.mode());
            continue;
        }
        for (_, accessor) in prim.attributes() {
            ensure_embedded(&accessor, blob)?;
        }
        if let Some(accessor) = prim.indices() {
            ensure_embedded(&accessor, blob)?;
        }

        let reader = prim.reader(|buffer| match buffer.source() {
            Source::Bin => blob,
            Source::Uri(_) => None,
        });
        let Some(positions) = reader.read_positions() else {
            log::warn!("[model] skipping primitive without positions");
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
        let count = positions.len();

        let mut indices: Vec<u32> = match reader.read_indices() {
            Some(read) => read.into_u32().collect(),
            None => (0..count as u32).collect(),
        };
        indices.truncate(indices.len() - indices.len() % 3);
        let before = indices.len();
        let mut triangles: Vec<u32> = Vec::with_capacity(before);
        for tri in indices.chunks_exact(3) {
            if tri.iter().all(|&i| (i as usize) < count) {
                triangles.extend_from_slice(tri);
            }
        }
        if triangles.len() != before {
            log::warn!(
                "[model] dropped {} triangles with out-of-range indices",
                (before - triangles.len()) / 3
            );
        }

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(read) => read.map(Vec3::from).collect(),
            None => generate_normals(&positions, &triangles),
        };
        let colors: Option<Vec<Vec4>> = reader
            .read_colors(0)
            .map(|read| read.into_rgba_f32().map(Vec4::from).collect());
        let base = Vec4::from(prim.material().pbr_metallic_roughness().base_color_factor());

        let offset = out.vertices.len() as u32;
        for (i, p) in positions.iter().enumerate() {
            let n = normals.get(i).copied().unwrap_or(Vec3::Y);
            let c = colors
                .as_ref()
                .and_then(|cs| cs.get(i).copied())
                .unwrap_or(Vec4::ONE);
            out.vertices.push(ModelVertex {
                position: world.transform_point3(*p).to_array(),
                normal: (normal_matrix * n).normalize_or_zero().to_array(),
                color: (base * c).to_array(),
            });
        }
        out.indices.extend(triangles.iter().map(|i| i + offset));
    }
    Ok(())
}

/// Area-weighted vertex normals for an indexed triangle list. Every index
/// must be in range for `positions`.
fn generate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO {
                Vec3::Y
            } else {
                n
            }
        })
        .collect()
}
