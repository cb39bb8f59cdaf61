//! Procedural triangle-strip generation for the trail ribbon.
//!
//! [`build_strip`] is a pure function of the current point buffer snapshot
//! and the trail settings; it has no state across frames. The host writes
//! the resulting stream into its mesh asset and the stream is dropped.

use bevy::asset::RenderAssetUsages;
use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bytemuck::{Pod, Zeroable};

use crate::point_buffer::PointBuffer;
use crate::settings::TrailSettings;

/// Interleaved vertex as emitted per strip corner. `repr(C)` + `Pod` so the
/// whole stream can be viewed as raw bytes for custom upload paths.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// The ribbon faces up; both edge vertices share this normal.
const RIBBON_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Transient per-frame output of [`build_strip`]: one continuous triangle
/// strip, two vertices per trail point, outer edge first.
#[derive(Debug, Clone, Default)]
pub struct VertexStream {
    vertices: Vec<RibbonVertex>,
}

impl VertexStream {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Triangles described by the strip: `2 * (point_count - 1)`.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    /// Raw byte view of the interleaved vertices.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Split the stream into Bevy vertex attribute arrays and overwrite the
    /// given mesh with them. Writing an empty stream blanks the ribbon.
    pub fn write_mesh(&self, mesh: &mut Mesh) {
        let mut positions = Vec::with_capacity(self.vertices.len());
        let mut normals = Vec::with_capacity(self.vertices.len());
        let mut uvs = Vec::with_capacity(self.vertices.len());
        let mut colors = Vec::with_capacity(self.vertices.len());
        for vertex in &self.vertices {
            positions.push(vertex.position);
            normals.push(vertex.normal);
            uvs.push(vertex.uv);
            colors.push(vertex.color);
        }
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    }

    /// Build a fresh triangle-strip mesh from the stream. Kept readable from
    /// the main world so tests and CPU-side consumers can inspect attributes.
    pub fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleStrip,
            RenderAssetUsages::default(),
        );
        self.write_mesh(&mut mesh);
        mesh
    }
}

/// Turn the current buffer snapshot into the tapered, coloured, UV-mapped
/// strip. `to_local` is the host-supplied world-to-node transform applied to
/// every emitted position.
///
/// Fewer than two points yield an empty stream; a single point has no
/// tangent/width pair to span a strip segment with.
pub fn build_strip(
    buffer: &PointBuffer,
    settings: &TrailSettings,
    to_local: &Affine3A,
) -> VertexStream {
    let count = buffer.len();
    if count < 2 {
        return VertexStream::default();
    }

    let start_color = Vec4::from_array(settings.start_color);
    let end_color = Vec4::from_array(settings.end_color);

    let mut vertices = Vec::with_capacity(count * 2);
    for (i, point) in buffer.points().iter().enumerate() {
        // Normalized position along the strip: head (oldest) 0, tail 1.
        let t = i as f32 / (count - 1) as f32;

        let color = start_color.lerp(end_color, 1.0 - t).to_array();
        // 1 - t stays in [0, 1], keeping the eased base non-negative.
        let width =
            point.width_outer - (1.0 - t).powf(settings.scale_acceleration) * point.width_span;

        let (u0, u1) = if settings.scale_texture {
            // Tile with travel distance so the texture does not stretch as
            // the strip grows or shrinks.
            (
                settings.motion_delta * i as f32,
                settings.motion_delta * (i + 1) as f32,
            )
        } else {
            (1.0 / count as f32, t)
        };

        // Outer edge before inner edge; swapping them flips the winding.
        vertices.push(RibbonVertex {
            position: to_local.transform_point3(point.position + width).to_array(),
            normal: RIBBON_NORMAL,
            uv: [u0, 0.0],
            color,
        });
        vertices.push(RibbonVertex {
            position: to_local.transform_point3(point.position - width).to_array(),
            normal: RIBBON_NORMAL,
            uv: [u1, 1.0],
            color,
        });
    }

    VertexStream { vertices }
}
