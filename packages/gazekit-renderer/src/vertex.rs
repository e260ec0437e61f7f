use bytemuck::{Pod, Zeroable};
use gazekit_core::{DrawCall, MeshBuffers};

/// Shader attribute locations.
pub const ATTRIBUTE_POSITION: u32 = 0;
pub const ATTRIBUTE_COLOR: u32 = 1;
pub const ATTRIBUTE_NORMAL: u32 = 2;
pub const ATTRIBUTE_TEXCOORD: u32 = 3;

/// One interleaved vertex as a GPU pipeline consumes it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// `(location, byte offset, component count)` per attribute.
    pub const ATTRIBUTES: [(u32, usize, usize); 4] = [
        (ATTRIBUTE_POSITION, 0, 3),
        (ATTRIBUTE_COLOR, 12, 4),
        (ATTRIBUTE_NORMAL, 28, 3),
        (ATTRIBUTE_TEXCOORD, 40, 2),
    ];
}

/// Per-draw uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub model_view_projection: [[f32; 4]; 4],
    /// xyz is the eye-space light position, w is padding.
    pub light_position: [f32; 4],
}

impl DrawUniforms {
    pub fn from_call(call: &DrawCall<'_>) -> Self {
        Self {
            model: call.model.to_cols_array_2d(),
            model_view: call.model_view.to_cols_array_2d(),
            model_view_projection: call.model_view_projection.to_cols_array_2d(),
            light_position: call.light_position.extend(1.0).to_array(),
        }
    }
}

/// Packs separate attribute arrays into one vertex stream.
pub fn interleave(mesh: &MeshBuffers) -> Vec<Vertex> {
    mesh.positions()
        .iter()
        .zip(mesh.colors())
        .zip(mesh.normals())
        .zip(mesh.texcoords())
        .map(|(((position, color), normal), texcoord)| Vertex {
            position: *position,
            color: *color,
            normal: *normal,
            texcoord: *texcoord,
        })
        .collect()
}

pub fn vertex_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazekit_core::Geometry;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 48);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 3 * 64 + 16);
    }

    #[test]
    fn test_interleave_quad() {
        let mesh = MeshBuffers::build(&Geometry::quad(2.0, 1.0)).unwrap();
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[3].position, [2.0, 1.0, 0.0]);
        assert_eq!(vertices[3].texcoord, [1.0, 0.0]);
        assert_eq!(vertex_bytes(&vertices).len(), 4 * Vertex::STRIDE);
    }
}
