use crate::error::GeometryError;
use glam::Vec3;

pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Raw vertex data for a widget. Per-vertex attribute arrays are optional
/// but, when present, must hold exactly one entry per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
}

impl Geometry {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u16>) -> Self {
        Self {
            positions,
            indices,
            ..Default::default()
        }
    }

    /// Builds positions from a flat `x, y, z, x, y, z, ...` array.
    pub fn from_flat_positions(flat: &[f32], indices: Vec<u16>) -> Result<Self, GeometryError> {
        if flat.len() % 3 != 0 {
            return Err(GeometryError::NotTriples(flat.len()));
        }
        let positions = flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self::new(positions, indices))
    }

    /// Axis-aligned quad spanning `[0, width] x [0, height]` in the z = 0 plane,
    /// facing +Z with the texture V axis flipped so images read upright.
    pub fn quad(width: f32, height: f32) -> Self {
        Self {
            positions: vec![
                [0.0, 0.0, 0.0],
                [0.0, height, 0.0],
                [width, 0.0, 0.0],
                [width, height, 0.0],
            ],
            indices: vec![0, 1, 2, 2, 1, 3],
            colors: Some(vec![DEFAULT_COLOR; 4]),
            normals: Some(vec![DEFAULT_NORMAL; 4]),
            texcoords: Some(vec![[0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0]]),
        }
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_texcoords(mut self, texcoords: Vec<[f32; 2]>) -> Self {
        self.texcoords = Some(texcoords);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.positions.len();
        if vertex_count == 0 {
            return Err(GeometryError::Empty);
        }
        if vertex_count > usize::from(u16::MAX) + 1 {
            return Err(GeometryError::TooManyVertices(vertex_count));
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }
        if let Some((slot, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| usize::from(index) >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                slot,
                index,
                vertex_count,
            });
        }
        check_len("colors", vertex_count, self.colors.as_ref().map(Vec::len))?;
        check_len("normals", vertex_count, self.normals.as_ref().map(Vec::len))?;
        check_len("texcoords", vertex_count, self.texcoords.as_ref().map(Vec::len))?;
        Ok(())
    }

    /// Bounding box of the positions as `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

fn check_len(attribute: &'static str, expected: usize, actual: Option<usize>) -> Result<(), GeometryError> {
    match actual {
        Some(actual) if actual != expected => Err(GeometryError::AttributeLength {
            attribute,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

/// Validated, fully populated buffers ready for a render backend. Missing
/// attributes are filled with black, +Z and zero texcoords.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<[f32; 3]>,
    indices: Vec<u16>,
    colors: Vec<[f32; 4]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
}

impl MeshBuffers {
    pub fn build(geometry: &Geometry) -> Result<Self, GeometryError> {
        geometry.validate()?;
        let n = geometry.vertex_count();
        Ok(Self {
            positions: geometry.positions.clone(),
            indices: geometry.indices.clone(),
            colors: geometry.colors.clone().unwrap_or_else(|| vec![DEFAULT_COLOR; n]),
            normals: geometry.normals.clone().unwrap_or_else(|| vec![DEFAULT_NORMAL; n]),
            texcoords: geometry.texcoords.clone().unwrap_or_else(|| vec![[0.0, 0.0]; n]),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[[f32; 2]] {
        &self.texcoords
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn texcoord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texcoords)
    }
}
