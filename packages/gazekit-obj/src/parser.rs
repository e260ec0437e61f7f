use crate::error::ObjError;
use gazekit_core::{Geometry, MeshWidget};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::path::Path;

/// One `v/vt/vn` reference of a face, resolved to zero-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// Parsed OBJ data with faces already triangulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<[FaceVertex; 3]>,
}

impl ObjModel {
    /// Builds a geometry payload with one vertex per unique reference.
    /// Texcoords and normals are included only when every reference has them.
    pub fn to_geometry(&self) -> Result<Geometry, ObjError> {
        let mut lookup: FxHashMap<FaceVertex, u16> = FxHashMap::default();
        let mut unique: Vec<FaceVertex> = Vec::new();
        let mut indices = Vec::with_capacity(self.triangles.len() * 3);

        for corner in self.triangles.iter().flatten() {
            let index = match lookup.get(corner) {
                Some(&index) => index,
                None => {
                    let index = u16::try_from(unique.len()).map_err(|_| ObjError::TooManyVertices)?;
                    lookup.insert(*corner, index);
                    unique.push(*corner);
                    index
                }
            };
            indices.push(index);
        }

        let positions = unique.iter().map(|v| self.positions[v.position]).collect();
        let mut geometry = Geometry::new(positions, indices);

        if !unique.is_empty() && unique.iter().all(|v| v.texcoord.is_some()) {
            let texcoords = unique
                .iter()
                .filter_map(|v| v.texcoord)
                .map(|i| self.texcoords[i])
                .collect();
            geometry = geometry.with_texcoords(texcoords);
        }
        if !unique.is_empty() && unique.iter().all(|v| v.normal.is_some()) {
            let normals = unique.iter().filter_map(|v| v.normal).map(|i| self.normals[i]).collect();
            geometry = geometry.with_normals(normals);
        }

        geometry.validate()?;
        Ok(geometry)
    }
}

/// Parses OBJ text. Unsupported statements (`o`, `g`, `s`, `usemtl`, ...) are skipped.
pub fn parse(source: &str) -> Result<ObjModel, ObjError> {
    let mut model = ObjModel::default();
    let mut skipped = 0usize;

    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = content.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line, "v")?;
                model.positions.push([x, y, z]);
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut tokens, line, "vt")?;
                model.texcoords.push([u, v]);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line, "vn")?;
                model.normals.push([x, y, z]);
            }
            "f" => {
                let corners: SmallVec<[FaceVertex; 4]> = tokens
                    .map(|token| parse_reference(token, line, &model))
                    .collect::<Result<_, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::Parse {
                        line,
                        message: format!("face needs at least 3 vertices, found {}", corners.len()),
                    });
                }
                for i in 1..corners.len() - 1 {
                    model.triangles.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => skipped += 1,
        }
    }

    tracing::debug!(
        positions = model.positions.len(),
        triangles = model.triangles.len(),
        skipped,
        "obj parsed"
    );
    Ok(model)
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    keyword: &str,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0f32; N];
    for value in values.iter_mut() {
        let token = tokens.next().ok_or_else(|| ObjError::Parse {
            line,
            message: format!("`{keyword}` needs {N} components"),
        })?;
        *value = token.parse().map_err(|_| ObjError::Parse {
            line,
            message: format!("invalid number `{token}`"),
        })?;
    }
    Ok(values)
}

fn parse_reference(token: &str, line: usize, model: &ObjModel) -> Result<FaceVertex, ObjError> {
    let mut parts = token.split('/');
    let position = parts.next().unwrap_or("");
    let texcoord = parts.next().filter(|s| !s.is_empty());
    let normal = parts.next().filter(|s| !s.is_empty());

    Ok(FaceVertex {
        position: resolve(position, line, "position", model.positions.len())?,
        texcoord: texcoord
            .map(|t| resolve(t, line, "texcoord", model.texcoords.len()))
            .transpose()?,
        normal: normal
            .map(|n| resolve(n, line, "normal", model.normals.len()))
            .transpose()?,
    })
}

/// Converts a 1-based or negative relative OBJ index to a 0-based one.
fn resolve(token: &str, line: usize, kind: &'static str, available: usize) -> Result<usize, ObjError> {
    let index: i64 = token.parse().map_err(|_| ObjError::Parse {
        line,
        message: format!("invalid {kind} index `{token}`"),
    })?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => available as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= available as i64 {
        return Err(ObjError::BadReference {
            line,
            kind,
            index,
            available,
        });
    }
    Ok(resolved as usize)
}

pub fn load(path: impl AsRef<Path>) -> Result<ObjModel, ObjError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    parse(&source)
}

/// Parses OBJ text straight into a drawable widget.
pub fn mesh_widget(source: &str) -> Result<MeshWidget, ObjError> {
    let geometry = parse(source)?.to_geometry()?;
    Ok(MeshWidget::new(geometry))
}
