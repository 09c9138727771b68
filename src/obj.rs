use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec3;

/// Floats per interleaved vertex: `position.xyz` then `normal.xyz`.
pub const VERTEX_STRIDE: usize = 6;

/// Indexed triangle mesh with interleaved positions and normals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(VERTEX_STRIDE)
            .map(|chunk| Vec3::from_slice(&chunk[..3]))
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.positions().fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }

    /// Recenters the mesh on the origin and scales it uniformly so its
    /// largest extent spans `[-1, 1]`. Normals are unaffected by a uniform
    /// scale and are left alone.
    pub fn fit_to_unit_box(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let extent = (max - min).max_element();
        if extent <= f32::EPSILON {
            return;
        }
        let center = (min + max) * 0.5;
        let scale = 2.0 / extent;
        for chunk in self.vertices.chunks_exact_mut(VERTEX_STRIDE) {
            let p = (Vec3::from_slice(&chunk[..3]) - center) * scale;
            chunk[..3].copy_from_slice(&p.to_array());
        }
    }

    /// Unit cube centred on the origin, used when no model can be loaded.
    pub fn cube() -> Self {
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        ];
        let mut mesh = Self::default();
        for (normal, right, up) in faces {
            let base = mesh.vertex_count() as u32;
            for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + right * sx + up * sy) * 0.5;
                mesh.vertices.extend_from_slice(&p.to_array());
                mesh.vertices.extend_from_slice(&normal.to_array());
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }
}

/// Reads and parses an OBJ file from disk.
pub fn load_obj_file(path: &Path) -> Result<Mesh> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
    load_obj_from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses OBJ text. Polygons are fan-triangulated and smooth normals are
/// generated when the file does not supply them.
pub fn load_obj_from_str(data: &str) -> Result<Mesh> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut triangles: Vec<[Corner; 3]> = Vec::new();

    for (line_no, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        match tag {
            "v" => positions.push(
                parse_vec3(parts)
                    .with_context(|| format!("invalid vertex on line {}", line_no + 1))?,
            ),
            "vn" => normals.push(
                parse_vec3(parts)
                    .with_context(|| format!("invalid normal on line {}", line_no + 1))?,
            ),
            "f" => {
                let polygon = parse_face(parts, positions.len(), normals.len())
                    .with_context(|| format!("invalid face on line {}", line_no + 1))?;
                for i in 1..polygon.len() - 1 {
                    triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("OBJ file does not define any vertices");
    }

    let mut mesh = build_mesh(&positions, &normals, &triangles);
    if missing_normals(&mesh) {
        compute_normals(&mut mesh);
    }
    Ok(mesh)
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let mut next = || -> Result<f32> {
        Ok(parts
            .next()
            .ok_or_else(|| anyhow!("missing vector component"))?
            .parse::<f32>()?)
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

/// One face corner with zero-based position and normal indices, resolved
/// against the data declared before the face.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    normal: Option<usize>,
}

fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    position_count: usize,
    normal_count: usize,
) -> Result<Vec<Corner>> {
    let mut corners = Vec::new();
    for part in parts {
        let mut segments = part.split('/');
        let raw = segments
            .next()
            .ok_or_else(|| anyhow!("missing vertex index"))?
            .parse::<i32>()?;
        let position = resolve_index(raw, position_count)
            .ok_or_else(|| anyhow!("vertex index {raw} out of range"))?;
        // texture coordinates are not used by either pipeline
        let _texcoord = segments.next();
        let normal = match segments.next() {
            Some(s) if !s.is_empty() => resolve_index(s.parse::<i32>()?, normal_count),
            _ => None,
        };
        corners.push(Corner { position, normal });
    }
    if corners.len() < 3 {
        bail!("faces must reference at least 3 vertices");
    }
    Ok(corners)
}

/// Converts a 1-based or negative (relative to `len`) OBJ reference into a
/// zero-based index below `len`.
fn resolve_index(index: i32, len: usize) -> Option<usize> {
    if index > 0 {
        let zero_based = index as usize - 1;
        (zero_based < len).then_some(zero_based)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        (back <= len).then(|| len - back)
    } else {
        None
    }
}

fn build_mesh(positions: &[Vec3], normals: &[Vec3], triangles: &[[Corner; 3]]) -> Mesh {
    let mut lookup: HashMap<(usize, Option<usize>), u32> = HashMap::new();
    let mut mesh = Mesh::default();

    for corner in triangles.iter().flatten() {
        let next_index = mesh.vertex_count() as u32;
        let index = *lookup
            .entry((corner.position, corner.normal))
            .or_insert_with(|| {
                mesh.vertices
                    .extend_from_slice(&positions[corner.position].to_array());
                let n = corner.normal.map_or(Vec3::ZERO, |i| normals[i]);
                mesh.vertices.extend_from_slice(&n.to_array());
                next_index
            });
        mesh.indices.push(index);
    }

    mesh
}

fn has_normal(chunk: &[f32]) -> bool {
    chunk[3..].iter().any(|c| *c != 0.0)
}

fn missing_normals(mesh: &Mesh) -> bool {
    mesh.vertices
        .chunks_exact(VERTEX_STRIDE)
        .any(|chunk| !has_normal(chunk))
}

/// Fills in smooth normals for vertices the file left without one. Supplied
/// normals are kept.
fn compute_normals(mesh: &mut Mesh) {
    let mut accum = vec![Vec3::ZERO; mesh.vertex_count()];
    let position = |i: usize| Vec3::from_slice(&mesh.vertices[i * VERTEX_STRIDE..][..3]);

    for triangle in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let face = (position(i1) - position(i0)).cross(position(i2) - position(i0));
        if face.length_squared() > f32::EPSILON {
            let face = face.normalize();
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }
    }

    for (chunk, normal) in mesh.vertices.chunks_exact_mut(VERTEX_STRIDE).zip(accum) {
        if !has_normal(chunk) {
            chunk[3..].copy_from_slice(&normal.normalize_or_zero().to_array());
        }
    }
}
