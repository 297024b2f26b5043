//! Wavefront OBJ format support.
//!
//! Only positions and face connectivity are read; texture coordinates,
//! normals and materials are ignored. All objects in a file are merged into
//! one mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_polygons, HalfedgeMesh};

use super::fan_triangulate;

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use meshedit::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfedgeMesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|e| MeshError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let offset = vertices.len();

        vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );

        let indices: Vec<usize> = mesh.indices.iter().map(|&i| offset + i as usize).collect();
        if mesh.face_arities.is_empty() {
            faces.extend(indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]));
        } else {
            let mut start = 0;
            for &arity in &mesh.face_arities {
                let end = start + arity as usize;
                let polygon = indices.get(start..end).ok_or_else(|| MeshError::LoadError {
                    path: path.to_path_buf(),
                    message: "face arities exceed index count".to_string(),
                })?;
                fan_triangulate(polygon, &mut faces);
                start = end;
            }
        }
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to an OBJ file.
///
/// Faces are written as polygons with 1-based indices, in traversal order.
pub fn save<P: AsRef<Path>>(mesh: &HalfedgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_polygons(mesh);

    writeln!(writer, "# Generated by meshedit")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for face in &faces {
        write!(writer, "f")?;
        for &i in face {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
