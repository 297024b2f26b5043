//! STL (stereolithography) format support.
//!
//! STL stores a bare triangle list. `stl_io` merges bit-identical corner
//! positions on read, which recovers the shared vertices of a mesh that was
//! written from an indexed source.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfedgeMesh};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles with a repeated
/// corner are dropped, along with any vertex only they used.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfedgeMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Dense re-indexing over the corners that survive.
    let mut remap: Vec<Option<usize>> = vec![None; stl.vertices.len()];
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(stl.vertices.len());
    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());

    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices;
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        let mut face = [0usize; 3];
        for (slot, &i) in face.iter_mut().zip(&tri.vertices) {
            *slot = match remap[i] {
                Some(j) => j,
                None => {
                    let p = &stl.vertices[i];
                    let j = vertices.len();
                    vertices.push(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
                    remap[i] = Some(j);
                    j
                }
            };
        }
        faces.push(face);
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to a binary STL file.
///
/// Polygons are fan-triangulated. Positions are narrowed to `f32`.
pub fn save<P: AsRef<Path>>(mesh: &HalfedgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);
    let vertex = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|f| {
            let [p0, p1, p2] = [&vertices[f[0]], &vertices[f[1]], &vertices[f[2]]];
            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(p0), vertex(p1), vertex(p2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
