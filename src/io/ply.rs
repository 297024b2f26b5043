//! PLY (Stanford polygon) format support.
//!
//! Loads ASCII and binary PLY through `ply-rs`; saves ASCII.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_polygons, HalfedgeMesh};

use super::fan_triangulate;

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use meshedit::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfedgeMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(&format!("vertex missing {name} coordinate")))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face has no valid vertex_indices list"))?;
        fan_triangulate(&indices, &mut faces);
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    let value = match element.get(name)? {
        Property::Float(v) => f64::from(*v),
        Property::Double(v) => *v,
        Property::Int(v) => f64::from(*v),
        Property::UInt(v) => f64::from(*v),
        Property::Short(v) => f64::from(*v),
        Property::UShort(v) => f64::from(*v),
        Property::Char(v) => f64::from(*v),
        Property::UChar(v) => f64::from(*v),
        _ => return None,
    };
    Some(value)
}

/// Vertex indices of a face; `None` if any index is negative.
fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn widen<T: Copy + TryInto<usize>>(values: &[T]) -> Option<Vec<usize>> {
        values.iter().map(|&v| v.try_into().ok()).collect()
    }

    match element.get(name)? {
        Property::ListInt(v) => widen(v),
        Property::ListUInt(v) => widen(v),
        Property::ListShort(v) => widen(v),
        Property::ListUShort(v) => widen(v),
        Property::ListChar(v) => widen(v),
        Property::ListUChar(v) => widen(v),
        _ => None,
    }
}

/// Save a mesh to an ASCII PLY file with double-precision positions.
pub fn save<P: AsRef<Path>>(mesh: &HalfedgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_polygons(mesh);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by meshedit")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for face in &faces {
        write!(writer, "{}", face.len())?;
        for &i in face {
            write!(writer, " {i}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::create_icosahedron;

    #[test]
    fn test_positions_survive_exactly() {
        let mesh = create_icosahedron();
        let path = std::env::temp_dir().join(format!("meshedit-{}-exact.ply", std::process::id()));

        save(&mesh, &path).unwrap();
        let reloaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let before: Vec<_> = mesh.vertices().map(|(_, v)| v.position).collect();
        let after: Vec<_> = reloaded.vertices().map(|(_, v)| v.position).collect();
        assert_eq!(before, after);
    }
}
