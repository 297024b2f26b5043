//! Mesh file I/O.
//!
//! Every format is read as a polygon soup and handed to
//! [`build_from_triangles`](crate::mesh::build_from_triangles); polygons with
//! more than three corners are fan-triangulated on load.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Positions and faces only |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII load, binary save |
//! | PLY | `.ply` | ✓ | ✓ | ASCII save |
//!
//! # Usage
//!
//! ```no_run
//! use meshedit::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("model.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::HalfedgeMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// # Errors
/// [`MeshError::UnsupportedFormat`] for an unknown extension, I/O and parse
/// failures, and [`MeshError::InvalidTopology`] for a non-manifold soup.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfedgeMesh> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Obj => obj::load(path)?,
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &HalfedgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

/// Split each polygon into a fan of triangles around its first corner.
pub(crate) fn fan_triangulate(polygon: &[usize], out: &mut Vec<[usize; 3]>) {
    for i in 1..polygon.len().saturating_sub(1) {
        out.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::mesh::fixtures::{create_grid_mesh, create_icosahedron};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("meshedit-{}-{}", std::process::id(), name))
    }

    fn assert_same_counts(a: &HalfedgeMesh, b: &HalfedgeMesh) {
        assert_eq!(
            (a.num_vertices(), a.num_edges(), a.num_faces()),
            (b.num_vertices(), b.num_edges(), b.num_faces())
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh.glb"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let mesh = create_icosahedron();
        let err = save(&mesh, "mesh.xyz").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { ref extension } if extension == "xyz"));

        let err = load("mesh").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { ref extension } if extension == "(none)"));
    }

    #[test]
    fn test_save_and_reload_each_format() {
        let closed = create_icosahedron();
        let open = create_grid_mesh(3);

        for ext in ["obj", "ply", "stl"] {
            for (label, mesh) in [("closed", &closed), ("open", &open)] {
                let path = scratch_path(&format!("{label}.{ext}"));
                save(mesh, &path).unwrap();
                let reloaded = load(&path).unwrap();
                std::fs::remove_file(&path).unwrap();

                assert_same_counts(mesh, &reloaded);
                assert!(reloaded.is_valid());
                assert_eq!(reloaded.euler_characteristic(), mesh.euler_characteristic());
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load(scratch_path("does-not-exist.ply")).unwrap_err();
        assert!(matches!(err, MeshError::Io(_)));
    }

    #[test]
    fn test_fan_triangulate() {
        let mut out = Vec::new();
        fan_triangulate(&[4, 5, 6, 7, 8], &mut out);
        assert_eq!(out, vec![[4, 5, 6], [4, 6, 7], [4, 7, 8]]);

        out.clear();
        fan_triangulate(&[1, 2], &mut out);
        assert!(out.is_empty());
    }
}
