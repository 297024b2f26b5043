//! # meshedit
//!
//! A half-edge triangle mesh with local topological edits and the
//! resampling algorithms built from them.
//!
//! ## Features
//!
//! - **Half-edge data structure**: elements live in generation-checked
//!   arenas, so a handle to an erased element fails loudly instead of
//!   aliasing a new one
//! - **Local edits**: edge flip, split and collapse with manifold-preserving
//!   legality checks
//! - **Resampling**: Loop subdivision, quadric error decimation and
//!   isotropic remeshing
//! - **Editing sessions**: selection tracking that invalidates itself on edit
//! - **File formats**: OBJ, STL, PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshedit::prelude::*;
//!
//! let mut mesh = meshedit::io::load("model.obj").unwrap();
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//!
//! MeshResampler::new().upsample(&mut mesh).unwrap();
//!
//! meshedit::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! ## Building and Editing Meshes
//!
//! ```
//! use meshedit::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.euler_characteristic(), 2);
//!
//! // Splitting an interior edge adds one vertex and two faces.
//! let e = mesh.edge_ids().next().unwrap();
//! let v = mesh.split_edge(e).unwrap();
//! assert_eq!(mesh.degree(v), 4);
//! assert_eq!(mesh.num_faces(), 6);
//!
//! // The surface stays closed and manifold.
//! assert!(mesh.is_closed());
//! assert_eq!(mesh.euler_characteristic(), 2);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use meshedit::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! let v = mesh.vertex_ids().next().unwrap();
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {}", neighbor);
//! }
//!
//! let f = mesh.face_ids().next().unwrap();
//! let [v0, _, _] = mesh.face_triangle(f);
//! assert!(mesh.is_boundary_vertex(v0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod editor;
pub mod error;
pub mod io;
pub mod mesh;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshedit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::decimate::DecimateOptions;
    pub use crate::algo::remesh::RemeshOptions;
    pub use crate::algo::subdivide::SubdivideOptions;
    pub use crate::algo::MeshResampler;
    pub use crate::editor::MeshEditor;
    pub use crate::error::{MeshError, Operation, Rejection, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, to_polygons, EdgeId,
        ElementId, ElementKind, FaceId, HalfedgeId, HalfedgeMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
