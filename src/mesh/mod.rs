//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation, its construction
//! from polygon soup, and the three local edits everything else is built on.
//!
//! # Overview
//!
//! The primary type is [`HalfedgeMesh`], which represents a manifold polygon
//! mesh using a half-edge (doubly-connected edge list) data structure. Each
//! element kind lives in its own arena, so adjacency queries are O(1) and the
//! local edits ([`flip_edge`](HalfedgeMesh::flip_edge),
//! [`split_edge`](HalfedgeMesh::split_edge),
//! [`collapse_edge`](HalfedgeMesh::collapse_edge)) create and destroy
//! elements in constant time.
//!
//! # Handles
//!
//! Mesh elements are identified by generation-checked handles:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an undirected edge
//! - [`HalfedgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! [`ElementId`] holds any one of them. A handle to an element destroyed by a
//! collapse is never reused, and [`HalfedgeMesh::edit_count`] changes with
//! every successful edit so that holders know when to re-validate.
//!
//! # Construction
//!
//! ```
//! use meshedit::mesh::{build_from_triangles, HalfedgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfedgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod arena;
mod builder;
mod edit;
mod halfedge;
mod index;
mod quadric;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex, to_polygons};
pub use halfedge::{
    Edge, Face, FaceHalfedgeIter, Halfedge, HalfedgeMesh, Vertex, VertexHalfedgeIter,
};
pub use index::{EdgeId, ElementId, ElementKind, FaceId, HalfedgeId, VertexId};
pub use quadric::Quadric;
