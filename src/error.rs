//! Error types for meshedit.
//!
//! Construction failures are fatal ([`MeshError::InvalidTopology`]). Edit
//! failures ([`MeshError::InvalidOperation`]) leave the mesh untouched so an
//! interactive edit loop can carry on after a rejected request.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::ElementKind;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The polygon soup handed to the builder does not describe a manifold surface.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),

    /// A local edit or algorithm was refused; the mesh was not modified.
    #[error("cannot {op}: {reason}")]
    InvalidOperation {
        /// The operation that was refused.
        op: Operation,
        /// Why it was refused.
        reason: Rejection,
    },

    /// The quadric minimisation system has no unique solution.
    #[error("quadric system is singular")]
    SingularSystem,

    /// A handle refers to an element that has been destroyed.
    #[error("stale {kind} handle")]
    StaleHandle {
        /// Which element arena the handle belongs to.
        kind: ElementKind,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: fmt::Display>(name: &'static str, value: T, reason: &'static str) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a rejected-edit error.
    pub fn rejected(op: Operation, reason: Rejection) -> Self {
        MeshError::InvalidOperation { op, reason }
    }

    /// True for refused edits, which callers are expected to recover from.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, MeshError::InvalidOperation { .. })
    }

    /// The rejection reason, if this is a refused edit.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            MeshError::InvalidOperation { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Malformed or non-manifold polygon soup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners.
    #[error("face {face} has only {count} corners")]
    TooFewCorners {
        /// The face index.
        face: usize,
        /// Number of corners given.
        count: usize,
    },

    /// A face repeats a vertex index.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An undirected edge is used by more than two face corners.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The same directed edge appears in two faces, so no twin can be assigned.
    #[error("directed edge ({v0}, {v1}) appears twice (inconsistent winding)")]
    DuplicateHalfedge {
        /// Origin vertex.
        v0: usize,
        /// Destination vertex.
        v1: usize,
    },

    /// The faces around a vertex do not form a single fan.
    #[error("vertex {vertex} is non-manifold")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is not referenced by any face")]
    IsolatedVertex {
        /// The vertex index.
        vertex: usize,
    },
}

/// Operations that can be refused with [`MeshError::InvalidOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`HalfedgeMesh::flip_edge`](crate::mesh::HalfedgeMesh::flip_edge).
    Flip,
    /// [`HalfedgeMesh::split_edge`](crate::mesh::HalfedgeMesh::split_edge).
    Split,
    /// [`HalfedgeMesh::collapse_edge`](crate::mesh::HalfedgeMesh::collapse_edge).
    Collapse,
    /// Loop subdivision.
    Upsample,
    /// Quadric decimation.
    Downsample,
    /// Isotropic remeshing.
    Resample,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Flip => "flip edge",
            Operation::Split => "split edge",
            Operation::Collapse => "collapse edge",
            Operation::Upsample => "upsample",
            Operation::Downsample => "downsample",
            Operation::Resample => "resample",
        };
        f.write_str(name)
    }
}

/// Why an edit was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The edge has only one incident face.
    #[error("edge is on the boundary")]
    BoundaryEdge,

    /// An incident face is not a triangle.
    #[error("incident face is not a triangle")]
    NotTriangle,

    /// The result would connect two vertices that are already adjacent.
    #[error("result would duplicate an existing edge")]
    DuplicateEdge,

    /// The endpoints share neighbours outside the incident triangles.
    #[error("link condition violated")]
    LinkCondition,

    /// Both endpoints lie on the boundary but the edge does not.
    #[error("collapse would pinch the boundary")]
    BoundaryPinch,

    /// The result would contain a face with fewer than three distinct vertices.
    #[error("result would contain a degenerate face")]
    DegenerateFace,

    /// The result would leave an edge without any incident face.
    #[error("result would leave an edge with no face")]
    OrphanEdge,

    /// The mesh contains faces that are not triangles.
    #[error("mesh is not a triangle mesh")]
    NotTriangleMesh,

    /// An edge edit was requested with no edge or halfedge selected.
    #[error("no edge is selected")]
    NoEdgeSelected,
}
