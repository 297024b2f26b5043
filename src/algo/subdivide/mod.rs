//! Mesh subdivision.
//!
//! # Loop Subdivision (Triangle Meshes)
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme for
//! triangle meshes. Each iteration:
//!
//! 1. Computes smoothed positions for the existing vertices
//! 2. Computes positions for the vertices to be inserted on every edge
//! 3. Splits every original edge and flips the new edges that join an old
//!    and a new vertex, which turns each triangle into 4
//! 4. Moves every vertex to its computed position
//!
//! The topology is refined in place through
//! [`split_edge`](crate::mesh::HalfedgeMesh::split_edge) and
//! [`flip_edge`](crate::mesh::HalfedgeMesh::flip_edge), so genus and
//! boundary structure are preserved.
//!
//! # Example
//!
//! ```no_run
//! use meshedit::prelude::*;
//! use meshedit::algo::subdivide::{loop_subdivide, SubdivideOptions};
//!
//! let mut mesh = meshedit::io::load("input.obj").unwrap();
//!
//! let options = SubdivideOptions::new(2); // 2 iterations
//! loop_subdivide(&mut mesh, &options).unwrap();
//!
//! meshedit::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.
//! - Warren, J. (1995). "Subdivision methods for geometric design."
//!   Unpublished manuscript, Rice University.

mod loop_subdivision;

pub use loop_subdivision::{loop_beta, loop_subdivide};

use crate::error::{MeshError, Result};

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Reject a zero iteration count.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MeshError::invalid_param(
                "iterations",
                self.iterations,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
