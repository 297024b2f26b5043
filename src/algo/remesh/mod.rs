//! Mesh remeshing.
//!
//! # Isotropic Remeshing
//!
//! The isotropic remeshing algorithm (Botsch & Kobbelt, 2004) drives every
//! edge towards a target length `L` by iteratively applying:
//!
//! 1. **Split** edges longer than 4/3 × L
//! 2. **Collapse** edges shorter than 4/5 × L
//! 3. **Flip** edges to improve vertex valence
//! 4. **Tangential smoothing** to regularize vertex positions
//!
//! All four passes edit the half-edge mesh in place through
//! [`split_edge`](crate::mesh::HalfedgeMesh::split_edge),
//! [`collapse_edge_to`](crate::mesh::HalfedgeMesh::collapse_edge_to) and
//! [`flip_edge`](crate::mesh::HalfedgeMesh::flip_edge). Edits the mesh rejects
//! are skipped, so a pass never fails half way.
//!
//! On an open mesh the outline survives: boundary vertices slide along the
//! boundary and corners, where the boundary turns by more than 30°, stay
//! where they are.
//!
//! # Example
//!
//! ```no_run
//! use meshedit::prelude::*;
//! use meshedit::algo::remesh::{isotropic_remesh, RemeshOptions};
//!
//! let mut mesh = meshedit::io::load("input.obj").unwrap();
//!
//! let options = RemeshOptions::with_target_length(0.1).with_iterations(5);
//! isotropic_remesh(&mut mesh, &options).unwrap();
//!
//! meshedit::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! # References
//!
//! - Botsch, M., & Kobbelt, L. (2004). "A remeshing approach to multiresolution modeling."
//!   Symposium on Geometry Processing.

mod isotropic;

pub use isotropic::isotropic_remesh;

use crate::error::{MeshError, Result};
use crate::mesh::HalfedgeMesh;

/// Options for isotropic remeshing.
#[derive(Debug, Clone)]
pub struct RemeshOptions {
    /// Target edge length. `None` uses the mean edge length of the input.
    pub target_length: Option<f64>,

    /// Number of remeshing iterations. Four to six is usually enough.
    pub iterations: usize,

    /// Number of tangential smoothing steps per remeshing iteration.
    pub smoothing_iterations: usize,

    /// Fraction of the tangential offset applied per smoothing step.
    pub smoothing_lambda: f64,

    /// Keep boundary vertices fixed and boundary edges unsplit and uncollapsed.
    /// Without it boundary vertices may still slide along the boundary.
    pub preserve_boundary: bool,
}

impl RemeshOptions {
    /// Create options with the specified target edge length.
    pub fn with_target_length(target_length: f64) -> Self {
        Self {
            target_length: Some(target_length),
            ..Self::default()
        }
    }

    /// Set the number of remeshing iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the number of smoothing steps per remeshing iteration.
    pub fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Set the smoothing factor.
    pub fn with_smoothing_lambda(mut self, lambda: f64) -> Self {
        self.smoothing_lambda = lambda;
        self
    }

    /// Set whether to preserve the boundary.
    pub fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Check the parameters before any edit is made.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MeshError::invalid_param(
                "iterations",
                self.iterations,
                "must be at least 1",
            ));
        }
        if let Some(length) = self.target_length {
            if !length.is_finite() || length <= 0.0 {
                return Err(MeshError::invalid_param(
                    "target_length",
                    length,
                    "must be positive and finite",
                ));
            }
        }
        if !(self.smoothing_lambda > 0.0 && self.smoothing_lambda <= 1.0) {
            return Err(MeshError::invalid_param(
                "smoothing_lambda",
                self.smoothing_lambda,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// The target length to use on `mesh`.
    pub fn resolve_target_length(&self, mesh: &HalfedgeMesh) -> f64 {
        self.target_length
            .unwrap_or_else(|| mesh.average_edge_length())
    }
}

impl Default for RemeshOptions {
    fn default() -> Self {
        Self {
            target_length: None,
            iterations: 5,
            smoothing_iterations: 1,
            smoothing_lambda: 0.5,
            preserve_boundary: false,
        }
    }
}
