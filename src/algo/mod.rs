//! Mesh processing algorithms.
//!
//! This module contains the whole-mesh resampling algorithms, all built on the
//! local edits of [`HalfedgeMesh`](crate::mesh::HalfedgeMesh):
//!
//! - **Subdivision**: Loop subdivision
//! - **Decimation**: Quadric error metrics
//! - **Remeshing**: Isotropic remeshing
//!
//! [`MeshResampler`] bundles the three behind one set of options.

pub mod decimate;
pub mod remesh;
pub mod subdivide;

mod resampler;

pub use resampler::MeshResampler;
