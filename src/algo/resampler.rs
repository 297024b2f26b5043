//! Whole-mesh resampling operations behind one configuration object.

use crate::error::Result;
use crate::mesh::HalfedgeMesh;

use super::decimate::{qem_decimate, DecimateOptions};
use super::remesh::{isotropic_remesh, RemeshOptions};
use super::subdivide::{loop_subdivide, SubdivideOptions};

/// Upsamples, downsamples or resamples a mesh in place.
///
/// Holds configuration only; the mesh is borrowed for the duration of each
/// call.
///
/// ```
/// use meshedit::prelude::*;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, 0.5, 1.0),
/// ];
/// let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
/// let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// let resampler = MeshResampler::new();
/// resampler.upsample(&mut mesh).unwrap();
/// assert_eq!(mesh.num_faces(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshResampler {
    /// Used by [`upsample`](Self::upsample).
    pub subdivide: SubdivideOptions,
    /// Used by [`downsample`](Self::downsample).
    pub decimate: DecimateOptions,
    /// Used by [`resample`](Self::resample).
    pub remesh: RemeshOptions,
}

impl MeshResampler {
    /// Create a resampler with default options: one Loop step, decimation to
    /// a quarter of the faces, and five remeshing iterations at the mean edge
    /// length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subdivision options.
    pub fn with_subdivide(mut self, options: SubdivideOptions) -> Self {
        self.subdivide = options;
        self
    }

    /// Set the decimation options.
    pub fn with_decimate(mut self, options: DecimateOptions) -> Self {
        self.decimate = options;
        self
    }

    /// Set the remeshing options.
    pub fn with_remesh(mut self, options: RemeshOptions) -> Self {
        self.remesh = options;
        self
    }

    /// Refine with Loop subdivision.
    pub fn upsample(&self, mesh: &mut HalfedgeMesh) -> Result<()> {
        self.subdivide.validate()?;
        loop_subdivide(mesh, &self.subdivide)
    }

    /// Simplify with quadric error metrics.
    pub fn downsample(&self, mesh: &mut HalfedgeMesh) -> Result<()> {
        qem_decimate(mesh, &self.decimate)
    }

    /// Even out edge lengths with isotropic remeshing.
    pub fn resample(&self, mesh: &mut HalfedgeMesh) -> Result<()> {
        isotropic_remesh(mesh, &self.remesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::mesh::fixtures::{create_grid_mesh, create_icosahedron};

    #[test]
    fn test_upsample_then_downsample() {
        let mut mesh = create_icosahedron();
        let resampler = MeshResampler::new();

        resampler.upsample(&mut mesh).unwrap();
        assert_eq!(
            (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces()),
            (42, 120, 80)
        );

        resampler.downsample(&mut mesh).unwrap();
        assert!(mesh.num_faces() >= 20 && mesh.num_faces() < 80);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_resample_keeps_surface_valid() {
        let mut mesh = create_grid_mesh(4);
        let resampler = MeshResampler::new().with_remesh(RemeshOptions::default().with_iterations(4));

        resampler.resample(&mut mesh).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn test_defaults_keep_open_outline() {
        let resampler = MeshResampler::new();

        let mut coarse = create_grid_mesh(8);
        resampler.downsample(&mut coarse).unwrap();
        assert!(coarse.num_faces() < 128);
        assert!((coarse.surface_area() - 1.0).abs() < 1e-9);

        let mut even = create_grid_mesh(8);
        resampler.resample(&mut even).unwrap();
        assert!((even.surface_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_upsample_rejects_zero_iterations() {
        let mut mesh = create_icosahedron();
        let resampler = MeshResampler::new().with_subdivide(SubdivideOptions::new(0));

        let err = resampler.upsample(&mut mesh).unwrap_err();
        assert!(matches!(err, MeshError::InvalidParameter { .. }));
        assert_eq!(mesh.num_faces(), 20);
    }
}
