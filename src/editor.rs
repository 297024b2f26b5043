//! Interactive editing session.
//!
//! [`MeshEditor`] owns a mesh together with the selected and hovered
//! elements of a viewer. Element handles are only meaningful until the next
//! edit, so both are stamped with the mesh's
//! [`edit_count`](HalfedgeMesh::edit_count) and read back as `None` once the
//! mesh has changed underneath them.
//!
//! ```
//! use meshedit::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let mut editor = MeshEditor::new(mesh);
//! let diagonal = editor.mesh().edge_ids().find(|&e| !editor.mesh().is_boundary_edge(e)).unwrap();
//! editor.select(diagonal).unwrap();
//! editor.flip_selected().unwrap();
//! assert!(editor.selected().is_none());
//! ```

use std::fmt::Write;

use log::debug;

use crate::algo::MeshResampler;
use crate::error::{MeshError, Operation, Rejection, Result};
use crate::mesh::{EdgeId, ElementId, HalfedgeId, HalfedgeMesh, VertexId};

/// An element handle recorded at a given edit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tracked {
    id: ElementId,
    stamp: u64,
}

/// A mesh plus the selection state of an editing session.
#[derive(Debug, Clone)]
pub struct MeshEditor {
    mesh: HalfedgeMesh,
    resampler: MeshResampler,
    selected: Option<Tracked>,
    hovered: Option<Tracked>,
}

impl MeshEditor {
    /// Start a session on `mesh` with default resampling options.
    pub fn new(mesh: HalfedgeMesh) -> Self {
        Self {
            mesh,
            resampler: MeshResampler::new(),
            selected: None,
            hovered: None,
        }
    }

    /// Use `resampler` for the whole-mesh operations.
    pub fn with_resampler(mut self, resampler: MeshResampler) -> Self {
        self.resampler = resampler;
        self
    }

    /// The mesh being edited.
    pub fn mesh(&self) -> &HalfedgeMesh {
        &self.mesh
    }

    /// Mutable access to the mesh.
    ///
    /// Any edit made through it invalidates the selection and hover.
    pub fn mesh_mut(&mut self) -> &mut HalfedgeMesh {
        &mut self.mesh
    }

    /// End the session, returning the mesh.
    pub fn into_mesh(self) -> HalfedgeMesh {
        self.mesh
    }

    /// The resampling options.
    pub fn resampler(&self) -> &MeshResampler {
        &self.resampler
    }

    /// Mutable access to the resampling options.
    pub fn resampler_mut(&mut self) -> &mut MeshResampler {
        &mut self.resampler
    }

    // ==================== Selection ====================

    /// Select a live element.
    ///
    /// # Errors
    /// [`MeshError::StaleHandle`] if `id` does not refer to a live element.
    pub fn select(&mut self, id: impl Into<ElementId>) -> Result<()> {
        self.selected = Some(self.track(id.into())?);
        Ok(())
    }

    /// Mark a live element as hovered.
    ///
    /// # Errors
    /// [`MeshError::StaleHandle`] if `id` does not refer to a live element.
    pub fn hover(&mut self, id: impl Into<ElementId>) -> Result<()> {
        self.hovered = Some(self.track(id.into())?);
        Ok(())
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drop the hover.
    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// The selected element, unless the mesh has been edited since.
    pub fn selected(&self) -> Option<ElementId> {
        self.selected.and_then(|t| self.resolve(t))
    }

    /// The hovered element, unless the mesh has been edited since.
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered.and_then(|t| self.resolve(t))
    }

    /// Move a halfedge selection to the next halfedge around its face.
    pub fn select_next_halfedge(&mut self) -> Option<HalfedgeId> {
        let he = self.selected()?.as_halfedge()?;
        let next = self.mesh.next(he);
        self.selected = Some(self.stamp(next.into()));
        Some(next)
    }

    /// Move a halfedge selection to its twin.
    pub fn select_twin_halfedge(&mut self) -> Option<HalfedgeId> {
        let he = self.selected()?.as_halfedge()?;
        let twin = self.mesh.twin(he);
        self.selected = Some(self.stamp(twin.into()));
        Some(twin)
    }

    fn stamp(&self, id: ElementId) -> Tracked {
        Tracked {
            id,
            stamp: self.mesh.edit_count(),
        }
    }

    fn track(&self, id: ElementId) -> Result<Tracked> {
        if !self.mesh.contains(id) {
            return Err(MeshError::StaleHandle { kind: id.kind() });
        }
        Ok(self.stamp(id))
    }

    fn resolve(&self, tracked: Tracked) -> Option<ElementId> {
        (tracked.stamp == self.mesh.edit_count() && self.mesh.contains(tracked.id))
            .then_some(tracked.id)
    }

    /// The selected edge, or the edge of the selected halfedge.
    fn selected_edge(&self, op: Operation) -> Result<EdgeId> {
        match self.selected() {
            Some(ElementId::Edge(e)) => Ok(e),
            Some(ElementId::Halfedge(h)) => Ok(self.mesh.edge_of(h)),
            _ => Err(MeshError::rejected(op, Rejection::NoEdgeSelected)),
        }
    }

    // ==================== Edits ====================

    /// Flip the selected edge.
    ///
    /// On success the selection and hover are cleared; a refused flip leaves
    /// them in place.
    pub fn flip_selected(&mut self) -> Result<EdgeId> {
        let e = self.selected_edge(Operation::Flip)?;
        let flipped = self.mesh.flip_edge(e)?;
        self.after_edit(Operation::Flip);
        Ok(flipped)
    }

    /// Split the selected edge at its midpoint, returning the new vertex.
    pub fn split_selected(&mut self) -> Result<VertexId> {
        let e = self.selected_edge(Operation::Split)?;
        let v = self.mesh.split_edge(e)?;
        self.after_edit(Operation::Split);
        Ok(v)
    }

    /// Collapse the selected edge to its midpoint, returning the survivor.
    pub fn collapse_selected(&mut self) -> Result<VertexId> {
        let e = self.selected_edge(Operation::Collapse)?;
        let v = self.mesh.collapse_edge(e)?;
        self.after_edit(Operation::Collapse);
        Ok(v)
    }

    /// Loop-subdivide the whole mesh.
    pub fn upsample(&mut self) -> Result<()> {
        self.resampler.upsample(&mut self.mesh)?;
        self.after_edit(Operation::Upsample);
        Ok(())
    }

    /// Simplify the whole mesh.
    pub fn downsample(&mut self) -> Result<()> {
        self.resampler.downsample(&mut self.mesh)?;
        self.after_edit(Operation::Downsample);
        Ok(())
    }

    /// Isotropically remesh the whole mesh.
    pub fn resample(&mut self) -> Result<()> {
        self.resampler.resample(&mut self.mesh)?;
        self.after_edit(Operation::Resample);
        Ok(())
    }

    fn after_edit(&mut self, op: Operation) {
        self.selected = None;
        self.hovered = None;
        debug!(
            "{op}: {} vertices, {} edges, {} faces",
            self.mesh.num_vertices(),
            self.mesh.num_edges(),
            self.mesh.num_faces()
        );
    }

    // ==================== Readout ====================

    /// Text readout of the selected element, one property per line.
    pub fn describe_selection(&self) -> Option<String> {
        let id = self.selected()?;
        let mesh = &self.mesh;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = match id {
            ElementId::Vertex(v) => {
                let p = mesh.position(v);
                write!(
                    out,
                    "Vertex {v}\n  position: ({:.4}, {:.4}, {:.4})\n  halfedge: {}\n  boundary: {}\n  degree: {}",
                    p.x,
                    p.y,
                    p.z,
                    mesh.vertex(v).halfedge,
                    mesh.is_boundary_vertex(v),
                    mesh.degree(v)
                )
            }
            ElementId::Halfedge(h) => {
                let face = match mesh.face_of(h) {
                    Some(f) => f.to_string(),
                    None => "none".to_string(),
                };
                write!(
                    out,
                    "Halfedge {h}\n  twin: {}\n  next: {}\n  vertex: {}\n  edge: {}\n  face: {face}\n  boundary: {}",
                    mesh.twin(h),
                    mesh.next(h),
                    mesh.origin(h),
                    mesh.edge_of(h),
                    mesh.is_boundary_halfedge(h)
                )
            }
            ElementId::Edge(e) => {
                let [a, b] = mesh.edge_vertices(e);
                write!(
                    out,
                    "Edge {e}\n  halfedge: {}\n  vertices: {a} {b}\n  length: {:.4}\n  boundary: {}",
                    mesh.edge_halfedge(e),
                    mesh.edge_length(e),
                    mesh.is_boundary_edge(e)
                )
            }
            ElementId::Face(f) => write!(
                out,
                "Face {f}\n  halfedge: {}\n  degree: {}\n  area: {:.4}\n  boundary: {}",
                mesh.face(f).halfedge,
                mesh.face_degree(f),
                mesh.face_area(f),
                mesh.is_boundary_face(f)
            ),
        };
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{create_icosahedron, create_quad_pair, create_tetrahedron};

    fn interior_edge(mesh: &HalfedgeMesh) -> EdgeId {
        mesh.edge_ids().find(|&e| !mesh.is_boundary_edge(e)).unwrap()
    }

    #[test]
    fn test_select_and_hover() {
        let mut editor = MeshEditor::new(create_tetrahedron());
        let v = editor.mesh().vertex_ids().next().unwrap();
        let f = editor.mesh().face_ids().next().unwrap();

        editor.select(v).unwrap();
        editor.hover(f).unwrap();

        assert_eq!(editor.selected(), Some(ElementId::Vertex(v)));
        assert_eq!(editor.hovered(), Some(ElementId::Face(f)));

        editor.clear_hover();
        assert_eq!(editor.hovered(), None);
        assert_eq!(editor.selected(), Some(ElementId::Vertex(v)));
    }

    #[test]
    fn test_select_dead_handle_fails() {
        let mut editor = MeshEditor::new(create_icosahedron());
        let e = editor.mesh().edge_ids().next().unwrap();
        editor.mesh_mut().collapse_edge(e).unwrap();

        let err = editor.select(e).unwrap_err();
        assert!(matches!(err, MeshError::StaleHandle { .. }));
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_next_halfedge_cycles_face() {
        let mut editor = MeshEditor::new(create_tetrahedron());
        let f = editor.mesh().face_ids().next().unwrap();
        let start = editor.mesh().face(f).halfedge;

        editor.select(start).unwrap();
        editor.select_next_halfedge().unwrap();
        editor.select_next_halfedge().unwrap();
        let back = editor.select_next_halfedge().unwrap();

        assert_eq!(back, start);
    }

    #[test]
    fn test_twin_halfedge_round_trip() {
        let mut editor = MeshEditor::new(create_tetrahedron());
        let h = editor.mesh().halfedge_ids().next().unwrap();

        editor.select(h).unwrap();
        let twin = editor.select_twin_halfedge().unwrap();
        assert_ne!(twin, h);
        assert_eq!(editor.select_twin_halfedge(), Some(h));
    }

    #[test]
    fn test_navigation_needs_halfedge() {
        let mut editor = MeshEditor::new(create_tetrahedron());
        assert_eq!(editor.select_next_halfedge(), None);

        let v = editor.mesh().vertex_ids().next().unwrap();
        editor.select(v).unwrap();
        assert_eq!(editor.select_twin_halfedge(), None);
        assert_eq!(editor.selected(), Some(ElementId::Vertex(v)));
    }

    #[test]
    fn test_edit_clears_selection_and_hover() {
        let mut editor = MeshEditor::new(create_quad_pair());
        let e = interior_edge(editor.mesh());
        let v = editor.mesh().vertex_ids().next().unwrap();

        editor.select(e).unwrap();
        editor.hover(v).unwrap();
        editor.flip_selected().unwrap();

        assert_eq!(editor.selected(), None);
        assert_eq!(editor.hovered(), None);
        assert!(editor.mesh().is_valid());
    }

    #[test]
    fn test_rejected_edit_keeps_selection() {
        let mut editor = MeshEditor::new(create_quad_pair());
        let e = editor.mesh().edge_ids().find(|&e| editor.mesh().is_boundary_edge(e)).unwrap();

        editor.select(e).unwrap();
        let err = editor.flip_selected().unwrap_err();

        assert_eq!(err.rejection(), Some(Rejection::BoundaryEdge));
        assert_eq!(editor.selected(), Some(ElementId::Edge(e)));
    }

    #[test]
    fn test_edit_without_edge_selected() {
        let mut editor = MeshEditor::new(create_icosahedron());
        let err = editor.split_selected().unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NoEdgeSelected));

        let f = editor.mesh().face_ids().next().unwrap();
        editor.select(f).unwrap();
        let err = editor.collapse_selected().unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NoEdgeSelected));
    }

    #[test]
    fn test_halfedge_selection_edits_its_edge() {
        let mut editor = MeshEditor::new(create_icosahedron());
        let h = editor.mesh().halfedge_ids().next().unwrap();

        editor.select(h).unwrap();
        editor.split_selected().unwrap();
        assert_eq!(editor.mesh().num_faces(), 22);

        let h = editor.mesh().halfedge_ids().next().unwrap();
        editor.select(h).unwrap();
        editor.collapse_selected().unwrap();
        assert_eq!(editor.mesh().num_faces(), 20);
        assert!(editor.mesh().is_valid());
    }

    #[test]
    fn test_direct_mesh_edit_invalidates_selection() {
        let mut editor = MeshEditor::new(create_icosahedron());
        let v = editor.mesh().vertex_ids().last().unwrap();
        editor.select(v).unwrap();

        let e = editor.mesh().edge_ids().next().unwrap();
        editor.mesh_mut().flip_edge(e).unwrap();

        // The vertex is still alive, but the selection predates the edit.
        assert!(editor.mesh().contains(v));
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_resampling_clears_selection() {
        let mut editor = MeshEditor::new(create_icosahedron());
        let f = editor.mesh().face_ids().next().unwrap();

        editor.select(f).unwrap();
        editor.upsample().unwrap();
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.mesh().num_faces(), 80);

        let f = editor.mesh().face_ids().last().unwrap();
        editor.select(f).unwrap();
        editor.downsample().unwrap();
        assert_eq!(editor.selected(), None);
        assert!(editor.mesh().num_faces() < 80);

        editor.resample().unwrap();
        assert!(editor.mesh().is_valid());
    }

    #[test]
    fn test_describe_selection() {
        let mut editor = MeshEditor::new(create_tetrahedron());
        assert_eq!(editor.describe_selection(), None);

        let v = editor.mesh().vertex_ids().next().unwrap();
        editor.select(v).unwrap();
        let text = editor.describe_selection().unwrap();
        assert!(text.starts_with("Vertex V("));
        assert!(text.contains("position: (0.0000, 0.0000, 0.0000)"));
        assert!(text.contains("boundary: false"));
        assert!(text.contains("degree: 3"));

        let h = editor.mesh().vertex(v).halfedge;
        editor.select(h).unwrap();
        let text = editor.describe_selection().unwrap();
        for field in ["twin:", "next:", "vertex:", "edge:", "face: F(", "boundary: false"] {
            assert!(text.contains(field), "missing {field} in {text}");
        }

        let e = editor.mesh().edge_ids().next().unwrap();
        editor.select(e).unwrap();
        assert!(editor.describe_selection().unwrap().starts_with("Edge E("));

        let f = editor.mesh().face_ids().next().unwrap();
        editor.select(f).unwrap();
        assert!(editor.describe_selection().unwrap().contains("degree: 3"));
    }
}
