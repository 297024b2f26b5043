//! Local edit operations: edge flip, edge split and edge collapse.
//!
//! Every edit either completes and leaves all connectivity invariants intact,
//! or is refused with [`MeshError::InvalidOperation`] before anything is
//! touched.
//!
//! Naming used throughout, for an edge `e` between `a` and `b`:
//!
//! ```text
//!            c
//!          /   \
//!        h2     h1
//!        /  f0   \
//!      a ---h0--> b
//!        <--t0---
//!        \  f1   /
//!        t1     t2
//!          \   /
//!            d
//! ```
//!
//! `h0 = a -> b` is the edge's stored half-edge, `h1 = next(h0)`,
//! `h2 = next(h1)`, and likewise `t1 = next(t0)`, `t2 = next(t1)`.

use std::collections::HashSet;

use log::trace;
use nalgebra::Point3;

use super::halfedge::HalfedgeMesh;
use super::index::{EdgeId, FaceId, HalfedgeId, VertexId};
use crate::error::{MeshError, Operation, Rejection, Result};

impl HalfedgeMesh {
    // ==================== Flip ====================

    /// Check whether [`flip_edge`](Self::flip_edge) would succeed.
    pub fn check_flip(&self, e: EdgeId) -> Result<()> {
        self.try_edge(e)?;
        self.flip_rejection(e)
            .map_or(Ok(()), |reason| Err(MeshError::rejected(Operation::Flip, reason)))
    }

    fn flip_rejection(&self, e: EdgeId) -> Option<Rejection> {
        let h0 = self.edge_halfedge(e);
        let t0 = self.twin(h0);

        if self.is_boundary_edge(e) {
            return Some(Rejection::BoundaryEdge);
        }
        if !self.is_triangle(h0) || !self.is_triangle(t0) {
            return Some(Rejection::NotTriangle);
        }

        let c = self.origin(self.next(self.next(h0)));
        let d = self.origin(self.next(self.next(t0)));
        if c == d || self.find_halfedge(c, d).is_some() {
            return Some(Rejection::DuplicateEdge);
        }

        None
    }

    /// Rotate an interior edge to join the two opposite apexes.
    ///
    /// The edge keeps its handle; no element is created or destroyed. The two
    /// endpoints lose one degree each and the two apexes gain one.
    ///
    /// # Errors
    /// Refused on a boundary edge, next to a non-triangle, or when the apexes
    /// are already adjacent.
    pub fn flip_edge(&mut self, e: EdgeId) -> Result<EdgeId> {
        if let Err(err) = self.check_flip(e) {
            trace!("flip {e} rejected: {err}");
            return Err(err);
        }

        let h0 = self.edge_halfedge(e);
        let h1 = self.next(h0);
        let h2 = self.next(h1);
        let t0 = self.twin(h0);
        let t1 = self.next(t0);
        let t2 = self.next(t1);

        let a = self.origin(h0);
        let b = self.origin(t0);
        let c = self.origin(h2);
        let d = self.origin(t2);
        let f0 = self.require_face(h0);
        let f1 = self.require_face(t0);

        // f0 = (d, c, a), f1 = (c, d, b)
        self.halfedge_mut(h0).origin = d;
        self.halfedge_mut(t0).origin = c;

        self.link(h0, h2, f0);
        self.link(h2, t1, f0);
        self.link(t1, h0, f0);
        self.link(t0, t2, f1);
        self.link(t2, h1, f1);
        self.link(h1, t0, f1);

        self.face_mut(f0).halfedge = h0;
        self.face_mut(f1).halfedge = t0;
        self.vertex_mut(a).halfedge = t1;
        self.vertex_mut(b).halfedge = h1;

        self.bump_edit_count();
        Ok(e)
    }

    // ==================== Split ====================

    /// Split an edge at its midpoint. See [`split_edge_at`](Self::split_edge_at).
    pub fn split_edge(&mut self, e: EdgeId) -> Result<VertexId> {
        self.try_edge(e)?;
        let midpoint = self.edge_midpoint(e);
        self.split_edge_at(e, midpoint)
    }

    /// Insert a new vertex on an edge, splitting its incident triangles.
    ///
    /// An interior edge becomes four triangles around the new vertex `m`
    /// (three new edges: `m-b` continuing the split edge and one to each
    /// apex). A boundary edge becomes two triangles (two new edges). The
    /// original edge keeps its handle and now runs between `a` and `m`. The
    /// new vertex's stored half-edge runs along the split edge towards `b`.
    ///
    /// # Errors
    /// Refused if an incident face is not a triangle.
    pub fn split_edge_at(&mut self, e: EdgeId, position: Point3<f64>) -> Result<VertexId> {
        self.try_edge(e)?;

        let stored = self.edge_halfedge(e);
        // Orient so that h0 always has a face.
        let h0 = if self.is_boundary_halfedge(stored) {
            self.twin(stored)
        } else {
            stored
        };
        let t0 = self.twin(h0);

        let boundary = self.is_boundary_halfedge(t0);
        if !self.is_triangle(h0) || (!boundary && !self.is_triangle(t0)) {
            let err = MeshError::rejected(Operation::Split, Rejection::NotTriangle);
            trace!("split {e} rejected: {err}");
            return Err(err);
        }

        let h1 = self.next(h0);
        let h2 = self.next(h1);
        let b = self.origin(h1);
        let c = self.origin(h2);
        let f0 = self.require_face(h0);

        // Needed before t0 is rewired.
        let boundary_prev = boundary.then(|| self.prev(t0));

        let m = self.add_vertex(position);

        // m-b continues the split edge, m-c crosses f0.
        let (n0, n1) = self.add_edge_pair(m, b);
        let (p0, p1) = self.add_edge_pair(m, c);

        self.halfedge_mut(t0).origin = m;

        // f0 = (a, m, c), f2 = (m, b, c)
        let f2 = self.add_face();
        self.link(h0, p0, f0);
        self.link(p0, h2, f0);
        self.link(n0, h1, f2);
        self.link(h1, p1, f2);
        self.link(p1, n0, f2);
        self.face_mut(f0).halfedge = h0;
        self.face_mut(f2).halfedge = n0;

        match boundary_prev {
            Some(prev) => {
                self.halfedge_mut(prev).next = n1;
                self.halfedge_mut(n1).next = t0;
            }
            None => {
                let t1 = self.next(t0);
                let t2 = self.next(t1);
                let d = self.origin(t2);
                let f1 = self.require_face(t0);
                let (q0, q1) = self.add_edge_pair(m, d);

                // f1 = (m, a, d), f3 = (b, m, d)
                let f3 = self.add_face();
                self.link(t1, q1, f1);
                self.link(q1, t0, f1);
                self.link(n1, q0, f3);
                self.link(q0, t2, f3);
                self.link(t2, n1, f3);
                self.face_mut(f1).halfedge = t0;
                self.face_mut(f3).halfedge = n1;
            }
        }

        self.vertex_mut(b).halfedge = h1;
        self.vertex_mut(m).halfedge = n0;

        self.bump_edit_count();
        Ok(m)
    }

    // ==================== Collapse ====================

    /// Check whether [`collapse_edge`](Self::collapse_edge) would succeed.
    pub fn check_collapse(&self, e: EdgeId) -> Result<()> {
        self.try_edge(e)?;
        self.collapse_rejection(e)
            .map_or(Ok(()), |reason| Err(MeshError::rejected(Operation::Collapse, reason)))
    }

    fn collapse_rejection(&self, e: EdgeId) -> Option<Rejection> {
        let h0 = self.edge_halfedge(e);
        let t0 = self.twin(h0);
        let sides: Vec<HalfedgeId> = [h0, t0]
            .into_iter()
            .filter(|&h| !self.is_boundary_halfedge(h))
            .collect();

        if sides.iter().any(|&h| !self.is_triangle(h)) {
            return Some(Rejection::NotTriangle);
        }

        let a = self.origin(h0);
        let b = self.origin(t0);
        let apexes: HashSet<VertexId> = sides
            .iter()
            .map(|&h| self.origin(self.next(self.next(h))))
            .collect();

        let around_a: HashSet<VertexId> = self.vertex_neighbors(a).collect();
        let shared: HashSet<VertexId> = self
            .vertex_neighbors(b)
            .filter(|w| around_a.contains(w))
            .collect();
        if shared != apexes {
            return Some(Rejection::LinkCondition);
        }

        if !self.is_boundary_edge(e) && self.is_boundary_vertex(a) && self.is_boundary_vertex(b) {
            return Some(Rejection::BoundaryPinch);
        }

        if apexes
            .iter()
            .any(|&c| !self.is_boundary_vertex(c) && self.degree(c) <= 3)
        {
            return Some(Rejection::DegenerateFace);
        }

        // A removed face whose other two edges are both on the boundary would
        // leave their merged edge without a face.
        for &h in &sides {
            let h1 = self.next(h);
            let h2 = self.next(h1);
            if self.is_boundary_halfedge(self.twin(h1)) && self.is_boundary_halfedge(self.twin(h2)) {
                return Some(Rejection::OrphanEdge);
            }
        }

        None
    }

    /// True if merging the endpoints of `e` at `position` would turn a
    /// surviving triangle over or flatten it to zero area.
    ///
    /// Purely geometric; [`check_collapse`](Self::check_collapse) covers the
    /// topology.
    pub fn collapse_flips_face(&self, e: EdgeId, position: &Point3<f64>) -> bool {
        let h0 = self.edge_halfedge(e);
        let t0 = self.twin(h0);
        let removed = [self.face_of(h0), self.face_of(t0)];
        let [a, b] = self.edge_vertices(e);

        [a, b]
            .into_iter()
            .flat_map(|v| self.vertex_faces(v))
            .filter(|f| !removed.contains(&Some(*f)))
            .any(|f| {
                let corners = self.face_triangle(f);
                let before = corners.map(|v| *self.position(v));
                let after = corners.map(|v| if v == a || v == b { *position } else { *self.position(v) });
                let normal = |[p0, p1, p2]: [Point3<f64>; 3]| (p1 - p0).cross(&(p2 - p0));
                normal(after).dot(&normal(before)) <= 0.0
            })
    }

    /// Collapse an edge to its midpoint. See [`collapse_edge_to`](Self::collapse_edge_to).
    pub fn collapse_edge(&mut self, e: EdgeId) -> Result<VertexId> {
        self.try_edge(e)?;
        let midpoint = self.edge_midpoint(e);
        self.collapse_edge_to(e, midpoint)
    }

    /// Merge the two endpoints of an edge into one vertex at `position`.
    ///
    /// The origin of the edge's stored half-edge survives and is returned.
    /// The edge, its incident faces, the other endpoint, and one side edge of
    /// each removed face are destroyed; every half-edge that started at the
    /// removed endpoint now starts at the survivor.
    ///
    /// # Errors
    /// Refused if an incident face is not a triangle, if the link condition
    /// fails, if the collapse would pinch the boundary, or if it would leave
    /// a degenerate face or an edge with no face.
    pub fn collapse_edge_to(&mut self, e: EdgeId, position: Point3<f64>) -> Result<VertexId> {
        if let Err(err) = self.check_collapse(e) {
            trace!("collapse {e} rejected: {err}");
            return Err(err);
        }

        let h0 = self.edge_halfedge(e);
        let t0 = self.twin(h0);
        let a = self.origin(h0);
        let b = self.origin(t0);

        let mut dead_halfedges = vec![h0, t0];
        let mut dead_edges = vec![e];
        let mut dead_faces: Vec<FaceId> = Vec::with_capacity(2);
        let mut survivor_out = None;

        // Boundary neighbours must be read before anything is rewired.
        let bridges: Vec<(HalfedgeId, HalfedgeId)> = [h0, t0]
            .into_iter()
            .filter(|&h| self.is_boundary_halfedge(h))
            .map(|h| (self.prev(h), self.next(h)))
            .collect();

        let b_out: Vec<HalfedgeId> = self.vertex_halfedges(b).collect();
        for h in b_out {
            self.halfedge_mut(h).origin = a;
        }

        // f0 = (a, b, c): c-b folds onto c-a.
        if let Some(f0) = self.face_of(h0) {
            let h1 = self.next(h0);
            let h2 = self.next(h1);
            let (o1, o2) = (self.twin(h1), self.twin(h2));
            let kept = self.edge_of(h2);

            self.make_twins(o1, o2, kept);
            self.edge_mut(kept).halfedge = o2;
            let c = self.origin(o1);
            self.vertex_mut(c).halfedge = o1;
            survivor_out = Some(o2);

            dead_halfedges.extend([h1, h2]);
            dead_edges.push(self.edge_of(h1));
            dead_faces.push(f0);
        }

        // f1 = (b, a, d): d-b folds onto a-d.
        if let Some(f1) = self.face_of(t0) {
            let t1 = self.next(t0);
            let t2 = self.next(t1);
            let (o4, o5) = (self.twin(t1), self.twin(t2));
            let kept = self.edge_of(t1);

            self.make_twins(o4, o5, kept);
            self.edge_mut(kept).halfedge = o4;
            let d = self.origin(o4);
            self.vertex_mut(d).halfedge = o4;
            survivor_out.get_or_insert(o5);

            dead_halfedges.extend([t1, t2]);
            dead_edges.push(self.edge_of(t2));
            dead_faces.push(f1);
        }

        for (prev, next) in bridges {
            self.halfedge_mut(prev).next = next;
        }

        if let Some(out) = survivor_out {
            self.vertex_mut(a).halfedge = out;
        }
        self.vertex_mut(a).position = position;

        for h in dead_halfedges {
            self.halfedges.remove(h);
        }
        for e in dead_edges {
            self.edges.remove(e);
        }
        for f in dead_faces {
            self.faces.remove(f);
        }
        self.vertices.remove(b);

        self.bump_edit_count();
        Ok(a)
    }

    // ==================== Helpers ====================

    /// True if the loop through `he` has exactly three half-edges.
    fn is_triangle(&self, he: HalfedgeId) -> bool {
        let h1 = self.next(he);
        let h2 = self.next(h1);
        h1 != he && h2 != he && self.next(h2) == he
    }

    /// Face of a half-edge already known to be interior.
    fn require_face(&self, he: HalfedgeId) -> FaceId {
        self.face_of(he).unwrap_or_default()
    }

    fn link(&mut self, he: HalfedgeId, next: HalfedgeId, face: FaceId) {
        let h = self.halfedge_mut(he);
        h.next = next;
        h.face = Some(face);
    }

    fn make_twins(&mut self, x: HalfedgeId, y: HalfedgeId, edge: EdgeId) {
        for (h, t) in [(x, y), (y, x)] {
            let h = self.halfedge_mut(h);
            h.twin = t;
            h.edge = edge;
        }
    }

    /// New edge `from-to` with both half-edges; returns `(from -> to, to -> from)`.
    ///
    /// The caller sets `next` and `face`; both start out as boundary half-edges.
    fn add_edge_pair(&mut self, from: VertexId, to: VertexId) -> (HalfedgeId, HalfedgeId) {
        let edge = self.add_edge();
        let forward = self.add_halfedge();
        let backward = self.add_halfedge();
        self.make_twins(forward, backward, edge);
        self.halfedge_mut(forward).origin = from;
        self.halfedge_mut(backward).origin = to;
        self.edge_mut(edge).halfedge = forward;
        (forward, backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{
        create_grid_mesh, create_icosahedron, create_octahedron, create_quad_pair,
        create_single_triangle, create_tetrahedron,
    };

    fn interior_edge(mesh: &HalfedgeMesh) -> EdgeId {
        mesh.edge_ids().find(|&e| !mesh.is_boundary_edge(e)).unwrap()
    }

    fn boundary_edge(mesh: &HalfedgeMesh) -> EdgeId {
        mesh.edge_ids().find(|&e| mesh.is_boundary_edge(e)).unwrap()
    }

    fn rejection(result: Result<impl std::fmt::Debug>) -> Rejection {
        result.unwrap_err().rejection().unwrap()
    }

    #[test]
    fn test_flip_degrees() {
        let mut mesh = create_icosahedron();
        let e = mesh.edge_ids().next().unwrap();

        let h0 = mesh.edge_halfedge(e);
        let t0 = mesh.twin(h0);
        let [a, b] = mesh.edge_vertices(e);
        let c = mesh.origin(mesh.next(mesh.next(h0)));
        let d = mesh.origin(mesh.next(mesh.next(t0)));
        let before = [a, b, c, d].map(|v| mesh.degree(v));

        mesh.flip_edge(e).unwrap();

        assert!(mesh.is_valid());
        let after = [a, b, c, d].map(|v| mesh.degree(v));
        assert_eq!(after, [before[0] - 1, before[1] - 1, before[2] + 1, before[3] + 1]);

        let [x, y] = mesh.edge_vertices(e);
        assert!((x, y) == (c, d) || (x, y) == (d, c));
    }

    #[test]
    fn test_flip_twice_restores_connectivity() {
        let mut mesh = create_octahedron();
        let e = mesh.edge_ids().next().unwrap();
        let [a, b] = mesh.edge_vertices(e);
        let positions: Vec<_> = mesh.vertices().map(|(_, v)| v.position).collect();

        mesh.flip_edge(e).unwrap();
        mesh.flip_edge(e).unwrap();

        assert!(mesh.is_valid());
        assert!(mesh.find_edge(a, b).is_some());
        let after: Vec<_> = mesh.vertices().map(|(_, v)| v.position).collect();
        assert_eq!(positions, after);
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.degree(v), 4);
        }
    }

    #[test]
    fn test_flip_rejections() {
        let mut mesh = create_single_triangle();
        let e = boundary_edge(&mesh);
        assert_eq!(rejection(mesh.flip_edge(e)), Rejection::BoundaryEdge);

        // Every pair of tetrahedron vertices is already adjacent.
        let mut mesh = create_tetrahedron();
        let e = interior_edge(&mesh);
        assert_eq!(rejection(mesh.flip_edge(e)), Rejection::DuplicateEdge);
        assert_eq!(mesh.edit_count(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_flip_quad_pair() {
        let mut mesh = create_quad_pair();
        let e = interior_edge(&mesh);
        mesh.flip_edge(e).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.edit_count(), 1);
    }

    #[test]
    fn test_split_interior_edge() {
        let mut mesh = create_icosahedron();
        let e = mesh.edge_ids().next().unwrap();
        let [a, b] = mesh.edge_vertices(e);
        let (v, ed, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());

        let m = mesh.split_edge(e).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_vertices(), v + 1);
        assert_eq!(mesh.num_edges(), ed + 3);
        assert_eq!(mesh.num_faces(), f + 2);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_eq!(mesh.degree(m), 4);

        let expected = nalgebra::center(mesh.position(a), mesh.position(b));
        assert_eq!(*mesh.position(m), expected);

        // The new vertex's halfedge runs along the split edge.
        let h = mesh.vertex(m).halfedge;
        assert_eq!(mesh.dest(h), b);
        assert!(mesh.find_edge(a, m) == Some(e));
    }

    #[test]
    fn test_split_boundary_edge() {
        let mut mesh = create_single_triangle();
        let e = mesh.edge_ids().next().unwrap();

        let m = mesh.split_edge_at(e, Point3::new(0.5, 0.0, 0.0)).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.degree(m), 3);
        assert!(mesh.is_boundary_vertex(m));
    }

    #[test]
    fn test_split_boundary_edge_from_boundary_side() {
        let mut mesh = create_grid_mesh(2);
        let boundary: Vec<_> = mesh
            .edge_ids()
            .filter(|&e| mesh.is_boundary_edge(e))
            .collect();
        for e in boundary {
            // Store the faceless side so the split has to reorient.
            let h = mesh.edge_halfedge(e);
            if !mesh.is_boundary_halfedge(h) {
                let t = mesh.twin(h);
                mesh.edge_mut(e).halfedge = t;
            }
            mesh.split_edge(e).unwrap();
            assert!(mesh.is_valid());
        }
        assert_eq!(mesh.num_faces(), 16);
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn test_split_non_triangle() {
        let square = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh = HalfedgeMesh::build(&square, &[vec![0, 1, 2, 3]]).unwrap();
        let e = mesh.edge_ids().next().unwrap();
        assert_eq!(rejection(mesh.split_edge(e)), Rejection::NotTriangle);
    }

    #[test]
    fn test_collapse_interior_edge() {
        let mut mesh = create_icosahedron();
        let e = mesh.edge_ids().next().unwrap();
        let [a, b] = mesh.edge_vertices(e);
        let (v, ed, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());

        let kept = mesh.collapse_edge(e).unwrap();

        assert_eq!(kept, a);
        assert!(!mesh.contains(b));
        assert!(!mesh.contains(e));
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_vertices(), v - 1);
        assert_eq!(mesh.num_edges(), ed - 3);
        assert_eq!(mesh.num_faces(), f - 2);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_eq!(mesh.degree(a), 6);
    }

    #[test]
    fn test_collapse_boundary_edge() {
        let mut mesh = create_grid_mesh(3);
        let (v, f) = (mesh.num_vertices(), mesh.num_faces());

        let e = mesh
            .edge_ids()
            .find(|&e| mesh.is_boundary_edge(e) && mesh.check_collapse(e).is_ok())
            .unwrap();
        mesh.collapse_edge(e).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_vertices(), v - 1);
        assert_eq!(mesh.num_faces(), f - 1);
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn test_collapse_single_triangle_rejected() {
        let mut mesh = create_single_triangle();
        for e in mesh.edge_ids().collect::<Vec<_>>() {
            assert_eq!(rejection(mesh.collapse_edge(e)), Rejection::OrphanEdge);
        }
        assert_eq!(mesh.num_faces(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_collapse_tetrahedron_rejected() {
        let mut mesh = create_tetrahedron();
        let e = mesh.edge_ids().next().unwrap();
        assert_eq!(rejection(mesh.collapse_edge(e)), Rejection::DegenerateFace);
    }

    #[test]
    fn test_collapse_refused_after_valence_drop() {
        // After one collapse two vertices drop to degree 3, so some collapses
        // must now be refused.
        let mut mesh = create_octahedron();
        let e = mesh.edge_ids().next().unwrap();
        mesh.collapse_edge(e).unwrap();
        assert!(mesh.is_valid());

        let rejected = mesh
            .edge_ids()
            .filter_map(|e| mesh.check_collapse(e).err())
            .filter_map(|err| err.rejection())
            .collect::<Vec<_>>();
        assert!(!rejected.is_empty());
    }

    #[test]
    fn test_collapse_link_condition() {
        // Tetrahedron without its base: the boundary is the triangle 0-1-2, so
        // the endpoints of 0-1 share vertex 2, which is not an apex of 0-1.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mut mesh = crate::mesh::build_from_triangles(&vertices, &faces).unwrap();

        let ids: Vec<_> = mesh.vertex_ids().collect();
        let e = mesh.find_edge(ids[0], ids[1]).unwrap();
        assert_eq!(rejection(mesh.collapse_edge(e)), Rejection::LinkCondition);
        assert_eq!(mesh.num_faces(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_boundary_pinch() {
        let mut mesh = create_quad_pair();
        let e = interior_edge(&mesh);
        assert_eq!(rejection(mesh.collapse_edge(e)), Rejection::BoundaryPinch);
    }

    #[test]
    fn test_stale_edge_handle() {
        let mut mesh = create_icosahedron();
        let e = mesh.edge_ids().next().unwrap();
        mesh.collapse_edge(e).unwrap();

        assert!(matches!(mesh.flip_edge(e), Err(MeshError::StaleHandle { .. })));
        assert!(matches!(mesh.split_edge(e), Err(MeshError::StaleHandle { .. })));
        assert!(matches!(mesh.collapse_edge(e), Err(MeshError::StaleHandle { .. })));
    }

    #[test]
    fn test_repeated_collapses_keep_invariants() {
        let mut mesh = create_icosahedron();
        let mut collapsed = 0;
        loop {
            let Some(e) = mesh.edge_ids().find(|&e| mesh.check_collapse(e).is_ok()) else {
                break;
            };
            mesh.collapse_edge(e).unwrap();
            collapsed += 1;
            assert!(mesh.is_valid());
            assert_eq!(mesh.euler_characteristic(), 2);
        }
        assert!(collapsed > 0);
        assert!(mesh.num_faces() >= 4);
    }

    #[test]
    fn test_collapse_flips_face() {
        // 3x3 grid: vertex 1 is (0.5, 0) and vertex 4 the centre.
        let mesh = create_grid_mesh(2);
        let ids: Vec<_> = mesh.vertex_ids().collect();
        let e = mesh.find_edge(ids[1], ids[4]).unwrap();

        assert!(!mesh.collapse_flips_face(e, &mesh.edge_midpoint(e)));
        assert!(mesh.collapse_flips_face(e, &Point3::new(0.5, 2.0, 0.0)));
        // Placement is not checked by the topological test.
        assert!(mesh.check_collapse(e).is_ok());
    }
}
