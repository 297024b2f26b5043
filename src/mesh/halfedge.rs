//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for manifold polygon meshes. Vertices, edges, half-edges and faces each live
//! in their own arena and refer to each other through generation-checked
//! handles, so local edits can create and destroy elements in O(1).
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, its **next** half-edge around its face,
//!   its **origin** vertex, its **edge** and its **face**
//! - Each vertex stores one outgoing half-edge
//! - Each edge and each face store one of their half-edges
//!
//! # Boundary Handling
//!
//! Boundary half-edges have no face. They are linked by `next` into boundary
//! loops, so walking `twin` then `next` enumerates the outgoing half-edges of
//! boundary vertices as well as interior ones.

use std::collections::{HashMap, HashSet};

use nalgebra::{Point3, Vector3};

use super::arena::Arena;
use super::index::{EdgeId, ElementId, ElementKind, FaceId, HalfedgeId, VertexId};
use super::quadric::Quadric;
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    pub halfedge: HalfedgeId,

    /// Staged position, written by an algorithm before positions are committed.
    pub(crate) new_position: Point3<f64>,

    /// True if the vertex was created by the running algorithm.
    pub(crate) is_new: bool,

    /// Accumulated quadric of the incident faces.
    pub(crate) quadric: Quadric,

    /// Centroid of the one-ring neighbours.
    pub(crate) centroid: Point3<f64>,
}

impl Vertex {
    pub(crate) fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfedgeId::default(),
            new_position: position,
            is_new: false,
            quadric: Quadric::zero(),
            centroid: position,
        }
    }
}

/// An undirected edge.
#[derive(Debug, Clone)]
pub struct Edge {
    /// One of the two half-edges of this edge.
    pub halfedge: HalfedgeId,

    /// True if the edge was created by the running algorithm.
    pub(crate) is_new: bool,

    /// Staged position of the vertex that will split this edge.
    pub(crate) new_position: Point3<f64>,
}

impl Edge {
    pub(crate) fn new(halfedge: HalfedgeId) -> Self {
        Self {
            halfedge,
            is_new: false,
            new_position: Point3::origin(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct Halfedge {
    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfedgeId,

    /// The next half-edge around the face (or boundary loop).
    pub next: HalfedgeId,

    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The undirected edge this half-edge belongs to.
    pub edge: EdgeId,

    /// The face this half-edge belongs to, `None` on the boundary.
    pub face: Option<FaceId>,
}

impl Halfedge {
    pub(crate) fn new() -> Self {
        Self {
            twin: HalfedgeId::default(),
            next: HalfedgeId::default(),
            origin: VertexId::default(),
            edge: EdgeId::default(),
            face: None,
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face.is_none()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfedgeId,

    /// Quadric of the supporting plane.
    pub(crate) quadric: Quadric,
}

impl Face {
    pub(crate) fn new(halfedge: HalfedgeId) -> Self {
        Self {
            halfedge,
            quadric: Quadric::zero(),
        }
    }
}

/// A half-edge mesh.
///
/// Owns every topological element. Traversal yields live elements in creation
/// order. Handles to destroyed elements never alias a later element; the
/// `try_*` accessors report them as [`MeshError::StaleHandle`].
#[derive(Debug, Clone, Default)]
pub struct HalfedgeMesh {
    pub(crate) vertices: Arena<VertexId, Vertex>,
    pub(crate) edges: Arena<EdgeId, Edge>,
    pub(crate) halfedges: Arena<HalfedgeId, Halfedge>,
    pub(crate) faces: Arena<FaceId, Face>,
    edit_count: u64,
}

impl HalfedgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed triangle mesh: E = 3F/2, H = 3F. Leave room for a boundary.
        let num_halfedges = num_faces * 3 + num_faces / 2;

        Self {
            vertices: Arena::with_capacity(num_vertices),
            edges: Arena::with_capacity(num_halfedges / 2),
            halfedges: Arena::with_capacity(num_halfedges),
            faces: Arena::with_capacity(num_faces),
            edit_count: 0,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of successful edits applied to this mesh.
    ///
    /// Any element handle obtained before the count changed may be stale.
    #[inline]
    pub fn edit_count(&self) -> u64 {
        self.edit_count
    }

    #[inline]
    pub(crate) fn bump_edit_count(&mut self) {
        self.edit_count += 1;
    }

    /// Get a vertex by ID.
    ///
    /// # Panics
    /// If the vertex has been destroyed.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    #[inline]
    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfedgeId) -> &Halfedge {
        &self.halfedges[id]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfedgeId) -> &mut Halfedge {
        &mut self.halfedges[id]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id]
    }

    /// Get a vertex, or [`MeshError::StaleHandle`] if it no longer exists.
    pub fn try_vertex(&self, id: VertexId) -> Result<&Vertex> {
        self.vertices.get(id).ok_or(MeshError::StaleHandle {
            kind: ElementKind::Vertex,
        })
    }

    /// Get an edge, or [`MeshError::StaleHandle`] if it no longer exists.
    pub fn try_edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges.get(id).ok_or(MeshError::StaleHandle {
            kind: ElementKind::Edge,
        })
    }

    /// Get a half-edge, or [`MeshError::StaleHandle`] if it no longer exists.
    pub fn try_halfedge(&self, id: HalfedgeId) -> Result<&Halfedge> {
        self.halfedges.get(id).ok_or(MeshError::StaleHandle {
            kind: ElementKind::Halfedge,
        })
    }

    /// Get a face, or [`MeshError::StaleHandle`] if it no longer exists.
    pub fn try_face(&self, id: FaceId) -> Result<&Face> {
        self.faces.get(id).ok_or(MeshError::StaleHandle {
            kind: ElementKind::Face,
        })
    }

    /// Check whether a handle of any kind still refers to a live element.
    pub fn contains(&self, id: impl Into<ElementId>) -> bool {
        match id.into() {
            ElementId::Vertex(v) => self.vertices.contains(v),
            ElementId::Edge(e) => self.edges.contains(e),
            ElementId::Halfedge(h) => self.halfedges.contains(h),
            ElementId::Face(f) => self.faces.contains(f),
        }
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfedgeId) -> HalfedgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfedgeId) -> HalfedgeId {
        self.halfedge(he).next
    }

    /// Get the half-edge whose `next` is `he`.
    ///
    /// Found by walking the outgoing half-edges of `he`'s origin, so this is
    /// O(degree) rather than O(face size).
    pub fn prev(&self, he: HalfedgeId) -> HalfedgeId {
        let mut out = he;
        loop {
            let incoming = self.twin(out);
            let following = self.next(incoming);
            if following == he {
                return incoming;
            }
            out = following;
        }
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfedgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfedgeId) -> VertexId {
        self.origin(self.twin(he))
    }

    /// Get the edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfedgeId) -> EdgeId {
        self.halfedge(he).edge
    }

    /// Get the face of a half-edge, `None` on the boundary.
    #[inline]
    pub fn face_of(&self, he: HalfedgeId) -> Option<FaceId> {
        self.halfedge(he).face
    }

    /// Get the stored half-edge of an edge.
    #[inline]
    pub fn edge_halfedge(&self, e: EdgeId) -> HalfedgeId {
        self.edge(e).halfedge
    }

    /// Get the two endpoints of an edge, origin of its stored half-edge first.
    pub fn edge_vertices(&self, e: EdgeId) -> [VertexId; 2] {
        let he = self.edge_halfedge(e);
        [self.origin(he), self.dest(he)]
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfedgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge has only one incident face.
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        let he = self.edge_halfedge(e);
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    /// Check if a face touches the boundary along one of its edges.
    pub fn is_boundary_face(&self, f: FaceId) -> bool {
        self.face_halfedges(f)
            .any(|he| self.is_boundary_halfedge(self.twin(he)))
    }

    /// Number of edges incident to a vertex.
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Number of sides of a face.
    pub fn face_degree(&self, f: FaceId) -> usize {
        self.face_halfedges(f).count()
    }

    /// Find the half-edge running from `from` to `to`.
    pub fn find_halfedge(&self, from: VertexId, to: VertexId) -> Option<HalfedgeId> {
        self.vertex_halfedges(from).find(|&he| self.dest(he) == to)
    }

    /// Find the edge joining two vertices.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.find_halfedge(a, b).map(|he| self.edge_of(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs in creation order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter()
    }

    /// Iterate over all edge IDs in creation order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys()
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter()
    }

    /// Iterate over all half-edge IDs in creation order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfedgeId> + '_ {
        self.halfedges.keys()
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfedgeId, &Halfedge)> + '_ {
        self.halfedges.iter()
    }

    /// Iterate over all face IDs in creation order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys()
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter()
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId) -> VertexHalfedgeIter<'_> {
        VertexHalfedgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over edges incident to a vertex.
    pub fn vertex_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex_halfedges(v).map(|he| self.edge_of(he))
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId) -> impl Iterator<Item = FaceId> + '_ {
        self.vertex_halfedges(v).filter_map(|he| self.face_of(he))
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfedgeIter<'_> {
        FaceHalfedgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the positions of the three vertices of a triangular face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut n = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            n += 1;
        }
        Point3::from(sum / n as f64)
    }

    /// Compute the area-weighted unit normal at a vertex.
    ///
    /// Returns `None` when the incident faces cancel out or have no area.
    pub fn vertex_normal(&self, v: VertexId) -> Option<Vector3<f64>> {
        let mut normal = Vector3::zeros();
        for f in self.vertex_faces(v) {
            let [p0, p1, p2] = self.face_positions(f);
            normal += (p1 - p0).cross(&(p2 - p0));
        }
        normal.try_normalize(1e-12)
    }

    /// Average position of the one-ring neighbours of a vertex.
    pub fn neighbor_centroid(&self, v: VertexId) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut n = 0usize;
        for w in self.vertex_neighbors(v) {
            sum += self.position(w).coords;
            n += 1;
        }
        if n == 0 {
            return *self.position(v);
        }
        Point3::from(sum / n as f64)
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        let [a, b] = self.edge_vertices(e);
        (self.position(b) - self.position(a)).norm()
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId) -> Point3<f64> {
        let [a, b] = self.edge_vertices(e);
        nalgebra::center(self.position(a), self.position(b))
    }

    /// Mean edge length, or zero for an empty mesh.
    pub fn average_edge_length(&self) -> f64 {
        if self.num_edges() == 0 {
            return 0.0;
        }
        let total: f64 = self.edge_ids().map(|e| self.edge_length(e)).sum();
        total / self.num_edges() as f64
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut positions = self.vertices().map(|(_, v)| v.position);
        let first = positions.next()?;

        let (min, max) = positions.fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        });

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// True if no half-edge lies on the boundary.
    pub fn is_closed(&self) -> bool {
        self.halfedges().all(|(_, he)| !he.is_boundary())
    }

    /// True if every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_degree(f) == 3)
    }

    // ==================== Element Management ====================

    pub(crate) fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        self.vertices.insert(Vertex::new(position))
    }

    pub(crate) fn add_edge(&mut self) -> EdgeId {
        self.edges.insert(Edge::new(HalfedgeId::default()))
    }

    pub(crate) fn add_halfedge(&mut self) -> HalfedgeId {
        self.halfedges.insert(Halfedge::new())
    }

    pub(crate) fn add_face(&mut self) -> FaceId {
        self.faces.insert(Face::new(HalfedgeId::default()))
    }

    /// Reset every per-element scratch field before an algorithm run.
    pub(crate) fn clear_scratch(&mut self) {
        for v in self.vertices.values_mut() {
            v.new_position = v.position;
            v.is_new = false;
            v.quadric = Quadric::zero();
            v.centroid = v.position;
        }
        for e in self.edges.values_mut() {
            e.is_new = false;
            e.new_position = Point3::origin();
        }
        for f in self.faces.values_mut() {
            f.quadric = Quadric::zero();
        }
    }

    // ==================== Validation ====================

    /// Check every connectivity invariant, describing the first violation.
    ///
    /// Verifies twin symmetry, face and boundary cycles, the vertex fan walk,
    /// edge incidence, and the absence of isolated vertices, self-loops and
    /// duplicate edges.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut outgoing: HashMap<VertexId, usize> = HashMap::new();
        let mut per_edge: HashMap<EdgeId, usize> = HashMap::new();

        for (h, he) in self.halfedges() {
            let twin = self
                .halfedges
                .get(he.twin)
                .ok_or_else(|| format!("{h}: dead twin {}", he.twin))?;
            if he.twin == h || twin.twin != h {
                return Err(format!("{h}: twin is not symmetric"));
            }
            let next = self
                .halfedges
                .get(he.next)
                .ok_or_else(|| format!("{h}: dead next {}", he.next))?;
            if !self.vertices.contains(he.origin) {
                return Err(format!("{h}: dead origin {}", he.origin));
            }
            if !self.edges.contains(he.edge) || twin.edge != he.edge {
                return Err(format!("{h}: edge disagrees with twin"));
            }
            if let Some(f) = he.face {
                if !self.faces.contains(f) {
                    return Err(format!("{h}: dead face {f}"));
                }
            }
            if he.face.is_none() && twin.face.is_none() {
                return Err(format!("{h}: edge {} has no face", he.edge));
            }
            if he.origin == twin.origin {
                return Err(format!("{h}: self-loop at {}", he.origin));
            }
            if next.origin != twin.origin {
                return Err(format!("{h}: next does not start at destination"));
            }
            if next.face != he.face {
                return Err(format!("{h}: next lies in a different face"));
            }

            *outgoing.entry(he.origin).or_default() += 1;
            *per_edge.entry(he.edge).or_default() += 1;
        }

        let limit = self.num_halfedges();

        for (f, face) in self.faces() {
            if self.halfedges.get(face.halfedge).map(|he| he.face) != Some(Some(f)) {
                return Err(format!("{f}: halfedge does not belong to the face"));
            }
            let mut he = face.halfedge;
            let mut count = 0;
            loop {
                count += 1;
                he = self.next(he);
                if he == face.halfedge {
                    break;
                }
                if count > limit {
                    return Err(format!("{f}: next cycle does not close"));
                }
            }
            if count < 3 {
                return Err(format!("{f}: only {count} sides"));
            }
        }

        let mut pairs = HashSet::new();
        for (e, edge) in self.edges() {
            let he = self
                .halfedges
                .get(edge.halfedge)
                .ok_or_else(|| format!("{e}: dead halfedge"))?;
            if he.edge != e {
                return Err(format!("{e}: halfedge belongs to {}", he.edge));
            }
            if per_edge.get(&e) != Some(&2) {
                return Err(format!("{e}: not exactly two halfedges"));
            }
            let a = he.origin;
            let b = self.halfedge(he.twin).origin;
            if !pairs.insert((a.min(b), a.max(b))) {
                return Err(format!("{e}: duplicate edge between {a} and {b}"));
            }
        }

        for (v, vertex) in self.vertices() {
            let he = self
                .halfedges
                .get(vertex.halfedge)
                .ok_or_else(|| format!("{v}: isolated or dead halfedge"))?;
            if he.origin != v {
                return Err(format!("{v}: halfedge does not start here"));
            }
            let expected = outgoing.get(&v).copied().unwrap_or(0);
            let mut walked = 0;
            let mut h = vertex.halfedge;
            loop {
                walked += 1;
                h = self.next(self.twin(h));
                if h == vertex.halfedge || walked > expected {
                    break;
                }
            }
            if walked != expected {
                return Err(format!(
                    "{v}: fan walk visits {walked} of {expected} halfedges"
                ));
            }
        }

        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.check_invariants().is_ok()
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfedgeIter<'a> {
    mesh: &'a HalfedgeMesh,
    start: HalfedgeId,
    current: HalfedgeId,
    done: bool,
}

impl<'a> VertexHalfedgeIter<'a> {
    fn new(mesh: &'a HalfedgeMesh, v: VertexId) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !mesh.halfedges.contains(start),
        }
    }
}

impl Iterator for VertexHalfedgeIter<'_> {
    type Item = HalfedgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // he: v -> w, twin(he): w -> v, and next(twin(he)) leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face or boundary loop.
pub struct FaceHalfedgeIter<'a> {
    mesh: &'a HalfedgeMesh,
    start: HalfedgeId,
    current: HalfedgeId,
    done: bool,
}

impl<'a> FaceHalfedgeIter<'a> {
    pub(crate) fn new(mesh: &'a HalfedgeMesh, start: HalfedgeId) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !mesh.halfedges.contains(start),
        }
    }
}

impl Iterator for FaceHalfedgeIter<'_> {
    type Item = HalfedgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
