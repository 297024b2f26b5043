//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists (polygon soup)
//! as found in mesh file formats, and converts them back.

use std::collections::HashMap;

use nalgebra::Point3;
use slotmap::{Key, SecondaryMap};

use super::halfedge::HalfedgeMesh;
use super::index::{HalfedgeId, VertexId};
use crate::error::{Result, TopologyError};

impl HalfedgeMesh {
    /// Build a mesh from vertex positions and polygons given as index lists.
    ///
    /// See [`build_from_polygons`].
    pub fn build<F: AsRef<[usize]>>(positions: &[Point3<f64>], faces: &[F]) -> Result<Self> {
        build_from_polygons(positions, faces)
    }
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use meshedit::mesh::{build_from_triangles, HalfedgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfedgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfedgeMesh> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and polygon faces.
///
/// Faces must be consistently wound. Shared directed-edge/reverse pairs are
/// stitched into twins; an edge used by only one face gets a boundary
/// half-edge, and boundary half-edges are linked into loops.
///
/// # Errors
/// [`MeshError::InvalidTopology`](crate::MeshError::InvalidTopology) if the
/// input is empty, has out-of-range or repeated indices, faces with fewer
/// than three corners, or does not describe a manifold surface.
pub fn build_from_polygons<F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<HalfedgeMesh> {
    validate_soup(vertices.len(), faces)?;

    let num_corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = HalfedgeMesh::with_capacity(vertices.len(), num_corners / 3);

    let vertex_ids: Vec<VertexId> = vertices.iter().map(|&p| mesh.add_vertex(p)).collect();

    // Directed edge (v0, v1) -> half-edge running v0 -> v1
    let mut directed: HashMap<(usize, usize), HalfedgeId> = HashMap::with_capacity(num_corners);
    let mut interior: Vec<(HalfedgeId, usize, usize)> = Vec::with_capacity(num_corners);

    // First pass: faces and their half-edge cycles
    for face in faces {
        let face = face.as_ref();
        let face_id = mesh.add_face();
        let hes: Vec<HalfedgeId> = face.iter().map(|_| mesh.add_halfedge()).collect();
        mesh.face_mut(face_id).halfedge = hes[0];

        for (i, &he) in hes.iter().enumerate() {
            let v0 = face[i];
            let v1 = face[(i + 1) % face.len()];
            {
                let h = mesh.halfedge_mut(he);
                h.origin = vertex_ids[v0];
                h.next = hes[(i + 1) % hes.len()];
                h.face = Some(face_id);
            }

            let vertex = mesh.vertex_mut(vertex_ids[v0]);
            if vertex.halfedge.is_null() {
                vertex.halfedge = he;
            }

            if directed.insert((v0, v1), he).is_some() {
                return Err(TopologyError::DuplicateHalfedge { v0, v1 }.into());
            }
            interior.push((he, v0, v1));
        }
    }

    // Second pass: twins and edges, boundary half-edges where no twin exists
    let mut boundary: Vec<HalfedgeId> = Vec::new();
    for &(he, v0, v1) in &interior {
        if !mesh.halfedge(he).twin.is_null() {
            continue;
        }

        let edge = mesh.add_edge();
        mesh.edge_mut(edge).halfedge = he;

        let twin = match directed.get(&(v1, v0)) {
            Some(&twin) => twin,
            None => {
                let b = mesh.add_halfedge();
                mesh.halfedge_mut(b).origin = vertex_ids[v1];
                boundary.push(b);
                b
            }
        };

        for (h, t) in [(he, twin), (twin, he)] {
            let h = mesh.halfedge_mut(h);
            h.twin = t;
            h.edge = edge;
        }
    }

    link_boundary_loops(&mut mesh, &boundary, &vertex_ids)?;
    check_vertex_fans(&mesh, &vertex_ids)?;

    Ok(mesh)
}

fn validate_soup<F: AsRef<[usize]>>(num_vertices: usize, faces: &[F]) -> Result<()> {
    if faces.is_empty() {
        return Err(TopologyError::EmptyMesh.into());
    }

    let mut referenced = vec![false; num_vertices];
    let mut undirected: HashMap<(usize, usize), usize> = HashMap::new();

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(TopologyError::TooFewCorners {
                face: fi,
                count: face.len(),
            }
            .into());
        }

        for (i, &vi) in face.iter().enumerate() {
            if vi >= num_vertices {
                return Err(TopologyError::InvalidVertexIndex { face: fi, vertex: vi }.into());
            }
            if face[..i].contains(&vi) {
                return Err(TopologyError::DegenerateFace { face: fi }.into());
            }
            referenced[vi] = true;
        }

        for i in 0..face.len() {
            let (a, b) = (face[i], face[(i + 1) % face.len()]);
            let key = (a.min(b), a.max(b));
            let count = undirected.entry(key).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(TopologyError::NonManifoldEdge { v0: key.0, v1: key.1 }.into());
            }
        }
    }

    if let Some(vertex) = referenced.iter().position(|&r| !r) {
        return Err(TopologyError::IsolatedVertex { vertex }.into());
    }

    Ok(())
}

/// Link boundary half-edges into loops.
///
/// A vertex with two outgoing boundary half-edges is the pinch point of two
/// fans and is rejected.
fn link_boundary_loops(
    mesh: &mut HalfedgeMesh,
    boundary: &[HalfedgeId],
    vertex_ids: &[VertexId],
) -> Result<()> {
    let index_of: SecondaryMap<VertexId, usize> = vertex_ids
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();

    let mut outgoing: SecondaryMap<VertexId, HalfedgeId> = SecondaryMap::new();
    for &he in boundary {
        let origin = mesh.origin(he);
        if outgoing.insert(origin, he).is_some() {
            return Err(TopologyError::NonManifoldVertex {
                vertex: index_of[origin],
            }
            .into());
        }
    }

    for &he in boundary {
        let dest = mesh.dest(he);
        let next = *outgoing
            .get(dest)
            .ok_or(TopologyError::NonManifoldVertex {
                vertex: index_of[dest],
            })?;
        mesh.halfedge_mut(he).next = next;
    }

    Ok(())
}

/// Every outgoing half-edge of a vertex must be reachable by the fan walk.
fn check_vertex_fans(mesh: &HalfedgeMesh, vertex_ids: &[VertexId]) -> Result<()> {
    let mut outgoing: HashMap<VertexId, usize> = HashMap::with_capacity(vertex_ids.len());
    for (_, he) in mesh.halfedges() {
        *outgoing.entry(he.origin).or_insert(0) += 1;
    }

    for (vertex, &v) in vertex_ids.iter().enumerate() {
        let walked = mesh.vertex_halfedges(v).take(mesh.num_halfedges()).count();
        if Some(&walked) != outgoing.get(&v) {
            return Err(TopologyError::NonManifoldVertex { vertex }.into());
        }
    }

    Ok(())
}

/// Convert a mesh to vertices and triangles, fan-triangulating larger faces.
///
/// Vertices are densely re-indexed in traversal order.
pub fn to_face_vertex(mesh: &HalfedgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let (vertices, polygons) = to_polygons(mesh);

    let faces = polygons
        .iter()
        .flat_map(|poly| (1..poly.len() - 1).map(move |i| [poly[0], poly[i], poly[i + 1]]))
        .collect();

    (vertices, faces)
}

/// Convert a mesh to vertices and polygons, densely re-indexed in traversal order.
pub fn to_polygons(mesh: &HalfedgeMesh) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mut index: SecondaryMap<VertexId, usize> = SecondaryMap::with_capacity(mesh.num_vertices());
    let mut vertices = Vec::with_capacity(mesh.num_vertices());
    for (v, vertex) in mesh.vertices() {
        index.insert(v, vertices.len());
        vertices.push(vertex.position);
    }

    let polygons = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| index[v]).collect())
        .collect();

    (vertices, polygons)
}
