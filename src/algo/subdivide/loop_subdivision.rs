//! Loop subdivision for triangle meshes.

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Operation, Rejection, Result};
use crate::mesh::{EdgeId, HalfedgeMesh, VertexId};

use super::SubdivideOptions;

/// Performs Loop subdivision on a triangle mesh.
///
/// Each iteration quadruples the number of triangles.
///
/// # Vertex Rules
///
/// - **Interior edge vertex**: `3/8 * (v0 + v1) + 1/8 * (v_left + v_right)`
/// - **Boundary edge vertex**: `1/2 * (v0 + v1)`
/// - **Interior vertex**: `(1 - n*β) * v + β * Σ(neighbors)`
/// - **Boundary vertex**: `1/8 * (left + right) + 3/4 * v`, where `left` and
///   `right` are its two boundary neighbours; any other boundary vertex stays
///   put
///
/// # Errors
/// [`MeshError::InvalidOperation`] if the mesh has a non-triangular face; the
/// mesh is left untouched in that case.
pub fn loop_subdivide(mesh: &mut HalfedgeMesh, options: &SubdivideOptions) -> Result<()> {
    if !mesh.is_triangle_mesh() {
        return Err(MeshError::rejected(
            Operation::Upsample,
            Rejection::NotTriangleMesh,
        ));
    }

    for _ in 0..options.iterations {
        loop_subdivide_once(mesh)?;
    }
    Ok(())
}

/// Warren's simplified Loop weight for a vertex of valence `n`.
pub fn loop_beta(n: usize) -> f64 {
    if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    }
}

/// Perform one iteration of Loop subdivision.
fn loop_subdivide_once(mesh: &mut HalfedgeMesh) -> Result<()> {
    let initial_faces = mesh.num_faces();
    mesh.clear_scratch();

    // Phases 1 and 2 read only the original topology.
    stage_vertex_positions(mesh);
    stage_edge_positions(mesh);

    // Phase 3: split every original edge.
    let original_edges: Vec<EdgeId> = mesh.edge_ids().collect();
    for e in original_edges {
        let [a, b] = mesh.edge_vertices(e);
        let staged = mesh.edge(e).new_position;

        let m = mesh.split_edge(e)?;
        {
            let vertex = mesh.vertex_mut(m);
            vertex.is_new = true;
            vertex.new_position = staged;
        }

        // The two halves of the split edge stay old; the edges to the apexes
        // are new.
        let spokes: Vec<_> = mesh.vertex_halfedges(m).collect();
        for he in spokes {
            let w = mesh.dest(he);
            let edge = mesh.edge_of(he);
            mesh.edge_mut(edge).is_new = w != a && w != b;
        }
    }

    // Phase 4: flip new edges between an old and a new vertex.
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();
    for e in edges {
        if !mesh.edge(e).is_new {
            continue;
        }
        let [a, b] = mesh.edge_vertices(e);
        if mesh.vertex(a).is_new != mesh.vertex(b).is_new {
            mesh.flip_edge(e)?;
        }
    }

    // Phase 5: commit staged positions.
    let vertices: Vec<VertexId> = mesh.vertex_ids().collect();
    for v in vertices {
        let staged = mesh.vertex(v).new_position;
        mesh.set_position(v, staged);
    }

    debug!(
        "loop subdivision: {} -> {} faces",
        initial_faces,
        mesh.num_faces()
    );
    Ok(())
}

/// Smoothed positions for the original vertices.
fn stage_vertex_positions(mesh: &mut HalfedgeMesh) {
    let vertices: Vec<VertexId> = mesh.vertex_ids().collect();

    for v in vertices {
        let pos = *mesh.position(v);

        let new_pos = if mesh.is_boundary_vertex(v) {
            let boundary_neighbors: Vec<Point3<f64>> = mesh
                .vertex_halfedges(v)
                .filter(|&he| mesh.is_boundary_edge(mesh.edge_of(he)))
                .map(|he| *mesh.position(mesh.dest(he)))
                .collect();

            match boundary_neighbors.as_slice() {
                [left, right] => Point3::from(
                    (left.coords + right.coords) * (1.0 / 8.0) + pos.coords * (3.0 / 4.0),
                ),
                _ => pos,
            }
        } else {
            let mut neighbor_sum = Vector3::zeros();
            let mut n = 0;
            for w in mesh.vertex_neighbors(v) {
                neighbor_sum += mesh.position(w).coords;
                n += 1;
            }
            let beta = loop_beta(n);
            Point3::from(pos.coords * (1.0 - n as f64 * beta) + neighbor_sum * beta)
        };

        mesh.vertex_mut(v).new_position = new_pos;
    }
}

/// Positions of the vertices that will split each edge.
fn stage_edge_positions(mesh: &mut HalfedgeMesh) {
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();

    for e in edges {
        let new_pos = if mesh.is_boundary_edge(e) {
            mesh.edge_midpoint(e)
        } else {
            let h0 = mesh.edge_halfedge(e);
            let t0 = mesh.twin(h0);
            let p0 = mesh.position(mesh.origin(h0));
            let p1 = mesh.position(mesh.origin(t0));
            let opp0 = mesh.position(mesh.origin(mesh.next(mesh.next(h0))));
            let opp1 = mesh.position(mesh.origin(mesh.next(mesh.next(t0))));

            Point3::from(
                (p0.coords + p1.coords) * (3.0 / 8.0) + (opp0.coords + opp1.coords) * (1.0 / 8.0),
            )
        };

        mesh.edge_mut(e).new_position = new_pos;
    }
}
