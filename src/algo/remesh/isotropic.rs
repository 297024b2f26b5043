//! Isotropic remeshing algorithm.

use log::{debug, trace};
use nalgebra::Point3;

use crate::error::{MeshError, Operation, Rejection, Result};
use crate::mesh::{EdgeId, HalfedgeMesh, VertexId};

use super::RemeshOptions;

/// Cosine of 30°. A boundary that turns further than this at a vertex makes
/// that vertex a corner.
const CORNER_COS: f64 = 0.866_025_403_784_438_6;

/// Performs isotropic remeshing on a triangle mesh.
///
/// Every pass enumerates a snapshot of the elements taken when the pass
/// starts; elements destroyed earlier in the same pass are skipped and
/// elements created by it are left for the next iteration.
///
/// # Algorithm Steps (per iteration)
///
/// 1. **Edge splitting**: Split edges longer than 4/3 × L
/// 2. **Edge collapsing**: Collapse edges shorter than 4/5 × L, unless the
///    collapse is illegal or would create an edge longer than 4/3 × L
/// 3. **Edge flipping**: Flip an edge when that lowers the largest valence
///    deviation among its four vertices
/// 4. **Tangential smoothing**: Move vertices towards their neighbour
///    centroid within the tangent plane
///
/// Open meshes keep their outline. Boundary vertices only slide along the
/// boundary, corners never move, and a collapse touching the boundary keeps
/// the boundary endpoint. Flips and collapses that would fold a face over are
/// skipped.
///
/// # Errors
/// [`MeshError::InvalidParameter`] for invalid options and
/// [`MeshError::InvalidOperation`] for a mesh with non-triangular faces. The
/// mesh is left untouched in both cases.
pub fn isotropic_remesh(mesh: &mut HalfedgeMesh, options: &RemeshOptions) -> Result<()> {
    options.validate()?;
    if !mesh.is_triangle_mesh() {
        return Err(MeshError::rejected(
            Operation::Resample,
            Rejection::NotTriangleMesh,
        ));
    }

    let target = options.resolve_target_length(mesh);
    if target <= 0.0 {
        return Ok(());
    }
    let high = target * 4.0 / 3.0;
    let low = target * 4.0 / 5.0;
    let initial_faces = mesh.num_faces();

    for iter in 0..options.iterations {
        let splits = split_long_edges(mesh, high, options.preserve_boundary)?;
        let collapses = collapse_short_edges(mesh, low, high, options.preserve_boundary)?;
        let flips = flip_edges_to_improve_valence(mesh)?;
        for _ in 0..options.smoothing_iterations {
            tangential_smooth(mesh, options.smoothing_lambda, options.preserve_boundary);
        }

        debug!(
            "remesh iteration {}: {} splits, {} collapses, {} flips, {} faces",
            iter + 1,
            splits,
            collapses,
            flips,
            mesh.num_faces()
        );
    }

    mesh.bump_edit_count();
    debug!(
        "isotropic remesh: {} -> {} faces (target length {:.6})",
        initial_faces,
        mesh.num_faces(),
        target
    );
    Ok(())
}

/// Split every edge longer than `high`.
fn split_long_edges(mesh: &mut HalfedgeMesh, high: f64, preserve_boundary: bool) -> Result<usize> {
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();
    let mut splits = 0;

    for e in edges {
        if preserve_boundary && mesh.is_boundary_edge(e) {
            continue;
        }
        if mesh.edge_length(e) <= high {
            continue;
        }
        match mesh.split_edge(e) {
            Ok(_) => splits += 1,
            Err(err) if err.is_invalid_operation() => trace!("skipping split of {e}: {err}"),
            Err(err) => return Err(err),
        }
    }
    Ok(splits)
}

/// Collapse every edge shorter than `low`.
fn collapse_short_edges(
    mesh: &mut HalfedgeMesh,
    low: f64,
    high: f64,
    preserve_boundary: bool,
) -> Result<usize> {
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();
    let mut collapses = 0;

    for e in edges {
        // Destroyed by an earlier collapse in this pass.
        if !mesh.contains(e) {
            continue;
        }
        if mesh.edge_length(e) >= low {
            continue;
        }

        let [a, b] = mesh.edge_vertices(e);
        let a_boundary = mesh.is_boundary_vertex(a);
        let b_boundary = mesh.is_boundary_vertex(b);
        if preserve_boundary && (a_boundary || b_boundary) {
            continue;
        }

        // A boundary endpoint stays on the boundary, a corner stays put.
        let target = match (a_boundary, b_boundary) {
            (true, false) => *mesh.position(a),
            (false, true) => *mesh.position(b),
            (true, true) => match (is_corner(mesh, a), is_corner(mesh, b)) {
                (true, true) => continue,
                (true, false) => *mesh.position(a),
                (false, true) => *mesh.position(b),
                (false, false) => mesh.edge_midpoint(e),
            },
            (false, false) => mesh.edge_midpoint(e),
        };
        if creates_long_edge(mesh, a, b, &target, high) {
            continue;
        }
        if mesh.collapse_flips_face(e, &target) {
            continue;
        }

        match mesh.collapse_edge_to(e, target) {
            Ok(_) => collapses += 1,
            Err(err) if err.is_invalid_operation() => {}
            Err(err) => return Err(err),
        }
    }
    Ok(collapses)
}

/// True if merging `a` and `b` at `target` would leave an edge longer than `high`.
fn creates_long_edge(
    mesh: &HalfedgeMesh,
    a: VertexId,
    b: VertexId,
    target: &Point3<f64>,
    high: f64,
) -> bool {
    mesh.vertex_neighbors(a)
        .chain(mesh.vertex_neighbors(b))
        .filter(|&w| w != a && w != b)
        .any(|w| (mesh.position(w) - target).norm() > high)
}

/// The previous and next vertices along the boundary loop through `v`.
fn boundary_neighbors(mesh: &HalfedgeMesh, v: VertexId) -> Option<[VertexId; 2]> {
    let out = mesh
        .vertex_halfedges(v)
        .find(|&h| mesh.is_boundary_halfedge(h))?;
    Some([mesh.origin(mesh.prev(out)), mesh.dest(out)])
}

/// True for a boundary vertex where the boundary turns sharply.
fn is_corner(mesh: &HalfedgeMesh, v: VertexId) -> bool {
    let Some([prev, next]) = boundary_neighbors(mesh, v) else {
        return false;
    };
    let p = mesh.position(v);
    let incoming = (p - mesh.position(prev)).try_normalize(1e-12);
    let outgoing = (mesh.position(next) - p).try_normalize(1e-12);
    match (incoming, outgoing) {
        (Some(i), Some(o)) => i.dot(&o) < CORNER_COS,
        _ => true,
    }
}

/// True if flipping `e` keeps both of its endpoints `a`, `b` on opposite
/// sides of the new edge `c`-`d`.
fn flip_keeps_orientation(mesh: &HalfedgeMesh, [a, b, c, d]: [VertexId; 4]) -> bool {
    let pc = mesh.position(c);
    let diagonal = mesh.position(d) - pc;
    let side_a = diagonal.cross(&(mesh.position(a) - pc));
    let side_b = diagonal.cross(&(mesh.position(b) - pc));
    side_a.dot(&side_b) < 0.0
}

fn ideal_valence(mesh: &HalfedgeMesh, v: VertexId) -> i64 {
    if mesh.is_boundary_vertex(v) {
        4
    } else {
        6
    }
}

/// Flip every interior edge whose flip lowers the largest valence deviation
/// of its two endpoints and two opposite apexes.
fn flip_edges_to_improve_valence(mesh: &mut HalfedgeMesh) -> Result<usize> {
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();
    let mut flips = 0;

    for e in edges {
        if mesh.is_boundary_edge(e) {
            continue;
        }

        let h0 = mesh.edge_halfedge(e);
        let t0 = mesh.twin(h0);
        let a = mesh.origin(h0);
        let b = mesh.origin(t0);
        let c = mesh.origin(mesh.next(mesh.next(h0)));
        let d = mesh.origin(mesh.next(mesh.next(t0)));

        let deviation = |v: VertexId, delta: i64| -> i64 {
            (mesh.degree(v) as i64 + delta - ideal_valence(mesh, v)).abs()
        };
        let before = [deviation(a, 0), deviation(b, 0), deviation(c, 0), deviation(d, 0)];
        let after = [deviation(a, -1), deviation(b, -1), deviation(c, 1), deviation(d, 1)];

        if after.iter().max() >= before.iter().max() {
            continue;
        }
        if !flip_keeps_orientation(mesh, [a, b, c, d]) {
            continue;
        }

        match mesh.flip_edge(e) {
            Ok(_) => flips += 1,
            Err(err) if err.is_invalid_operation() => {}
            Err(err) => return Err(err),
        }
    }
    Ok(flips)
}

/// One step of tangential relaxation.
///
/// Centroids and updated positions are staged for every vertex before any
/// vertex moves. Boundary vertices relax towards the midpoint of their two
/// boundary neighbours, along the chord between them.
fn tangential_smooth(mesh: &mut HalfedgeMesh, lambda: f64, preserve_boundary: bool) {
    let vertices: Vec<VertexId> = mesh.vertex_ids().collect();

    for &v in &vertices {
        let p = *mesh.position(v);

        let (centroid, staged) = match boundary_neighbors(mesh, v) {
            Some(_) if preserve_boundary || is_corner(mesh, v) => (p, p),
            Some([prev, next]) => {
                let (p0, p1) = (*mesh.position(prev), *mesh.position(next));
                let centroid = nalgebra::center(&p0, &p1);
                let staged = match (p1 - p0).try_normalize(1e-12) {
                    Some(t) => p + t * (centroid - p).dot(&t) * lambda,
                    None => p,
                };
                (centroid, staged)
            }
            None => {
                let centroid = mesh.neighbor_centroid(v);
                let offset = centroid - p;
                let tangential = match mesh.vertex_normal(v) {
                    Some(n) => offset - n * offset.dot(&n),
                    None => offset,
                };
                (centroid, p + tangential * lambda)
            }
        };

        let vertex = mesh.vertex_mut(v);
        vertex.centroid = centroid;
        vertex.new_position = staged;
    }

    for v in vertices {
        let staged = mesh.vertex(v).new_position;
        mesh.set_position(v, staged);
    }
}
