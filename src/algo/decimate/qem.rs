//! Quadric Error Metrics (QEM) decimation.

use log::{debug, trace};
use nalgebra::Point3;

use crate::error::{MeshError, Operation, Rejection, Result};
use crate::mesh::{EdgeId, HalfedgeMesh, Quadric, VertexId};

use super::queue::MutablePriorityQueue;
use super::DecimateOptions;

/// Weight of the planes that pin boundary edges, relative to a face plane.
const BOUNDARY_PLANE_WEIGHT: f64 = 100.0;

/// A candidate edge collapse.
///
/// Built from the sum of the endpoints' quadrics; `optimal` minimizes that
/// combined quadric and `cost` is its value there.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    /// The edge to collapse.
    pub edge: EdgeId,
    /// Where the merged vertex goes.
    pub optimal: Point3<f64>,
    /// Quadric error at `optimal`.
    pub cost: f64,
    /// Combined quadric of both endpoints.
    pub quadric: Quadric,
}

impl EdgeRecord {
    /// Build the record for `edge` from the current vertex quadrics.
    ///
    /// An edge with exactly one endpoint on the boundary collapses onto that
    /// endpoint. Otherwise a singular system falls back to the edge midpoint,
    /// as does an optimum further than two edge lengths from the midpoint.
    pub fn new(mesh: &HalfedgeMesh, edge: EdgeId) -> Self {
        let [a, b] = mesh.edge_vertices(edge);
        let quadric = mesh.vertex(a).quadric + mesh.vertex(b).quadric;
        let midpoint = mesh.edge_midpoint(edge);

        let optimal = match (mesh.is_boundary_vertex(a), mesh.is_boundary_vertex(b)) {
            (true, false) => *mesh.position(a),
            (false, true) => *mesh.position(b),
            _ => match quadric.minimizer() {
                Ok(p) if (p - midpoint).norm() < 2.0 * mesh.edge_length(edge) => p,
                Ok(_) => midpoint,
                Err(MeshError::SingularSystem) => {
                    trace!("singular quadric on {edge}, using midpoint");
                    midpoint
                }
                Err(_) => midpoint,
            },
        };

        Self {
            edge,
            optimal,
            cost: quadric.evaluate(&optimal),
            quadric,
        }
    }
}

/// What one pass of the decimation loop did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    /// The cheapest record was collapsed into `survivor`.
    Collapsed { survivor: VertexId, cost: f64 },
    /// The cheapest record was illegal, would fold a face, or would pass the
    /// target; it is gone from the queue and nothing changed.
    Dropped,
    /// Target reached, error bound hit, or queue empty.
    Done,
}

/// Performs QEM decimation on a triangle mesh.
///
/// Repeatedly collapses the cheapest legal edge until the face count reaches
/// the target or no candidate is left. A collapse that would take the face
/// count below the target is skipped, so the result never undershoots it.
///
/// Boundary edges carry extra planes perpendicular to their face, so an open
/// mesh keeps its outline: boundary vertices only slide along the boundary
/// and corners stay put.
///
/// # Errors
/// [`MeshError::InvalidOperation`] if the mesh has a non-triangular face; the
/// mesh is left untouched in that case.
pub fn qem_decimate(mesh: &mut HalfedgeMesh, options: &DecimateOptions) -> Result<()> {
    if !mesh.is_triangle_mesh() {
        return Err(MeshError::rejected(
            Operation::Downsample,
            Rejection::NotTriangleMesh,
        ));
    }

    let initial_faces = mesh.num_faces();
    let target_faces = options.compute_target(initial_faces);
    if target_faces >= initial_faces {
        return Ok(());
    }

    let mut queue = build_queue(mesh, options);
    let mut collapses = 0usize;
    let mut skipped = 0usize;

    loop {
        match decimate_step(mesh, &mut queue, options, target_faces)? {
            Step::Collapsed { .. } => collapses += 1,
            Step::Dropped => skipped += 1,
            Step::Done => break,
        }
    }

    debug!(
        "qem decimation: {} -> {} faces (target {}, {} collapses, {} candidates dropped)",
        initial_faces,
        mesh.num_faces(),
        target_faces,
        collapses,
        skipped
    );
    Ok(())
}

/// Compute every quadric and queue a record for each collapsible edge.
pub(crate) fn build_queue(
    mesh: &mut HalfedgeMesh,
    options: &DecimateOptions,
) -> MutablePriorityQueue<EdgeId, EdgeRecord> {
    mesh.clear_scratch();
    compute_face_quadrics(mesh);
    compute_vertex_quadrics(mesh);

    let mut queue = MutablePriorityQueue::new();
    let edges: Vec<EdgeId> = mesh.edge_ids().collect();
    for e in edges {
        enqueue(mesh, &mut queue, e, options);
    }
    queue
}

/// Pop the cheapest record and collapse it if that is legal.
pub(crate) fn decimate_step(
    mesh: &mut HalfedgeMesh,
    queue: &mut MutablePriorityQueue<EdgeId, EdgeRecord>,
    options: &DecimateOptions,
    target_faces: usize,
) -> Result<Step> {
    if mesh.num_faces() <= target_faces {
        return Ok(Step::Done);
    }
    let Some((edge, cost, record)) = queue.pop() else {
        return Ok(Step::Done);
    };
    if options.max_error.is_some_and(|max_err| cost > max_err) {
        return Ok(Step::Done);
    }

    if let Err(err) = mesh.check_collapse(edge) {
        trace!("dropping candidate {edge}: {err}");
        return Ok(Step::Dropped);
    }
    if mesh.collapse_flips_face(edge, &record.optimal) {
        trace!("dropping candidate {edge}: a face would fold over");
        return Ok(Step::Dropped);
    }
    let removed_faces = if mesh.is_boundary_edge(edge) { 1 } else { 2 };
    if mesh.num_faces() - removed_faces < target_faces {
        return Ok(Step::Dropped);
    }

    let [a, b] = mesh.edge_vertices(edge);
    dequeue_around(mesh, queue, a);
    dequeue_around(mesh, queue, b);

    let survivor = mesh.collapse_edge_to(edge, record.optimal)?;
    mesh.vertex_mut(survivor).quadric = record.quadric;

    let around: Vec<EdgeId> = mesh.vertex_edges(survivor).collect();
    for e in around {
        enqueue(mesh, queue, e, options);
    }
    Ok(Step::Collapsed { survivor, cost })
}

fn enqueue(
    mesh: &HalfedgeMesh,
    queue: &mut MutablePriorityQueue<EdgeId, EdgeRecord>,
    e: EdgeId,
    options: &DecimateOptions,
) {
    if options.preserve_boundary && mesh.is_boundary_edge(e) {
        return;
    }
    let record = EdgeRecord::new(mesh, e);
    queue.insert(e, record.cost, record);
}

fn dequeue_around(
    mesh: &HalfedgeMesh,
    queue: &mut MutablePriorityQueue<EdgeId, EdgeRecord>,
    v: VertexId,
) {
    for e in mesh.vertex_edges(v) {
        queue.remove(e);
    }
}

/// Plane quadric of every face. Degenerate faces contribute nothing.
fn compute_face_quadrics(mesh: &mut HalfedgeMesh) {
    let faces: Vec<_> = mesh.face_ids().collect();
    for f in faces {
        let [p0, p1, p2] = mesh.face_positions(f);
        let normal = (p1 - p0).cross(&(p2 - p0));

        let quadric = match normal.try_normalize(1e-10) {
            Some(n) => Quadric::from_point_normal(&p0, &n),
            None => Quadric::zero(),
        };
        mesh.face_mut(f).quadric = quadric;
    }
}

/// Each vertex's quadric is the sum of its incident face quadrics, plus a
/// weighted plane through every incident boundary edge, perpendicular to the
/// edge's face.
fn compute_vertex_quadrics(mesh: &mut HalfedgeMesh) {
    let vertices: Vec<_> = mesh.vertex_ids().collect();
    for &v in &vertices {
        let quadric: Quadric = mesh.vertex_faces(v).map(|f| mesh.face(f).quadric).sum();
        mesh.vertex_mut(v).quadric = quadric;
    }

    let boundary: Vec<EdgeId> = mesh
        .edge_ids()
        .filter(|&e| mesh.is_boundary_edge(e))
        .collect();
    for e in boundary {
        let Some(quadric) = boundary_plane(mesh, e) else {
            continue;
        };
        for v in mesh.edge_vertices(e) {
            mesh.vertex_mut(v).quadric += quadric;
        }
    }
}

/// The weighted plane containing boundary edge `e` and the normal of its face.
fn boundary_plane(mesh: &HalfedgeMesh, e: EdgeId) -> Option<Quadric> {
    let h = mesh.edge_halfedge(e);
    let inner = if mesh.is_boundary_halfedge(h) { mesh.twin(h) } else { h };
    let face = mesh.face_of(inner)?;

    let [p0, p1, p2] = mesh.face_positions(face);
    let face_normal = (p1 - p0).cross(&(p2 - p0));
    let from = *mesh.position(mesh.origin(inner));
    let to = *mesh.position(mesh.dest(inner));
    let normal = (to - from).cross(&face_normal).try_normalize(1e-10)?;
    Some(Quadric::from_point_normal(&from, &normal) * BOUNDARY_PLANE_WEIGHT)
}
