//! Property tests: random edit sequences keep a closed mesh manifold.

use meshedit::prelude::*;
use nalgebra::Point3;
use proptest::prelude::*;

fn icosahedron() -> HalfedgeMesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let vertices: Vec<Point3<f64>> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect();
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    build_from_triangles(&vertices, &faces).unwrap()
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Flip(usize),
    Split(usize),
    Collapse(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<usize>().prop_map(Edit::Flip),
        any::<usize>().prop_map(Edit::Split),
        any::<usize>().prop_map(Edit::Collapse),
    ]
}

fn pick_edge(mesh: &HalfedgeMesh, seed: usize) -> EdgeId {
    let n = mesh.num_edges();
    mesh.edge_ids().nth(seed % n).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_edits_preserve_invariants(edits in prop::collection::vec(edit_strategy(), 1..60)) {
        let mut mesh = icosahedron();

        for edit in edits {
            let (v, f) = (mesh.num_vertices(), mesh.num_faces());
            let edits_before = mesh.edit_count();

            match edit {
                Edit::Flip(seed) => {
                    let e = pick_edge(&mesh, seed);
                    if mesh.flip_edge(e).is_ok() {
                        prop_assert_eq!((mesh.num_vertices(), mesh.num_faces()), (v, f));
                    }
                }
                Edit::Split(seed) => {
                    let e = pick_edge(&mesh, seed);
                    mesh.split_edge(e).unwrap();
                    prop_assert_eq!((mesh.num_vertices(), mesh.num_faces()), (v + 1, f + 2));
                }
                Edit::Collapse(seed) => {
                    let e = pick_edge(&mesh, seed);
                    match mesh.collapse_edge(e) {
                        Ok(_) => {
                            prop_assert_eq!((mesh.num_vertices(), mesh.num_faces()), (v - 1, f - 2));
                        }
                        Err(err) => {
                            prop_assert!(err.is_invalid_operation());
                            prop_assert_eq!(mesh.edit_count(), edits_before);
                        }
                    }
                }
            }

            prop_assert_eq!(mesh.check_invariants(), Ok(()));
            prop_assert_eq!(mesh.euler_characteristic(), 2);
            prop_assert!(mesh.is_closed());
            for h in mesh.halfedge_ids() {
                prop_assert_eq!(mesh.twin(mesh.twin(h)), h);
            }
        }
    }

    #[test]
    fn flip_twice_restores_connectivity(seed in any::<usize>()) {
        let mut mesh = icosahedron();
        let e = pick_edge(&mesh, seed);
        let [a, b] = mesh.edge_vertices(e);
        let before: Vec<Vec<VertexId>> = mesh
            .vertex_ids()
            .map(|v| {
                let mut ring: Vec<_> = mesh.vertex_neighbors(v).collect();
                ring.sort();
                ring
            })
            .collect();
        let positions: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

        mesh.flip_edge(e).unwrap();
        prop_assert!(mesh.find_edge(a, b).is_none());
        mesh.flip_edge(e).unwrap();

        let after: Vec<Vec<VertexId>> = mesh
            .vertex_ids()
            .map(|v| {
                let mut ring: Vec<_> = mesh.vertex_neighbors(v).collect();
                ring.sort();
                ring
            })
            .collect();
        prop_assert_eq!(before, after);
        let moved: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
        prop_assert_eq!(positions, moved);
    }
}
