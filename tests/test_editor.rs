// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::{cell::RefCell, rc::Rc};

use meshedit::{
    error::{EditError, Refusal},
    geometry::Point3,
    mesh::{FacetId, HalfEdgeId, HalfedgeApi, Surface, SurfaceEditor, VertexId},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quad() -> HalfedgeApi {
    HalfedgeApi::from_buffers(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        &[0, 1, 2, 0, 2, 3],
    )
    .unwrap()
}

/// Square split into four triangles around its center, vertex 4.
fn fan() -> HalfedgeApi {
    HalfedgeApi::from_buffers(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.5, 0.5, 0.0,
        ],
        &[0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4],
    )
    .unwrap()
}

/// Two disjoint triangles whose edges (1, 2) and (3, 5) coincide in space.
fn split_square() -> HalfedgeApi {
    HalfedgeApi::from_buffers(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        &[0, 1, 2, 3, 4, 5],
    )
    .unwrap()
}

/// Rotates each triangle to start at its smallest id, then sorts them.
fn normalized(indices: &[usize]) -> Vec<[usize; 3]> {
    let mut tris: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|t| {
            let k = (0..3).min_by_key(|&i| t[i]).unwrap();
            [t[k], t[(k + 1) % 3], t[(k + 2) % 3]]
        })
        .collect();
    tris.sort();
    tris
}

fn assert_valid(api: &HalfedgeApi) {
    let report = api.surface().check_integrity();
    assert!(report.is_valid(), "{:?}", report.violations);
}

#[test]
fn test_quad_flip_and_back() {
    init_logger();
    let mut api = quad();
    api.switch_edge(0, 2).unwrap();
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 1, 3], [1, 2, 3]]);
    assert_valid(&api);

    api.switch_edge(1, 3).unwrap();
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 1, 2], [0, 2, 3]]);
    assert_valid(&api);
}

#[test]
fn test_refused_switch_changes_nothing() {
    let mut api = quad();
    let before = (api.positions(), api.indices().unwrap(), api.surface().nb_half_edges());
    let err = api.switch_edge(0, 1).unwrap_err();
    assert_eq!(err, EditError::Refused(Refusal::OnBorder));
    assert_eq!(
        before,
        (api.positions(), api.indices().unwrap(), api.surface().nb_half_edges())
    );
}

#[test]
fn test_missing_edge() {
    let mut api = fan();
    assert_eq!(
        api.switch_edge(0, 2).unwrap_err(),
        EditError::NoSuchEdge { v1: 0, v2: 2 }
    );
    assert_eq!(
        api.collapse_vertex(9).unwrap_err(),
        EditError::VertexOutOfRange { id: 9, count: 5 }
    );
}

#[test]
fn test_erase_triangle_drops_orphan_vertex() {
    let mut api = quad();
    api.erase_triangle(0).unwrap();
    assert_eq!(api.surface().nb_vertices(), 3);
    assert_eq!(api.positions(), vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 1, 2]]);
    assert_valid(&api);
}

#[test]
fn test_erase_vertex() {
    let mut api = fan();
    api.erase_vertex(4).unwrap();
    assert_eq!(api.surface().nb_facets(), 0);
    assert!(api.indices().unwrap().is_empty());
}

#[test]
fn test_collapse_center_vertex() {
    init_logger();
    let mut api = fan();
    api.collapse_vertex(4).unwrap();
    assert_eq!(api.surface().nb_vertices(), 4);
    assert_eq!(api.surface().nb_facets(), 2);
    let indices = api.indices().unwrap();
    assert_eq!(indices.len(), 6);
    assert!(indices.iter().all(|&i| i < 4));
    assert_eq!(api.positions().len(), 12);
    assert_valid(&api);
}

#[test]
fn test_collapse_border_fan_is_refused() {
    let mut api = HalfedgeApi::from_buffers(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    assert_eq!(
        api.collapse_vertex(0).unwrap_err(),
        EditError::Refused(Refusal::BorderFan)
    );
    assert_eq!(api.indices().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_center_vertex() {
    let mut api = HalfedgeApi::from_buffers(&[0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0, 0.0], &[0, 1, 2]).unwrap();
    let v = api.create_center_vertex(0).unwrap();
    assert_eq!(v, 3);
    assert_eq!(&api.positions()[9..12], &[1.0, 1.0, 0.0]);
    assert_eq!(api.surface().nb_facets(), 3);
    let tris = normalized(&api.indices().unwrap());
    assert!(tris.iter().all(|t| t.contains(&3)));
    assert_valid(&api);
}

#[test]
fn test_fill_hole() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    // tetrahedron with face (0, 3, 2) missing
    let mut api = HalfedgeApi::from_buffers(&positions, &[0, 2, 1, 0, 1, 3, 1, 2, 3]).unwrap();
    assert_eq!(api.border_ids().len(), 6);
    api.fill_hole(0, 3).unwrap();
    assert_eq!(api.surface().nb_facets(), 4);
    assert!(api.border_ids().is_empty());
    assert!(normalized(&api.indices().unwrap()).contains(&[0, 3, 2]));
    assert_valid(&api);
}

#[test]
fn test_fill_hole_needs_border() {
    let mut api = quad();
    assert_eq!(
        api.fill_hole(0, 2).unwrap_err(),
        EditError::Refused(Refusal::NotBorder)
    );
}

#[test]
fn test_glue_two_triangles() {
    init_logger();
    let mut api = split_square();
    api.glue_edges([1, 2], [3, 5]).unwrap();
    let s = api.surface();
    assert_eq!(s.nb_vertices(), 4);
    assert_eq!(s.nb_facets(), 2);
    assert_eq!(api.border_ids().len(), 8);
    assert_valid(&api);
}

#[test]
fn test_refused_glue_changes_nothing() {
    let mut api = split_square();
    let before = (api.positions(), api.indices().unwrap());
    let err = api.glue_edges([0, 1], [1, 2]).unwrap_err();
    assert_eq!(err, EditError::Refused(Refusal::SameFacet));
    assert_eq!(before, (api.positions(), api.indices().unwrap()));
    assert_eq!(api.surface().nb_half_edges(), 12);
}

#[test]
fn test_unzip_diagonal() {
    let mut api = quad();
    api.unzip_edge(0, 2).unwrap();
    let s = api.surface();
    assert_eq!(s.nb_vertices(), 6);
    assert_eq!(s.nb_facets(), 2);
    assert_eq!(s.border_half_edges().count(), 6);
    assert_valid(&api);
}

#[test]
fn test_unzip_needs_border_endpoint() {
    let mut api = HalfedgeApi::from_buffers(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        &[0, 2, 1, 0, 1, 3, 1, 2, 3, 0, 3, 2],
    )
    .unwrap();
    assert_eq!(
        api.unzip_edge(0, 1).unwrap_err(),
        EditError::Refused(Refusal::NoBorderEndpoint)
    );
}

#[test]
fn test_zip_needs_border() {
    let mut api = fan();
    assert_eq!(
        api.zip_vertex(4).unwrap_err(),
        EditError::Refused(Refusal::NoBorderAroundVertex)
    );
}

#[test]
fn test_flip_normals() {
    let mut api = quad();
    api.flip_normals().unwrap();
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 2, 1], [0, 3, 2]]);
    assert_valid(&api);
    api.flip_normals().unwrap();
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 1, 2], [0, 2, 3]]);
    assert_valid(&api);
}

#[test]
fn test_notifier_sees_successful_edits() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut api = quad();
    api.add_notifier(move |what| sink.borrow_mut().push(what.to_string()));
    api.switch_edge(0, 2).unwrap();
    assert!(api.switch_edge(0, 1).is_err());
    api.flip_normals().unwrap();
    assert_eq!(*seen.borrow(), vec!["switchEdge", "flipNormals"]);
}

#[test]
fn test_editor_requires_edit_mode() {
    let mut s = Surface::create(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    let f = s.facet_by_id(0).unwrap();
    let mut e = SurfaceEditor::new(&mut s);
    assert_eq!(e.erase_facet(f).unwrap_err(), EditError::NotInEditMode);
    e.begin_modif();
    e.erase_facet(f).unwrap();
    e.end_modif();
    assert_eq!(s.nb_facets(), 0);
    assert_eq!(s.nb_vertices(), 0);
}

#[test]
fn test_make_triangle() {
    let mut s = Surface::create(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    {
        let mut e = SurfaceEditor::new(&mut s);
        e.begin_modif();
        e.make_triangle(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        e.end_modif();
    }
    assert_eq!(s.nb_vertices(), 6);
    assert_eq!(s.nb_facets(), 2);
    assert!(s.check_integrity().is_valid());
}

#[test]
fn test_split_facet_refusals() {
    let mut s = Surface::create(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    let f = s.facet_by_id(0).unwrap();
    let h = s.facet(f).half_edge;
    let e = SurfaceEditor::new(&mut s);
    assert_eq!(e.split_facet_refusal(h, h), Some(Refusal::SameHalfEdge));
    let n = e.surface().next(h);
    assert_eq!(e.split_facet_refusal(h, n), Some(Refusal::ConsecutiveHalfEdges));
    let o = e.surface().opposite(h);
    assert_eq!(e.split_facet_refusal(h, o), Some(Refusal::OnBorder));
}

#[test]
fn test_flip_single_facet() {
    let mut api = HalfedgeApi::from_buffers(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    api.flip_normal(0).unwrap();
    assert_eq!(normalized(&api.indices().unwrap()), vec![[0, 2, 1]]);
}

#[test]
fn test_halfedge_between() {
    let mut s = quad().into_surface();
    let (v0, v1, v3) = (
        s.vertex_by_id(0).unwrap(),
        s.vertex_by_id(1).unwrap(),
        s.vertex_by_id(3).unwrap(),
    );
    let e = SurfaceEditor::new(&mut s);
    let h = e.halfedge_between(v0, v1).unwrap();
    assert_eq!(e.surface().target(h), v1);
    assert_eq!(e.surface().source(h), v0);
    assert!(e.halfedge_between(v1, v3).is_none());
}

#[test]
fn test_add_facet_to_border_closes_fan() {
    init_logger();
    let mut s = Surface::create(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.5, 0.5, 0.0,
        ],
        &[0, 1, 4, 1, 2, 4, 2, 3, 4],
    )
    .unwrap();
    let id = |s: &Surface<f64>, i| s.vertex_by_id(i).unwrap();
    let h = s.find_half_edge(id(&s, 1), id(&s, 0)).unwrap();
    let g = s.find_half_edge(id(&s, 4), id(&s, 3)).unwrap();
    {
        let mut e = SurfaceEditor::new(&mut s);
        e.begin_modif();
        assert_eq!(
            e.add_facet_to_border(h, h).unwrap_err(),
            EditError::Refused(Refusal::SameHalfEdge)
        );
        e.add_facet_to_border(h, g).unwrap();
        e.end_modif();
    }
    assert_eq!(s.nb_facets(), 4);
    assert!(s.check_integrity().is_valid());
    assert_eq!(
        normalized(&s.triangles_as_array().unwrap()),
        normalized(&fan().indices().unwrap())
    );
}

#[test]
fn test_can_merge_coincident_border_vertices() {
    let mut s = split_square().into_surface();
    let id = |s: &Surface<f64>, i| s.vertex_by_id(i).unwrap();
    let h0 = s.find_half_edge(id(&s, 2), id(&s, 1)).unwrap();
    let h1 = s.find_half_edge(id(&s, 3), id(&s, 5)).unwrap();
    let e = SurfaceEditor::new(&mut s);
    let (o0, o1) = (e.surface().opposite(h0), e.surface().opposite(h1));
    assert!(e.can_merge_vertices(h0, o1));
    assert!(e.can_merge_vertices(h1, o0));
    assert!(e.can_merge_vertices(h0, h0));
    assert!(e.can_glue(h0, h1));
}

/// Hexagon fanned around vertex 6.
fn hexagon() -> HalfedgeApi {
    let positions = [
        2.0, 0.0, 0.0, //
        1.0, 2.0, 0.0, //
        -1.0, 2.0, 0.0, //
        -2.0, 0.0, 0.0, //
        -1.0, -2.0, 0.0, //
        1.0, -2.0, 0.0, //
        0.0, 0.0, 0.0,
    ];
    let indices: Vec<usize> = (0..6).flat_map(|i| [i, (i + 1) % 6, 6]).collect();
    HalfedgeApi::from_buffers(&positions, &indices).unwrap()
}

fn grid(n: usize) -> Surface<f64> {
    let mut positions = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            positions.extend_from_slice(&[i as f64, j as f64, 0.0]);
        }
    }
    let mut indices = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let a = j * (n + 1) + i;
            let (b, c, d) = (a + 1, a + n + 2, a + n + 1);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    Surface::create(&positions, &indices).unwrap()
}

fn counts(s: &Surface<f64>) -> (usize, usize, usize) {
    (s.nb_vertices(), s.nb_half_edges(), s.nb_facets())
}

#[test]
fn test_pinched_vertex_is_refused() {
    init_logger();
    let mut api = hexagon();
    api.erase_triangle(0).unwrap();
    // old facet 3, renumbered after the first erase
    api.erase_triangle(2).unwrap();
    assert_valid(&api);
    assert_eq!(api.surface().nb_facets(), 4);

    let before = (api.indices().unwrap(), counts(api.surface()));
    let pinched = EditError::Refused(Refusal::PinchedVertex);
    assert_eq!(api.collapse_vertex(6).unwrap_err(), pinched);
    assert_eq!(api.unzip_edge(6, 2).unwrap_err(), pinched);
    assert_eq!(api.zip_vertex(6).unwrap_err(), pinched);
    assert_eq!(before, (api.indices().unwrap(), counts(api.surface())));
    assert_valid(&api);
}

#[test]
fn test_collapse_after_erasures_keeps_surface_valid() {
    init_logger();
    let mut api = HalfedgeApi::new(grid(4));
    api.erase_vertex(7).unwrap();
    api.erase_triangle(8).unwrap();
    api.erase_triangle(22).unwrap();
    assert_valid(&api);

    let before = counts(api.surface());
    if api.collapse_vertex(7).is_err() {
        assert_eq!(counts(api.surface()), before);
    }
    assert_valid(&api);
}

#[test]
fn test_stale_and_out_of_range_handles() {
    let mut s = Surface::create(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    let f = s.facet_by_id(0).unwrap();
    let mut e = SurfaceEditor::new(&mut s);
    e.begin_modif();
    e.erase_facet(f).unwrap();
    assert_eq!(
        e.erase_facet(f).unwrap_err(),
        EditError::StaleHandle { kind: "facet", index: f.0 }
    );
    assert!(matches!(
        e.collapse_vertex(VertexId(99), true),
        Err(EditError::VertexOutOfRange { id: 99, .. })
    ));
    assert!(matches!(
        e.create_center_vertex(FacetId(5)),
        Err(EditError::FacetOutOfRange { id: 5, .. })
    ));
    assert!(matches!(
        e.switch_edge(HalfEdgeId(400)),
        Err(EditError::HalfEdgeOutOfRange { id: 400, .. })
    ));
    e.end_modif();
}

#[test]
fn test_switch_refuses_existing_diagonal() {
    // closed tetrahedron: every pair of vertices is already joined
    let mut api = HalfedgeApi::from_buffers(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        &[0, 2, 1, 0, 1, 3, 1, 2, 3, 0, 3, 2],
    )
    .unwrap();
    assert_eq!(
        api.switch_edge(0, 1).unwrap_err(),
        EditError::Refused(Refusal::EdgeExists)
    );
    assert_valid(&api);
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.random_range(0..items.len())])
    }
}

#[test]
fn test_random_edits_keep_surface_valid() {
    init_logger();
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = grid(4);
        for step in 0..30 {
            let vertices: Vec<VertexId> = s.vertices().collect();
            let facets: Vec<FacetId> = s.facets().collect();
            let half_edges: Vec<HalfEdgeId> = s.half_edges().collect();
            let borders: Vec<HalfEdgeId> = s.border_half_edges().collect();
            if facets.is_empty() {
                break;
            }
            let op = rng.random_range(0..7);
            let v = pick(&mut rng, &vertices);
            let f = pick(&mut rng, &facets);
            let h = pick(&mut rng, &half_edges);
            let b = pick(&mut rng, &borders).zip(pick(&mut rng, &borders));
            let before = counts(&s);

            let mut e = SurfaceEditor::new(&mut s);
            e.begin_modif();
            let result = match op {
                0 => f.map(|f| e.erase_facet(f)),
                1 => v.map(|v| e.erase_vertex(v)),
                2 => v.map(|v| e.collapse_vertex(v, true).map(|_| ())),
                3 => h.map(|h| e.switch_edge(h).map(|_| ())),
                4 => b.map(|(h0, h1)| e.glue(h0, h1)),
                5 => h.map(|h| e.unglue(h, true)),
                _ => v.map(|v| e.zip_edge(v)),
            };
            e.end_modif();

            let report = s.check_integrity();
            assert!(report.is_valid(), "seed {seed} step {step} op {op}: {:?}", report.violations);
            if let Some(Err(err)) = result {
                assert_eq!(counts(&s), before, "seed {seed} step {step} op {op}: {err}");
            }
        }
    }
}
