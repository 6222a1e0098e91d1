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

use log::{debug, warn};

use crate::{
    error::{EditError, EditResult, Refusal},
    geometry::point::Point3,
    mesh::basic_types::{FacetId, HalfEdgeId, Surface, VertexId},
    numeric::scalar::Scalar,
};

/// Euler operators over one [`Surface`].
///
/// Every mutator must run between [`SurfaceEditor::begin_modif`] and
/// [`SurfaceEditor::end_modif`]; the latter reassigns vertex and facet ids.
/// A failed operation leaves the surface as it found it. Topological
/// operators also refuse to return a surface that fails
/// [`Surface::check_integrity`].
#[derive(Debug)]
pub struct SurfaceEditor<'a, T: Scalar = f64> {
    surface: &'a mut Surface<T>,
    modified: bool,
}

impl<'a, T: Scalar> SurfaceEditor<'a, T> {
    pub fn new(surface: &'a mut Surface<T>) -> Self {
        Self {
            surface,
            modified: false,
        }
    }

    pub fn surface(&self) -> &Surface<T> {
        self.surface
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn begin_modif(&mut self) {
        self.modified = true;
    }

    pub fn end_modif(&mut self) {
        self.modified = false;
        self.surface.reindex();
        self.surface.update_bbox();
    }

    fn ensure_modif(&self) -> EditResult<()> {
        if self.modified {
            Ok(())
        } else {
            Err(EditError::NotInEditMode)
        }
    }

    fn check_vertex(&self, v: VertexId) -> EditResult<()> {
        let count = self.surface.vertices.len();
        if v.0 >= count {
            Err(EditError::VertexOutOfRange { id: v.0, count })
        } else if !self.surface.is_live_vertex(v) {
            Err(EditError::StaleHandle { kind: "vertex", index: v.0 })
        } else {
            Ok(())
        }
    }

    fn check_half_edge(&self, h: HalfEdgeId) -> EditResult<()> {
        let count = self.surface.half_edges.len();
        if h.0 >= count {
            Err(EditError::HalfEdgeOutOfRange { id: h.0, count })
        } else if !self.surface.is_live_half_edge(h) {
            Err(EditError::StaleHandle { kind: "halfedge", index: h.0 })
        } else {
            Ok(())
        }
    }

    fn check_facet(&self, f: FacetId) -> EditResult<()> {
        let count = self.surface.facets.len();
        if f.0 >= count {
            Err(EditError::FacetOutOfRange { id: f.0, count })
        } else if !self.surface.is_live_facet(f) {
            Err(EditError::StaleHandle { kind: "facet", index: f.0 })
        } else {
            Ok(())
        }
    }

    fn refuse<R>(&self, operation: &str, reason: Refusal) -> EditResult<R> {
        debug!("{} refused: {}", operation, reason);
        Err(EditError::Refused(reason))
    }

    /// Runs `op` and restores the surface if it fails. With `verify`, a
    /// result that breaks a structural invariant is rolled back as well and
    /// reported as [`EditError::Inconsistent`].
    fn atomic<R>(
        &mut self,
        operation: &'static str,
        verify: bool,
        op: impl FnOnce(&mut Self) -> EditResult<R>,
    ) -> EditResult<R> {
        self.ensure_modif()?;
        let backup = self.surface.clone();
        let result = op(self).and_then(|r| {
            if !verify {
                return Ok(r);
            }
            let report = self.surface.check_integrity();
            match report.violations.first() {
                None => Ok(r),
                Some(v) => {
                    warn!("{} left {:?}, rolled back", operation, v);
                    Err(EditError::inconsistent(operation, format!("{:?}", v)))
                }
            }
        });
        if result.is_err() {
            *self.surface = backup;
        }
        result
    }

    /// Number of border halfedges entering `v`, one per border wedge.
    fn border_wedges(&self, v: VertexId) -> usize {
        let s = &*self.surface;
        s.half_edges_around_vertex(v)
            .into_iter()
            .filter(|&h| s.is_border(h))
            .count()
    }

    // ---------------------------------------------------------------------
    // Erase
    // ---------------------------------------------------------------------

    /// Removes `f`. Edges left with no facet on either side are deleted,
    /// vertices left without edges are deleted and the border is re-stitched.
    pub fn erase_facet(&mut self, f: FacetId) -> EditResult<()> {
        self.atomic("erase_facet", true, |e| e.erase_facet_impl(f))
    }

    fn erase_facet_impl(&mut self, f: FacetId) -> EditResult<()> {
        self.check_facet(f)?;
        debug!("erase_facet {}", f.0);

        let s = &mut *self.surface;
        let end = s.facet(f).half_edge;
        if s.is_border(end) {
            return Err(EditError::inconsistent("erase_facet", "facet key on the border"));
        }

        let limit = s.orbit_limit();
        let mut edges_to_delete = Vec::new();
        s.delete_facet(f);

        let mut h = end;
        for _ in 0..limit {
            s.set_half_edge_facet(h, None);
            let g = s.next(h);
            let h_opp = s.opposite(h);
            let g_opp = s.opposite(g);
            if s.is_border(h_opp) {
                if s.is_border(g_opp) {
                    if s.next(g_opp) == h_opp {
                        let v = s.target(h);
                        s.delete_vertex(v);
                    } else {
                        let p = s.prev(h_opp);
                        let n = s.next(g_opp);
                        s.make_vertex_key(p);
                        s.link(p, n);
                    }
                }
                edges_to_delete.push(h);
            } else {
                let hn_opp = s.opposite(s.next(h));
                if s.is_border(hn_opp) {
                    let n = s.next(hn_opp);
                    s.link(h, n);
                    s.make_vertex_key(h);
                }
                let hp_opp = s.opposite(s.prev(h));
                if s.is_border(hp_opp) {
                    let p = s.prev(hp_opp);
                    s.link(p, h);
                    s.make_vertex_key(p);
                }
            }
            h = g;
            if h == end {
                for e in edges_to_delete {
                    s.delete_edge(e);
                }
                return Ok(());
            }
        }
        Err(EditError::inconsistent("erase_facet", format!("orbit of facet {} does not close", f.0)))
    }

    /// Erases every facet around `v`. Isolated vertices are left alone.
    pub fn erase_vertex(&mut self, v: VertexId) -> EditResult<()> {
        self.atomic("erase_vertex", true, |e| e.erase_vertex_impl(v))
    }

    fn erase_vertex_impl(&mut self, v: VertexId) -> EditResult<()> {
        self.check_vertex(v)?;
        debug!("erase_vertex {}", v.0);

        let mut facets = self.surface.facets_around_vertex(v);
        facets.dedup();
        for f in facets {
            if self.surface.is_live_facet(f) {
                self.erase_facet_impl(f)?;
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Collapse / split
    // ---------------------------------------------------------------------

    /// Merges the facets around `v` into one polygon and deletes `v`.
    /// Returns a halfedge of the resulting polygon (or of the last fan
    /// triangle when `triangulate` is set).
    pub fn collapse_vertex(&mut self, v: VertexId, triangulate: bool) -> EditResult<HalfEdgeId> {
        self.atomic("collapse_vertex", true, |e| e.collapse_vertex_impl(v, triangulate))
    }

    /// Why `collapse_vertex(v)` would be refused, if it would.
    pub fn collapse_vertex_refusal(&self, v: VertexId) -> Option<Refusal> {
        let s = &*self.surface;
        if !s.is_live_vertex(v) {
            return Some(Refusal::DeadElement);
        }
        let Some(key) = s.vertex(v).half_edge else {
            return Some(Refusal::IsolatedVertex);
        };
        if self.border_wedges(v) > 1 {
            return Some(Refusal::PinchedVertex);
        }
        if s.is_border(s.opposite(key)) && s.is_border(s.opposite(s.next(key))) {
            return Some(Refusal::BorderFan);
        }
        let mut link = s.vertices_around_vertex(v);
        if link.len() < 3 {
            return Some(Refusal::TooFewSides);
        }
        link.sort_unstable();
        if link.windows(2).any(|w| w[0] == w[1]) {
            return Some(Refusal::RepeatedNeighbor);
        }
        None
    }

    fn collapse_vertex_impl(&mut self, v: VertexId, triangulate: bool) -> EditResult<HalfEdgeId> {
        self.check_vertex(v)?;
        if let Some(r) = self.collapse_vertex_refusal(v) {
            return self.refuse("collapse_vertex", r);
        }
        debug!("collapse_vertex {}", v.0);
        let Some(key) = self.surface.vertex(v).half_edge else {
            return self.refuse("collapse_vertex", Refusal::IsolatedVertex);
        };

        let border = self
            .surface
            .half_edges_around_vertex(v)
            .into_iter()
            .find(|&h| self.surface.is_border(h));
        if let Some(b) = border {
            let (bp, bn) = (self.surface.prev(b), self.surface.next(b));
            if bp == bn {
                return self.refuse("collapse_vertex", Refusal::DegenerateBorderCorner);
            }
            self.add_facet_to_border_unchecked(bp, bn);
        }

        let s = &mut *self.surface;
        let h = s.prev(key);
        let limit = s.orbit_limit();
        let mut it = h;
        let mut closed = false;
        for _ in 0..limit {
            let mut jt = s.next(it);
            if s.target(jt) == v {
                let spoke = jt;
                jt = s.next(s.opposite(spoke));
                let f = s.facet_of(it);
                s.delete_edge(spoke);
                if let Some(f) = f {
                    s.delete_facet(f);
                }
                s.link(it, jt);
                s.make_vertex_key(it);
            }
            it = jt;
            if it == h {
                closed = true;
                break;
            }
        }
        if !closed {
            return Err(EditError::inconsistent(
                "collapse_vertex",
                format!("link of vertex {} does not close", v.0),
            ));
        }

        let f = s.new_facet();
        s.set_facet_on_orbit(h, Some(f));
        s.make_facet_key(h);
        s.delete_vertex(v);

        if triangulate {
            self.triangulate_facet_impl(h)?;
        }
        Ok(h)
    }

    /// Closes the border corner between `h` and `g` with a new facet and
    /// returns the new interior halfedge.
    pub fn add_facet_to_border(&mut self, h: HalfEdgeId, g: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.atomic("add_facet_to_border", true, |e| e.add_facet_to_border_impl(h, g))
    }

    fn add_facet_to_border_impl(&mut self, h: HalfEdgeId, g: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.check_half_edge(h)?;
        self.check_half_edge(g)?;
        if !self.surface.is_border(h) || !self.surface.is_border(g) {
            return self.refuse("add_facet_to_border", Refusal::NotBorder);
        }
        if h == g {
            return self.refuse("add_facet_to_border", Refusal::SameHalfEdge);
        }
        if !self.surface.half_edges_on_same_facet(h, g) {
            return self.refuse("add_facet_to_border", Refusal::NotSameFacet);
        }
        Ok(self.add_facet_to_border_unchecked(h, g))
    }

    fn add_facet_to_border_unchecked(&mut self, h: HalfEdgeId, g: HalfEdgeId) -> HalfEdgeId {
        let s = &mut *self.surface;
        let h2 = s.next(h);
        let g2 = s.next(g);
        let n = s.new_edge();
        let no = s.opposite(n);

        s.link(n, h2);
        let hv = s.target(h);
        s.set_half_edge_vertex(n, hv);

        s.link(g, n);
        let gv = s.target(g);
        s.set_half_edge_vertex(no, gv);

        s.link(h, no);
        s.link(no, g2);

        let f = s.new_facet();
        s.set_facet_on_orbit(n, Some(f));
        s.make_facet_key(n);
        n
    }

    /// Why `split_facet(h, g)` would be refused, if it would.
    pub fn split_facet_refusal(&self, h: HalfEdgeId, g: HalfEdgeId) -> Option<Refusal> {
        let s = &*self.surface;
        if !s.is_live_half_edge(h) || !s.is_live_half_edge(g) {
            return Some(Refusal::DeadElement);
        }
        if h == g {
            return Some(Refusal::SameHalfEdge);
        }
        if s.is_border(h) || s.is_border(g) {
            return Some(Refusal::OnBorder);
        }
        if !s.half_edges_on_same_facet(h, g) {
            return Some(Refusal::NotSameFacet);
        }
        if s.next(h) == g || s.next(g) == h {
            return Some(Refusal::ConsecutiveHalfEdges);
        }
        None
    }

    pub fn can_split_facet(&self, h: HalfEdgeId, g: HalfEdgeId) -> bool {
        self.split_facet_refusal(h, g).is_none()
    }

    /// Inserts an edge from the target of `g` to the target of `h`, cutting
    /// their facet in two. Returns the new halfedge, which lies on the new
    /// facet.
    pub fn split_facet(&mut self, h: HalfEdgeId, g: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.atomic("split_facet", true, |e| e.split_facet_impl(h, g))
    }

    fn split_facet_impl(&mut self, h: HalfEdgeId, g: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.check_half_edge(h)?;
        self.check_half_edge(g)?;
        if let Some(r) = self.split_facet_refusal(h, g) {
            return self.refuse("split_facet", r);
        }

        let s = &mut *self.surface;
        let hf = s.facet_of(h);
        let hn = s.next(h);
        let gn = s.next(g);
        let r = s.new_edge();
        let ro = s.opposite(r);

        s.link(ro, gn);
        s.link(r, hn);
        s.link(g, r);
        s.link(h, ro);
        let hv = s.target(h);
        let gv = s.target(g);
        s.set_half_edge_vertex(r, hv);
        s.set_half_edge_vertex(ro, gv);
        if let Some(hf) = hf {
            s.make_facet_key_with(ro, hf);
        }
        let f = s.new_facet();
        s.set_facet_on_orbit(r, Some(f));
        s.make_facet_key(r);
        Ok(r)
    }

    /// Fan triangulation of the facet of `start`. Convexity is not checked.
    pub fn triangulate_facet(&mut self, start: HalfEdgeId) -> EditResult<()> {
        self.atomic("triangulate_facet", true, |e| e.triangulate_facet_impl(start))
    }

    fn triangulate_facet_impl(&mut self, start: HalfEdgeId) -> EditResult<()> {
        self.check_half_edge(start)?;
        if self.surface.is_border(start) {
            return self.refuse("triangulate_facet", Refusal::OnBorder);
        }

        let limit = self.surface.orbit_limit();
        let mut cur = self.surface.next(self.surface.next(start));
        let mut steps = 0;
        while self.surface.next(cur) != start {
            if let Err(e) = self.split_facet_impl(start, cur) {
                warn!("triangulate_facet stopped: {}", e);
                break;
            }
            cur = self.surface.next(self.surface.opposite(self.surface.next(cur)));
            steps += 1;
            if steps > limit {
                return Err(EditError::inconsistent("triangulate_facet", "fan does not close"));
            }
        }
        Ok(())
    }

    /// Inserts a vertex at the barycenter of `f` and connects it to every
    /// corner.
    pub fn create_center_vertex(&mut self, f: FacetId) -> EditResult<VertexId> {
        self.atomic("create_center_vertex", true, |e| e.create_center_vertex_impl(f))
    }

    fn create_center_vertex_impl(&mut self, f: FacetId) -> EditResult<VertexId> {
        self.check_facet(f)?;
        debug!("create_center_vertex {}", f.0);

        let s = &mut *self.surface;
        let h = s.facet(f).half_edge;
        let p = s.facet_barycenter(f);
        let v = s.new_vertex(p);
        s.delete_facet(f);

        let limit = s.orbit_limit();
        let mut first = true;
        let mut it = h;
        for _ in 0..limit {
            let jt = s.next(it);
            let z = s.new_edge();
            let zo = s.opposite(z);
            s.link(it, z);
            s.link(zo, jt);
            s.set_half_edge_vertex(z, v);
            let iv = s.target(it);
            s.set_half_edge_vertex(zo, iv);
            if first {
                first = false;
                s.make_vertex_key(z);
            } else {
                let p = s.prev(it);
                s.link(z, p);
                let nf = s.new_facet();
                s.set_facet_on_orbit(it, Some(nf));
                s.make_facet_key(it);
            }
            it = jt;
            if it == h {
                let (hn, hp) = (s.next(h), s.prev(h));
                s.link(hn, hp);
                let nf = s.new_facet();
                s.set_facet_on_orbit(h, Some(nf));
                s.make_facet_key(h);
                return Ok(v);
            }
        }
        Err(EditError::inconsistent("create_center_vertex", "facet orbit does not close"))
    }

    // ---------------------------------------------------------------------
    // Edge switch
    // ---------------------------------------------------------------------

    pub fn switch_edge_refusal(&self, e: HalfEdgeId) -> Option<Refusal> {
        let s = &*self.surface;
        if !s.is_live_half_edge(e) {
            return Some(Refusal::DeadElement);
        }
        let o = s.opposite(e);
        let (Some(f0), Some(f1)) = (s.facet_of(e), s.facet_of(o)) else {
            return Some(Refusal::OnBorder);
        };
        if !s.facet_is_triangle(f0) || !s.facet_is_triangle(f1) {
            return Some(Refusal::NotTriangles);
        }
        let (c, d) = (s.target(s.next(e)), s.target(s.next(o)));
        if c == d || self.half_edge_exists_between(c, d) {
            return Some(Refusal::EdgeExists);
        }
        None
    }

    pub fn can_switch_edge(&self, e: HalfEdgeId) -> bool {
        self.switch_edge_refusal(e).is_none()
    }

    /// Replaces the diagonal `e` of the two triangles sharing it by the other
    /// diagonal. Returns the new halfedge in place of `e`.
    pub fn switch_edge(&mut self, e0: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.atomic("switch_edge", true, |e| e.switch_edge_impl(e0))
    }

    fn switch_edge_impl(&mut self, e0: HalfEdgeId) -> EditResult<HalfEdgeId> {
        self.check_half_edge(e0)?;
        if let Some(r) = self.switch_edge_refusal(e0) {
            return self.refuse("switch_edge", r);
        }
        debug!("switch_edge {}", e0.0);

        let s = &mut *self.surface;
        let e1 = s.next(e0);
        let e2 = s.next(e1);
        let e0_opp = s.opposite(e0);
        let e1_opp = s.next(e0_opp);
        let e2_opp = s.next(e1_opp);

        if let Some(f) = s.facet_of(e0) {
            s.delete_facet(f);
        }
        if let Some(f) = s.facet_of(e0_opp) {
            s.delete_facet(f);
        }
        s.delete_edge(e0);

        let n0 = s.new_half_edge();
        let n0_opp = s.new_half_edge();
        s.link_opposite(n0, n0_opp);
        let v1 = s.target(e1);
        let v1o = s.target(e1_opp);
        s.set_half_edge_vertex(n0, v1);
        s.set_half_edge_vertex(n0_opp, v1o);

        s.link(n0, e2);
        s.link(e2, e1_opp);
        s.link(e1_opp, n0);
        s.make_vertex_key(n0);
        s.make_vertex_key(e2);
        s.make_vertex_key(e1_opp);
        let fa = s.new_facet();
        s.set_facet_on_orbit(n0, Some(fa));
        s.make_facet_key(n0);

        s.link(n0_opp, e2_opp);
        s.link(e2_opp, e1);
        s.link(e1, n0_opp);
        s.make_vertex_key(e2_opp);
        let fb = s.new_facet();
        s.set_facet_on_orbit(n0_opp, Some(fb));
        s.make_facet_key(n0_opp);

        Ok(n0)
    }

    // ---------------------------------------------------------------------
    // Holes and standalone polygons
    // ---------------------------------------------------------------------

    /// Gives the border cycle of `h` a facet.
    pub fn fill_hole(&mut self, h: HalfEdgeId, triangulate: bool) -> EditResult<FacetId> {
        self.atomic("fill_hole", true, |e| e.fill_hole_impl(h, triangulate))
    }

    fn fill_hole_impl(&mut self, h: HalfEdgeId, triangulate: bool) -> EditResult<FacetId> {
        self.check_half_edge(h)?;
        if !self.surface.is_border(h) {
            return self.refuse("fill_hole", Refusal::NotBorder);
        }
        debug!("fill_hole {}", h.0);

        let f = self.surface.new_facet();
        self.surface.set_facet_on_orbit(h, Some(f));
        self.surface.make_facet_key(h);
        if triangulate {
            self.triangulate_facet_impl(h)?;
        }
        Ok(f)
    }

    /// Creates an isolated `n`-gon whose vertices sit at the origin.
    pub fn make_polygon(&mut self, n: usize) -> EditResult<HalfEdgeId> {
        self.atomic("make_polygon", true, |e| e.make_polygon_impl(n))
    }

    fn make_polygon_impl(&mut self, n: usize) -> EditResult<HalfEdgeId> {
        if n < 3 {
            return self.refuse("make_polygon", Refusal::TooFewSides);
        }

        let s = &mut *self.surface;
        let first = s.new_edge();
        let f = s.new_facet();
        s.make_facet_key_with(first, f);
        let v = s.new_vertex(Point3::origin());
        s.make_vertex_key_with(first, v);

        let mut cur = first;
        for _ in 1..n {
            let e = s.new_edge();
            s.link(cur, e);
            let (eo, co) = (s.opposite(e), s.opposite(cur));
            s.link(eo, co);
            s.set_half_edge_facet(e, Some(f));
            let cv = s.target(cur);
            s.set_half_edge_vertex(eo, cv);
            cur = e;
            let v = s.new_vertex(Point3::origin());
            s.make_vertex_key_with(cur, v);
        }

        s.link(cur, first);
        let (fo, co) = (s.opposite(first), s.opposite(cur));
        s.link(fo, co);
        let cv = s.target(cur);
        s.set_half_edge_vertex(fo, cv);
        Ok(first)
    }

    /// Creates an isolated triangle with corners `p1`, `p2`, `p3`.
    pub fn make_triangle(&mut self, p1: Point3<T>, p2: Point3<T>, p3: Point3<T>) -> EditResult<HalfEdgeId> {
        self.atomic("make_triangle", true, |e| {
            let h = e.make_polygon_impl(3)?;
            let s = &mut *e.surface;
            let mut it = h;
            for p in [p1, p2, p3] {
                let v = s.target(it);
                s.set_vertex_position(v, p);
                it = s.next(it);
            }
            Ok(h)
        })
    }

    // ---------------------------------------------------------------------
    // Glue / unglue
    // ---------------------------------------------------------------------

    /// Halfedge from `v1` to `v2`, if any.
    pub fn halfedge_between(&self, v1: VertexId, v2: VertexId) -> Option<HalfEdgeId> {
        self.surface.find_half_edge(v1, v2)
    }

    fn half_edge_exists_between(&self, v1: VertexId, v2: VertexId) -> bool {
        let s = &*self.surface;
        s.half_edges_around_vertex(v1)
            .into_iter()
            .any(|h| s.target(s.opposite(h)) == v2)
    }

    pub fn glue_refusal(&self, h0: HalfEdgeId, h1: HalfEdgeId) -> Option<Refusal> {
        let s = &*self.surface;
        if !s.is_live_half_edge(h0) || !s.is_live_half_edge(h1) {
            return Some(Refusal::DeadElement);
        }
        if !s.is_border(h0) || !s.is_border(h1) {
            return Some(Refusal::NotBorder);
        }
        let (o0, o1) = (s.opposite(h0), s.opposite(h1));
        if s.facet_of(o0) == s.facet_of(o1) {
            return Some(Refusal::SameFacet);
        }
        if self.half_edge_exists_between(s.target(h0), s.target(o1))
            || self.half_edge_exists_between(s.target(h1), s.target(o0))
        {
            return Some(Refusal::EdgeExists);
        }
        if !self.can_merge_vertices(h0, o1) || !self.can_merge_vertices(h1, o0) {
            return Some(Refusal::IncompatibleOrbits);
        }
        None
    }

    pub fn can_glue(&self, h0: HalfEdgeId, h1: HalfEdgeId) -> bool {
        self.glue_refusal(h0, h1).is_none()
    }

    /// True if the targets of `h0` and `h1` can become one vertex.
    pub fn can_merge_vertices(&self, h0: HalfEdgeId, h1: HalfEdgeId) -> bool {
        if self.surface.target(h0) == self.surface.target(h1) {
            return true;
        }
        self.orbits_are_compatible(h0, h1) && self.orbits_are_compatible(h1, h0)
    }

    fn orbits_are_compatible(&self, h0: HalfEdgeId, h1: HalfEdgeId) -> bool {
        let s = &*self.surface;
        let h0_org = s.target(s.opposite(h0));
        let h1_org = s.target(s.opposite(h1));
        let ring0 = s.half_edges_around_vertex(s.target(h0));
        let ring1 = s.half_edges_around_vertex(s.target(h1));

        for &cir0 in &ring0 {
            // more than one candidate opposite means a non-manifold edge
            let mut nb_common = 0;
            let hh0 = s.opposite(cir0);
            for &cir1 in &ring1 {
                let hh1 = s.opposite(cir1);
                let (t0, t1) = (s.target(hh0), s.target(hh1));
                if t0 == t1 || (t0 == h0_org && t1 == h1_org) || (t0 == h1_org && t1 == h0_org) {
                    let facing = (s.is_border(s.opposite(hh0)) && s.is_border(hh1))
                        || (s.is_border(hh0) && s.is_border(s.opposite(hh1)));
                    if facing {
                        nb_common += 1;
                    } else {
                        return false;
                    }
                }
            }
            if nb_common > 1 {
                return false;
            }
        }
        true
    }

    /// Merges the border halfedges `h0` and `h1` into one interior edge.
    /// The merged endpoints move to the midpoints of their former positions.
    pub fn glue(&mut self, h0: HalfEdgeId, h1: HalfEdgeId) -> EditResult<()> {
        self.atomic("glue", true, |e| e.glue_impl(h0, h1))
    }

    fn glue_impl(&mut self, h0: HalfEdgeId, h1: HalfEdgeId) -> EditResult<()> {
        self.check_half_edge(h0)?;
        self.check_half_edge(h1)?;
        if let Some(r) = self.glue_refusal(h0, h1) {
            return self.refuse("glue", r);
        }
        debug!("glue {} {}", h0.0, h1.0);

        let s = &mut *self.surface;
        let dest0 = s.target(h0);
        let dest1 = s.target(h1);
        let org0 = s.target(s.opposite(h0));
        let org1 = s.target(s.opposite(h1));

        let new_p0 = s.vertex_position(dest0).midpoint(s.vertex_position(org1));
        let new_p1 = s.vertex_position(dest1).midpoint(s.vertex_position(org0));

        if org0 != dest1 {
            s.set_vertex_on_orbit(h1, org0);
            s.delete_vertex(dest1);
        }
        if org1 != dest0 {
            s.set_vertex_on_orbit(h0, org1);
            s.delete_vertex(dest0);
        }

        let (p1, n0) = (s.prev(h1), s.next(h0));
        s.link(p1, n0);
        let (p0, n1) = (s.prev(h0), s.next(h1));
        s.link(p0, n1);

        let (o0, o1) = (s.opposite(h0), s.opposite(h1));
        s.link_opposite(o0, o1);
        s.make_vertex_key(o0);
        s.make_vertex_key(o1);

        s.set_vertex_position(org1, new_p0);
        s.set_vertex_position(org0, new_p1);

        s.delete_half_edge(h0);
        s.delete_half_edge(h1);
        Ok(())
    }

    pub fn can_unglue(&self, h: HalfEdgeId) -> bool {
        let s = &*self.surface;
        if s.is_border_edge(h) {
            return false;
        }
        s.vertex_is_on_border(s.target(h)) || s.vertex_is_on_border(s.target(s.opposite(h)))
    }

    /// Splits the interior edge of `h` into two border edges. An endpoint
    /// already on the border is split in two. With `check`, refused unless one
    /// endpoint lies on the border.
    pub fn unglue(&mut self, h0: HalfEdgeId, check: bool) -> EditResult<()> {
        self.atomic("unglue", true, |e| e.unglue_impl(h0, check))
    }

    fn unglue_impl(&mut self, h0: HalfEdgeId, check: bool) -> EditResult<()> {
        self.check_half_edge(h0)?;
        if self.surface.is_border_edge(h0) {
            return self.refuse("unglue", Refusal::OnBorder);
        }
        if check && !self.can_unglue(h0) {
            return self.refuse("unglue", Refusal::NoBorderEndpoint);
        }
        let (a, b) = (self.surface.target(h0), self.surface.source(h0));
        if self.border_wedges(a) > 1 || self.border_wedges(b) > 1 {
            return self.refuse("unglue", Refusal::PinchedVertex);
        }
        debug!("unglue {}", h0.0);

        let s = &mut *self.surface;
        let limit = s.orbit_limit();
        let h1 = s.opposite(h0);
        let v0 = s.target(h0);
        let v1 = s.target(h1);
        let v0_on_border = s.vertex_is_on_border(v0);
        let v1_on_border = s.vertex_is_on_border(v1);

        let n0 = s.new_edge();
        let n1 = s.opposite(n0);
        s.link_opposite(h0, n0);
        s.link_opposite(h1, n1);

        if v1_on_border {
            let mut next0 = s.opposite(s.prev(h0));
            let mut prev1 = s.opposite(s.next(h1));
            let mut steps = 0;
            while !s.is_border(next0) || !s.is_border(prev1) {
                if !s.is_border(next0) {
                    next0 = s.opposite(s.prev(next0));
                }
                if !s.is_border(prev1) {
                    prev1 = s.opposite(s.next(prev1));
                }
                steps += 1;
                if steps > limit {
                    return Err(EditError::inconsistent("unglue", "no border around the first endpoint"));
                }
            }
            s.link(n0, next0);
            s.link(prev1, n1);
            let p = *s.vertex_position(v1);
            let nv = s.new_vertex(p);
            s.set_vertex_on_orbit(n0, nv);
            s.make_vertex_key(n0);
            s.make_vertex_key(h1);
        } else {
            s.set_half_edge_vertex(n0, v1);
        }

        if v0_on_border {
            let mut prev0 = s.opposite(s.next(h0));
            let mut next1 = s.opposite(s.prev(h1));
            let mut steps = 0;
            while !s.is_border(prev0) || !s.is_border(next1) {
                if !s.is_border(prev0) {
                    prev0 = s.opposite(s.next(prev0));
                }
                if !s.is_border(next1) {
                    next1 = s.opposite(s.prev(next1));
                }
                steps += 1;
                if steps > limit {
                    return Err(EditError::inconsistent("unglue", "no border around the second endpoint"));
                }
            }
            s.link(prev0, n0);
            s.link(n1, next1);
            let p = *s.vertex_position(v0);
            let nv = s.new_vertex(p);
            s.set_vertex_on_orbit(n1, nv);
            s.make_vertex_key(n1);
            s.make_vertex_key(h0);
        } else {
            s.set_half_edge_vertex(n1, v0);
        }
        Ok(())
    }

    /// Glues the two border halfedges met around `v`.
    pub fn zip_edge(&mut self, v: VertexId) -> EditResult<()> {
        self.atomic("zip_edge", true, |e| e.zip_edge_impl(v))
    }

    fn zip_edge_impl(&mut self, v: VertexId) -> EditResult<()> {
        self.check_vertex(v)?;
        if self.border_wedges(v) > 1 {
            return self.refuse("zip_edge", Refusal::PinchedVertex);
        }

        let s = &*self.surface;
        let mut h1 = None;
        let mut h2 = None;
        for it in s.half_edges_around_vertex(v) {
            for cand in [it, s.opposite(it)] {
                if s.is_border(cand) {
                    if h1.is_none() {
                        h1 = Some(cand);
                    } else {
                        h2 = Some(cand);
                    }
                }
            }
        }
        match (h1, h2) {
            (Some(a), Some(b)) => self.glue_impl(a, b),
            _ => self.refuse("zip_edge", Refusal::NoBorderAroundVertex),
        }
    }

    // ---------------------------------------------------------------------
    // Orientation
    // ---------------------------------------------------------------------

    /// Reverses the `next` orbit of `first` (a facet or a border cycle).
    pub fn flip_normal(&mut self, first: HalfEdgeId) -> EditResult<()> {
        self.atomic("flip_normal", false, |e| e.flip_normal_impl(first))
    }

    fn flip_normal_impl(&mut self, first: HalfEdgeId) -> EditResult<()> {
        self.check_half_edge(first)?;

        let s = &mut *self.surface;
        let limit = s.orbit_limit();
        let start = first;
        let mut prev = first;
        let mut it = s.next(first);
        let mut new_v = s.target(start);
        let mut steps = 0;

        while it != start {
            let tmp_v = s.target(it);
            s.set_half_edge_vertex(it, new_v);
            s.make_vertex_key(it);
            new_v = tmp_v;
            let next = s.next(it);
            s.set_half_edge_next(it, prev);
            s.set_half_edge_prev(it, next);
            prev = it;
            it = next;
            steps += 1;
            if steps > limit {
                return Err(EditError::inconsistent("flip_normal", "orbit does not close"));
            }
        }
        s.set_half_edge_vertex(start, new_v);
        s.make_vertex_key(start);
        let next = s.next(start);
        s.set_half_edge_next(start, prev);
        s.set_half_edge_prev(start, next);
        Ok(())
    }

    /// Reverses every facet, then every border cycle left inconsistent.
    pub fn flip_normals(&mut self) -> EditResult<()> {
        self.atomic("flip_normals", true, |e| e.flip_normals_impl())
    }

    fn flip_normals_impl(&mut self) -> EditResult<()> {
        debug!("flip_normals");

        let keys: Vec<HalfEdgeId> = self
            .surface
            .facets()
            .map(|f| self.surface.facet(f).half_edge)
            .collect();
        for h in keys {
            self.flip_normal_impl(h)?;
        }

        let borders: Vec<HalfEdgeId> = self.surface.border_half_edges().collect();
        for h in borders {
            let s = &*self.surface;
            if s.is_border(h) && s.target(h) == s.target(s.opposite(h)) {
                self.flip_normal_impl(h)?;
            }
        }
        Ok(())
    }
}
