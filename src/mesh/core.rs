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

use crate::{
    error::{SurfaceError, SurfaceResult},
    geometry::{aabb::Aabb, point::Point3},
    impl_surface,
    mesh::{
        basic_types::{FacetId, HalfEdgeId, VertexId},
        builder::SurfaceBuilder,
        face::Facet,
        half_edge::HalfEdge,
        vertex::Vertex,
    },
};

impl_surface! {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a surface from a flat `[x0, y0, z0, x1, ...]` position buffer
    /// and a flat triangle index buffer.
    pub fn create(positions: &[T], indices: &[usize]) -> SurfaceResult<Self> {
        SurfaceBuilder::build(positions, indices)
    }

    // ---------------------------------------------------------------------
    // Arena management. Only the builder and the editor call these.
    // ---------------------------------------------------------------------

    pub(crate) fn new_vertex(&mut self, position: Point3<T>) -> VertexId {
        let v = VertexId(self.vertices.len());
        let mut vertex = Vertex::new(position);
        vertex.id = v.0;
        self.vertices.push(vertex);
        v
    }

    pub(crate) fn new_half_edge(&mut self) -> HalfEdgeId {
        let h = HalfEdgeId(self.half_edges.len());
        self.half_edges.push(HalfEdge::new());
        h
    }

    /// Two opposite halfedges linked to each other in both directions.
    pub(crate) fn new_edge(&mut self) -> HalfEdgeId {
        let h1 = self.new_half_edge();
        let h2 = self.new_half_edge();
        self.link_opposite(h1, h2);
        self.link(h1, h2);
        self.link(h2, h1);
        h1
    }

    pub(crate) fn new_facet(&mut self) -> FacetId {
        let f = FacetId(self.facets.len());
        let mut facet = Facet::new();
        facet.id = f.0;
        self.facets.push(facet);
        f
    }

    pub(crate) fn delete_vertex(&mut self, v: VertexId) {
        self.vertices[v.0].removed = true;
        self.vertices[v.0].half_edge = None;
    }

    pub(crate) fn delete_half_edge(&mut self, h: HalfEdgeId) {
        self.half_edges[h.0].removed = true;
    }

    pub(crate) fn delete_edge(&mut self, h: HalfEdgeId) {
        let o = self.half_edges[h.0].opposite;
        if o.is_valid() {
            self.delete_half_edge(o);
        }
        self.delete_half_edge(h);
    }

    pub(crate) fn delete_facet(&mut self, f: FacetId) {
        self.facets[f.0].removed = true;
    }

    pub(crate) fn link(&mut self, h: HalfEdgeId, g: HalfEdgeId) {
        self.half_edges[h.0].next = g;
        self.half_edges[g.0].prev = h;
    }

    pub(crate) fn link_opposite(&mut self, h: HalfEdgeId, g: HalfEdgeId) {
        self.half_edges[h.0].opposite = g;
        self.half_edges[g.0].opposite = h;
    }

    pub(crate) fn set_half_edge_vertex(&mut self, h: HalfEdgeId, v: VertexId) {
        self.half_edges[h.0].vertex = v;
    }

    pub(crate) fn set_half_edge_facet(&mut self, h: HalfEdgeId, f: Option<FacetId>) {
        self.half_edges[h.0].facet = f;
    }

    pub(crate) fn set_half_edge_next(&mut self, h: HalfEdgeId, g: HalfEdgeId) {
        self.half_edges[h.0].next = g;
    }

    pub(crate) fn set_half_edge_prev(&mut self, h: HalfEdgeId, g: HalfEdgeId) {
        self.half_edges[h.0].prev = g;
    }

    pub(crate) fn set_vertex_half_edge(&mut self, v: VertexId, h: Option<HalfEdgeId>) {
        self.vertices[v.0].half_edge = h;
    }

    pub(crate) fn set_vertex_position(&mut self, v: VertexId, p: Point3<T>) {
        self.vertices[v.0].position = p;
    }

    /// Makes `h` the key of the vertex it points to.
    pub(crate) fn make_vertex_key(&mut self, h: HalfEdgeId) {
        let v = self.half_edges[h.0].vertex;
        self.vertices[v.0].half_edge = Some(h);
    }

    pub(crate) fn make_vertex_key_with(&mut self, h: HalfEdgeId, v: VertexId) {
        self.vertices[v.0].half_edge = Some(h);
        self.half_edges[h.0].vertex = v;
    }

    /// Makes `h` the key of its facet, if it has one.
    pub(crate) fn make_facet_key(&mut self, h: HalfEdgeId) {
        if let Some(f) = self.half_edges[h.0].facet {
            self.facets[f.0].half_edge = h;
        }
    }

    pub(crate) fn make_facet_key_with(&mut self, h: HalfEdgeId, f: FacetId) {
        self.facets[f.0].half_edge = h;
        self.half_edges[h.0].facet = Some(f);
    }

    /// Upper bound on any orbit walk.
    #[inline]
    pub(crate) fn orbit_limit(&self) -> usize {
        self.half_edges.len() + 1
    }

    /// Assigns `f` to every halfedge of the `next` orbit of `h`.
    pub(crate) fn set_facet_on_orbit(&mut self, h: HalfEdgeId, f: Option<FacetId>) {
        let limit = self.orbit_limit();
        let mut it = h;
        for _ in 0..limit {
            self.half_edges[it.0].facet = f;
            it = self.half_edges[it.0].next;
            if it == h {
                return;
            }
        }
        debug_assert!(false, "facet orbit of {:?} does not close", h);
    }

    /// Points every incoming halfedge around the target of `h` at `v`.
    pub(crate) fn set_vertex_on_orbit(&mut self, h: HalfEdgeId, v: VertexId) {
        let limit = self.orbit_limit();
        let mut it = h;
        for _ in 0..limit {
            self.half_edges[it.0].vertex = v;
            it = self.next_around_vertex(it);
            if it == h {
                return;
            }
        }
        debug_assert!(false, "vertex orbit of {:?} does not close", h);
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn vertex(&self, v: VertexId) -> &Vertex<T> {
        &self.vertices[v.0]
    }

    pub fn half_edge(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h.0]
    }

    pub fn facet(&self, f: FacetId) -> &Facet {
        &self.facets[f.0]
    }

    pub fn is_live_vertex(&self, v: VertexId) -> bool {
        self.vertices.get(v.0).is_some_and(|x| !x.removed)
    }

    pub fn is_live_half_edge(&self, h: HalfEdgeId) -> bool {
        self.half_edges.get(h.0).is_some_and(|x| !x.removed)
    }

    pub fn is_live_facet(&self, f: FacetId) -> bool {
        self.facets.get(f.0).is_some_and(|x| !x.removed)
    }

    pub fn nb_vertices(&self) -> usize {
        self.vertices.iter().filter(|v| !v.removed).count()
    }

    pub fn nb_half_edges(&self) -> usize {
        self.half_edges.iter().filter(|h| !h.removed).count()
    }

    pub fn nb_facets(&self) -> usize {
        self.facets.iter().filter(|f| !f.removed).count()
    }

    /// Live vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.removed)
            .map(|(i, _)| VertexId(i))
    }

    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.removed)
            .map(|(i, _)| HalfEdgeId(i))
    }

    pub fn facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.facets
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.removed)
            .map(|(i, _)| FacetId(i))
    }

    pub fn border_half_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.removed && h.is_border())
            .map(|(i, _)| HalfEdgeId(i))
    }

    /// Calls `f` on a snapshot of the live vertices. Vertices removed by an
    /// earlier call are skipped, vertices created by `f` are not visited.
    pub fn for_each_vertex<F: FnMut(&mut Self, VertexId)>(&mut self, mut f: F) {
        let snapshot: Vec<VertexId> = self.vertices().collect();
        for v in snapshot {
            if self.is_live_vertex(v) {
                f(self, v);
            }
        }
    }

    pub fn for_each_half_edge<F: FnMut(&mut Self, HalfEdgeId)>(&mut self, mut f: F) {
        let snapshot: Vec<HalfEdgeId> = self.half_edges().collect();
        for h in snapshot {
            if self.is_live_half_edge(h) {
                f(self, h);
            }
        }
    }

    pub fn for_each_facet<F: FnMut(&mut Self, FacetId)>(&mut self, mut f: F) {
        let snapshot: Vec<FacetId> = self.facets().collect();
        for x in snapshot {
            if self.is_live_facet(x) {
                f(self, x);
            }
        }
    }

    pub fn vertex_by_id(&self, id: usize) -> Option<VertexId> {
        self.vertex_by_id.get(id).copied()
    }

    pub fn facet_by_id(&self, id: usize) -> Option<FacetId> {
        self.facet_by_id.get(id).copied()
    }

    /// Assigns sequential ids to live vertices and facets in arena order.
    pub(crate) fn reindex(&mut self) {
        self.vertex_by_id.clear();
        for (i, v) in self.vertices.iter_mut().enumerate() {
            if !v.removed {
                v.id = self.vertex_by_id.len();
                self.vertex_by_id.push(VertexId(i));
            }
        }
        self.facet_by_id.clear();
        for (i, f) in self.facets.iter_mut().enumerate() {
            if !f.removed {
                f.id = self.facet_by_id.len();
                self.facet_by_id.push(FacetId(i));
            }
        }
    }

    pub fn bbox(&self) -> Option<&Aabb<T>> {
        self.bbox.as_ref()
    }

    pub(crate) fn update_bbox(&mut self) {
        let points: Vec<Point3<T>> = self.vertices().map(|v| self.vertices[v.0].position).collect();
        self.bbox = Aabb::from_points(points.iter());
    }

    // ---------------------------------------------------------------------
    // Flattening
    // ---------------------------------------------------------------------

    /// Positions of the live vertices, in id order.
    pub fn nodes_as_array(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.vertex_by_id.len() * 3);
        for v in self.vertices() {
            out.extend_from_slice(&self.vertices[v.0].position.coords);
        }
        out
    }

    /// Vertex ids of each live facet, in id order.
    pub fn triangles_as_array(&self) -> SurfaceResult<Vec<usize>> {
        let mut out = Vec::with_capacity(self.facet_by_id.len() * 3);
        for f in self.facets() {
            if !self.facet_is_triangle(f) {
                return Err(SurfaceError::NotTriangulated {
                    facet: self.facets[f.0].id,
                });
            }
            out.extend(self.facet_vertex_ids(f));
        }
        Ok(out)
    }

    /// Two endpoint positions per border halfedge.
    pub fn borders_as_array(&self) -> Vec<T> {
        let mut out = Vec::new();
        for h in self.border_half_edges() {
            let a = self.target(h);
            let b = self.vertex_of(self.opposite(h));
            out.extend_from_slice(&self.vertices[a.0].position.coords);
            out.extend_from_slice(&self.vertices[b.0].position.coords);
        }
        out
    }

    /// Two endpoint ids per border halfedge.
    pub fn border_ids_as_array(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for h in self.border_half_edges() {
            let a = self.target(h);
            let b = self.vertex_of(self.opposite(h));
            out.push(self.vertices[a.0].id);
            out.push(self.vertices[b.0].id);
        }
        out
    }
}
