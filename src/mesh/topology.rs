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

use smallvec::SmallVec;

use crate::{
    geometry::point::{Point3, triangle_area},
    impl_surface,
    mesh::basic_types::{FacetId, HalfEdgeId, VertexId},
};

impl_surface! {
    #[inline]
    pub fn opposite(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.0].opposite
    }

    #[inline]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.0].next
    }

    #[inline]
    pub fn prev(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.0].prev
    }

    #[inline]
    pub fn target(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h.0].vertex
    }

    #[inline]
    pub fn vertex_of(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h.0].vertex
    }

    pub fn source(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[h.0].prev.0].vertex
    }

    #[inline]
    pub fn facet_of(&self, h: HalfEdgeId) -> Option<FacetId> {
        self.half_edges[h.0].facet
    }

    #[inline]
    pub fn is_border(&self, h: HalfEdgeId) -> bool {
        self.half_edges[h.0].facet.is_none()
    }

    /// True if `h` or its opposite lies on the border.
    pub fn is_border_edge(&self, h: HalfEdgeId) -> bool {
        self.is_border(h) || self.is_border(self.opposite(h))
    }

    /// Next incoming halfedge around the target of `h`.
    #[inline]
    pub fn next_around_vertex(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.prev(self.opposite(h))
    }

    #[inline]
    pub fn prev_around_vertex(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.opposite(self.next(h))
    }

    pub fn half_edge_length(&self, h: HalfEdgeId) -> T {
        let a = &self.vertices[self.target(h).0].position;
        let b = &self.vertices[self.target(self.opposite(h)).0].position;
        a.distance_to(b)
    }

    // ---------------------------------------------------------------------
    // Vertex queries
    // ---------------------------------------------------------------------

    /// Incoming halfedges around `v`, starting at its key.
    pub fn half_edges_around_vertex(&self, v: VertexId) -> Vec<HalfEdgeId> {
        let mut out = Vec::new();
        let Some(start) = self.vertices[v.0].half_edge else {
            return out;
        };
        let limit = self.orbit_limit();
        let mut it = start;
        loop {
            out.push(it);
            it = self.next_around_vertex(it);
            if it == start || out.len() > limit {
                break;
            }
        }
        out
    }

    /// Neighbouring vertices, one per incoming halfedge.
    pub fn vertices_around_vertex(&self, v: VertexId) -> Vec<VertexId> {
        self.half_edges_around_vertex(v)
            .into_iter()
            .map(|h| self.target(self.opposite(h)))
            .collect()
    }

    pub fn facets_around_vertex(&self, v: VertexId) -> Vec<FacetId> {
        self.half_edges_around_vertex(v)
            .into_iter()
            .filter_map(|h| self.facet_of(h))
            .collect()
    }

    pub fn vertex_degree(&self, v: VertexId) -> usize {
        self.half_edges_around_vertex(v).len()
    }

    /// Isolated vertices count as border vertices.
    pub fn vertex_is_on_border(&self, v: VertexId) -> bool {
        let ring = self.half_edges_around_vertex(v);
        ring.is_empty() || ring.iter().any(|&h| self.is_border(h))
    }

    pub fn vertex_position(&self, v: VertexId) -> &Point3<T> {
        &self.vertices[v.0].position
    }

    pub fn vertex_id(&self, v: VertexId) -> usize {
        self.vertices[v.0].id
    }

    /// Halfedge going from `from` to `to`, if any.
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.half_edges_around_vertex(to)
            .into_iter()
            .find(|&h| self.target(self.opposite(h)) == from)
    }

    /// Every vertex reachable from `v` through edges, in discovery order.
    pub fn connected_component(&self, v: VertexId) -> Vec<VertexId> {
        let mut visited = vec![false; self.vertices.len()];
        let mut out = Vec::new();
        let mut stack = vec![v];
        while let Some(top) = stack.pop() {
            if visited[top.0] {
                continue;
            }
            visited[top.0] = true;
            out.push(top);
            for n in self.vertices_around_vertex(top) {
                if !visited[n.0] {
                    stack.push(n);
                }
            }
        }
        out
    }

    // ---------------------------------------------------------------------
    // Facet queries
    // ---------------------------------------------------------------------

    /// Halfedges of `f`, starting at its key.
    pub fn half_edges_around_facet(&self, f: FacetId) -> SmallVec<[HalfEdgeId; 4]> {
        self.half_edges_on_orbit(self.facets[f.0].half_edge)
    }

    /// The `next` orbit of `h`.
    pub fn half_edges_on_orbit(&self, h: HalfEdgeId) -> SmallVec<[HalfEdgeId; 4]> {
        let mut out = SmallVec::new();
        let limit = self.orbit_limit();
        let mut it = h;
        loop {
            out.push(it);
            it = self.next(it);
            if it == h || out.len() > limit {
                break;
            }
        }
        out
    }

    pub fn half_edges_on_same_facet(&self, h: HalfEdgeId, g: HalfEdgeId) -> bool {
        self.half_edges_on_orbit(h).contains(&g)
    }

    pub fn facet_degree(&self, f: FacetId) -> usize {
        self.half_edges_around_facet(f).len()
    }

    pub fn facet_is_triangle(&self, f: FacetId) -> bool {
        let h = self.facets[f.0].half_edge;
        self.next(self.next(self.next(h))) == h
    }

    pub fn facet_is_on_border(&self, f: FacetId) -> bool {
        self.half_edges_around_facet(f)
            .iter()
            .any(|&h| self.is_border(self.opposite(h)))
    }

    pub fn facet_vertices(&self, f: FacetId) -> SmallVec<[VertexId; 4]> {
        self.half_edges_around_facet(f)
            .iter()
            .map(|&h| self.target(h))
            .collect()
    }

    pub fn facet_vertex_ids(&self, f: FacetId) -> SmallVec<[usize; 4]> {
        self.facet_vertices(f)
            .iter()
            .map(|&v| self.vertices[v.0].id)
            .collect()
    }

    pub fn facet_barycenter(&self, f: FacetId) -> Point3<T> {
        let corners: SmallVec<[Point3<T>; 4]> = self
            .facet_vertices(f)
            .iter()
            .map(|&v| self.vertices[v.0].position)
            .collect();
        Point3::centroid(corners.iter()).unwrap_or_else(Point3::origin)
    }

    /// Fan area from the key vertex.
    pub fn facet_area(&self, f: FacetId) -> T {
        let vs = self.facet_vertices(f);
        let p0 = self.vertices[vs[0].0].position;
        let mut area = T::zero();
        for w in vs[1..].windows(2) {
            let p1 = &self.vertices[w[0].0].position;
            let p2 = &self.vertices[w[1].0].position;
            area = area + triangle_area(&p0, p1, p2);
        }
        area
    }

    /// Facet on the other side of `h`.
    pub fn opposite_facet(&self, h: HalfEdgeId) -> Option<FacetId> {
        self.facet_of(self.opposite(h))
    }
}
