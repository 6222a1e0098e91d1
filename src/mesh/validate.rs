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

//! Structural checks of a finished surface.

use crate::{
    impl_surface,
    mesh::basic_types::{FacetId, HalfEdgeId, VertexId},
};

/// One broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `next`, `prev`, `opposite` or `vertex` points at a removed or unset element.
    DeadLink { half_edge: HalfEdgeId, field: &'static str },
    NextPrevMismatch { half_edge: HalfEdgeId },
    OppositeMismatch { half_edge: HalfEdgeId },
    /// Both halves of an edge end at the same vertex.
    DegenerateEdge { half_edge: HalfEdgeId },
    DeadFacetRef { half_edge: HalfEdgeId },
    InvalidFacetKey { facet: FacetId },
    OpenFacetOrbit { facet: FacetId },
    FacetMismatch { half_edge: HalfEdgeId, facet: FacetId },
    InvalidVertexKey { vertex: VertexId },
    OpenVertexOrbit { vertex: VertexId },
    /// Some incoming halfedges of the vertex are not on its key orbit.
    NonManifoldVertex { vertex: VertexId, orbit: usize, incoming: usize },
}

#[derive(Debug, Default, Clone)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn add(&mut self, v: Violation) {
        self.violations.push(v);
    }
}

impl_surface! {
    /// Checks every halfedge, facet and vertex invariant and reports all
    /// violations found.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        let mut incoming = vec![0usize; self.vertices.len()];

        for h in self.half_edges() {
            let he = &self.half_edges[h.0];
            let mut links_ok = true;
            for (field, target) in [("next", he.next), ("prev", he.prev), ("opposite", he.opposite)] {
                if !self.is_live_half_edge(target) {
                    report.add(Violation::DeadLink { half_edge: h, field });
                    links_ok = false;
                }
            }
            if !self.is_live_vertex(he.vertex) {
                report.add(Violation::DeadLink { half_edge: h, field: "vertex" });
                links_ok = false;
            } else {
                incoming[he.vertex.0] += 1;
            }
            if let Some(f) = he.facet {
                if !self.is_live_facet(f) {
                    report.add(Violation::DeadFacetRef { half_edge: h });
                }
            }
            if !links_ok {
                continue;
            }
            if self.half_edges[he.next.0].prev != h {
                report.add(Violation::NextPrevMismatch { half_edge: h });
            }
            if self.half_edges[he.opposite.0].opposite != h {
                report.add(Violation::OppositeMismatch { half_edge: h });
            }
            if self.half_edges[he.opposite.0].vertex == he.vertex {
                report.add(Violation::DegenerateEdge { half_edge: h });
            }
        }

        let limit = self.orbit_limit();
        for f in self.facets() {
            let key = self.facets[f.0].half_edge;
            if !self.is_live_half_edge(key) {
                report.add(Violation::InvalidFacetKey { facet: f });
                continue;
            }
            let mut it = key;
            let mut steps = 0;
            loop {
                if self.half_edges[it.0].facet != Some(f) {
                    report.add(Violation::FacetMismatch { half_edge: it, facet: f });
                }
                it = self.half_edges[it.0].next;
                steps += 1;
                if it == key {
                    break;
                }
                if steps > limit || !self.is_live_half_edge(it) {
                    report.add(Violation::OpenFacetOrbit { facet: f });
                    break;
                }
            }
        }

        for v in self.vertices() {
            let Some(key) = self.vertices[v.0].half_edge else {
                continue;
            };
            if !self.is_live_half_edge(key) || self.half_edges[key.0].vertex != v {
                report.add(Violation::InvalidVertexKey { vertex: v });
                continue;
            }
            let mut it = key;
            let mut orbit = 0;
            let mut closed = false;
            while orbit <= limit {
                if self.half_edges[it.0].vertex != v {
                    break;
                }
                orbit += 1;
                let o = self.half_edges[it.0].opposite;
                if !self.is_live_half_edge(o) {
                    break;
                }
                it = self.half_edges[o.0].prev;
                if !self.is_live_half_edge(it) {
                    break;
                }
                if it == key {
                    closed = true;
                    break;
                }
            }
            if !closed {
                report.add(Violation::OpenVertexOrbit { vertex: v });
            } else if orbit != incoming[v.0] {
                report.add(Violation::NonManifoldVertex {
                    vertex: v,
                    orbit,
                    incoming: incoming[v.0],
                });
            }
        }

        report
    }
}
