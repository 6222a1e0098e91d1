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

use ahash::AHashMap;
use log::{debug, warn};

use crate::{
    error::{SurfaceError, SurfaceResult},
    geometry::point::Point3,
    mesh::basic_types::{FacetId, HalfEdgeId, Surface, VertexId},
    numeric::scalar::Scalar,
};

/// Turns a (possibly non-manifold) polygon soup into a halfedge surface.
///
/// Vertices are added first, then facets as lists of input vertex indices.
/// Non-manifold edges are cut by duplicating their endpoints for the offending
/// facet, border halfedges are synthesized on [`SurfaceBuilder::end_surface`]
/// and non-manifold vertices are split into one vertex per wedge.
#[derive(Debug)]
pub struct SurfaceBuilder<T: Scalar = f64> {
    surface: Surface<T>,
    nodes: Vec<VertexId>,
    // outgoing halfedges per vertex
    star: AHashMap<VertexId, Vec<HalfEdgeId>>,

    facet_nodes: Vec<VertexId>,
    nb_facets: usize,
    current_facet: Option<FacetId>,
    current_vertex: Option<VertexId>,
    first_vertex_in_facet: Option<VertexId>,
    first_half_edge_in_facet: Option<HalfEdgeId>,
    current_half_edge: Option<HalfEdgeId>,
}

impl<T: Scalar> Default for SurfaceBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> SurfaceBuilder<T> {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(),
            nodes: Vec::new(),
            star: AHashMap::new(),
            facet_nodes: Vec::new(),
            nb_facets: 0,
            current_facet: None,
            current_vertex: None,
            first_vertex_in_facet: None,
            first_half_edge_in_facet: None,
            current_half_edge: None,
        }
    }

    /// Builds a surface from flat position and triangle index buffers.
    pub fn build(positions: &[T], indices: &[usize]) -> SurfaceResult<Surface<T>> {
        if positions.len() % 3 != 0 {
            return Err(SurfaceError::MalformedBuffer {
                buffer: "position",
                len: positions.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(SurfaceError::MalformedBuffer {
                buffer: "index",
                len: indices.len(),
            });
        }

        let mut builder = SurfaceBuilder::new();
        for c in positions.chunks_exact(3) {
            builder.add_vertex(Point3::new(c[0], c[1], c[2]));
        }
        for tri in indices.chunks_exact(3) {
            builder.add_facet(tri)?;
        }
        builder.end_surface()
    }

    pub fn add_vertex(&mut self, position: Point3<T>) -> VertexId {
        let v = self.surface.new_vertex(position);
        self.nodes.push(v);
        self.star.insert(v, Vec::new());
        v
    }

    pub fn nb_vertices(&self) -> usize {
        self.nodes.len()
    }

    pub fn begin_facet(&mut self) {
        self.facet_nodes.clear();
    }

    /// Appends the input vertex `i` to the facet being described.
    pub fn add_vertex_to_facet(&mut self, i: usize) -> SurfaceResult<()> {
        match self.nodes.get(i) {
            Some(&v) => {
                self.facet_nodes.push(v);
                Ok(())
            }
            None => Err(SurfaceError::VertexOutOfRange {
                facet: self.nb_facets,
                vertex: i,
                count: self.nodes.len(),
            }),
        }
    }

    /// Shorthand for `begin_facet` / `add_vertex_to_facet` / `end_facet`.
    pub fn add_facet(&mut self, indices: &[usize]) -> SurfaceResult<FacetId> {
        self.begin_facet();
        for &i in indices {
            self.add_vertex_to_facet(i)?;
        }
        self.end_facet()
    }

    pub fn end_facet(&mut self) -> SurfaceResult<FacetId> {
        let facet = self.nb_facets;
        self.nb_facets += 1;

        let n = self.facet_nodes.len();
        let mut distinct = self.facet_nodes.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 || distinct.len() != n {
            return Err(SurfaceError::DegenerateFacet { facet });
        }

        for from in 0..n {
            let to = (from + 1) % n;
            if self
                .find_half_edge_between(self.facet_nodes[from], self.facet_nodes[to])
                .is_some()
            {
                warn!(
                    "facet {}: non-manifold edge ({}, {}), duplicating its vertices",
                    facet, self.facet_nodes[from].0, self.facet_nodes[to].0
                );
                self.facet_nodes[from] = self.copy_vertex(self.facet_nodes[from]);
                self.facet_nodes[to] = self.copy_vertex(self.facet_nodes[to]);
            }
        }

        self.begin_facet_internal();
        let nodes = std::mem::take(&mut self.facet_nodes);
        for &v in &nodes {
            self.add_vertex_to_facet_internal(v)?;
        }
        self.facet_nodes = nodes;
        self.end_facet_internal()
    }

    /// Links the border, splits non-manifold vertices and assigns ids.
    pub fn end_surface(mut self) -> SurfaceResult<Surface<T>> {
        self.update_border()?;

        let snapshot: Vec<VertexId> = self.surface.vertices().collect();
        for v in snapshot {
            self.split_non_manifold_vertex(v)?;
        }

        self.surface.reindex();
        self.surface.update_bbox();
        Ok(self.surface)
    }

    // ---------------------------------------------------------------------

    fn copy_vertex(&mut self, from: VertexId) -> VertexId {
        let p = *self.surface.vertex_position(from);
        let v = self.surface.new_vertex(p);
        self.star.insert(v, Vec::new());
        v
    }

    fn find_half_edge_between(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.star
            .get(&from)?
            .iter()
            .copied()
            .find(|&h| self.surface.target(h) == to)
    }

    fn begin_facet_internal(&mut self) {
        self.current_facet = Some(self.surface.new_facet());
        self.first_vertex_in_facet = None;
        self.current_vertex = None;
        self.first_half_edge_in_facet = None;
        self.current_half_edge = None;
    }

    fn add_vertex_to_facet_internal(&mut self, v: VertexId) -> SurfaceResult<()> {
        if let Some(from) = self.current_vertex {
            let h = self.new_half_edge_between(from, v);
            match (self.first_half_edge_in_facet, self.current_half_edge) {
                (None, _) => self.first_half_edge_in_facet = Some(h),
                (Some(_), Some(cur)) => self.surface.link(cur, h),
                (Some(_), None) => {
                    return Err(SurfaceError::inconsistent("add_vertex_to_facet", "no current halfedge"));
                }
            }
            self.current_half_edge = Some(h);
        } else {
            self.first_vertex_in_facet = Some(v);
        }
        self.current_vertex = Some(v);
        Ok(())
    }

    fn end_facet_internal(&mut self) -> SurfaceResult<FacetId> {
        let (Some(last), Some(first), Some(cur), Some(first_h), Some(f)) = (
            self.current_vertex,
            self.first_vertex_in_facet,
            self.current_half_edge,
            self.first_half_edge_in_facet,
            self.current_facet,
        ) else {
            return Err(SurfaceError::inconsistent("end_facet", "facet has no halfedges"));
        };
        let h = self.new_half_edge_between(last, first);
        self.surface.link(cur, h);
        self.surface.link(h, first_h);
        // keyed on the halfedge entering the first vertex so that flattening
        // lists the corners in input order
        self.surface.make_facet_key(h);
        Ok(f)
    }

    fn new_half_edge_between(&mut self, from: VertexId, to: VertexId) -> HalfEdgeId {
        debug_assert!(self.find_half_edge_between(from, to).is_none());
        let h = self.surface.new_half_edge();
        self.surface.set_half_edge_facet(h, self.current_facet);
        self.surface.set_half_edge_vertex(h, to);

        if let Some(o) = self.find_half_edge_between(to, from) {
            self.surface.link_opposite(h, o);
        }

        self.star.entry(from).or_default().push(h);
        self.surface.set_vertex_half_edge(to, Some(h));
        h
    }

    /// Creates a border halfedge opposite every unpaired halfedge, then links
    /// the border cycles by rotating around each border vertex.
    fn update_border(&mut self) -> SurfaceResult<()> {
        let unpaired: Vec<HalfEdgeId> = self
            .surface
            .half_edges()
            .filter(|&h| !self.surface.opposite(h).is_valid())
            .collect();

        for cur in unpaired {
            let h = self.surface.new_half_edge();
            self.surface.link_opposite(h, cur);
            let src = self.surface.source(cur);
            self.surface.set_half_edge_vertex(h, src);
            self.star.entry(self.surface.target(cur)).or_default().push(h);
        }

        let limit = self.surface.orbit_limit();
        let borders: Vec<HalfEdgeId> = self.surface.border_half_edges().collect();
        for cur in borders {
            let mut next = self.surface.opposite(cur);
            let mut steps = 0;
            while !self.surface.is_border(next) {
                next = self.surface.opposite(self.surface.prev(next));
                steps += 1;
                if steps > limit {
                    return Err(SurfaceError::inconsistent(
                        "update_border",
                        format!("no border successor for halfedge {}", cur.0),
                    ));
                }
            }
            self.surface.set_half_edge_next(cur, next);

            let mut prev = self.surface.opposite(cur);
            steps = 0;
            while !self.surface.is_border(prev) {
                prev = self.surface.opposite(self.surface.next(prev));
                steps += 1;
                if steps > limit {
                    return Err(SurfaceError::inconsistent(
                        "update_border",
                        format!("no border predecessor for halfedge {}", cur.0),
                    ));
                }
            }
            self.surface.set_half_edge_prev(cur, prev);
        }
        Ok(())
    }

    fn split_non_manifold_vertex(&mut self, v: VertexId) -> SurfaceResult<bool> {
        let Some(key) = self.surface.vertex(v).half_edge else {
            debug!("isolated vertex {} kept", v.0);
            return Ok(false);
        };
        let star_len = self.star.get(&v).map_or(0, Vec::len);
        let degree = self.surface.vertex_degree(v);
        if star_len == degree {
            return Ok(false);
        }

        warn!(
            "non-manifold vertex {} ({} outgoing halfedges, {} in its orbit), splitting",
            v.0, star_len, degree
        );

        let mut remaining = self.star.get(&v).cloned().unwrap_or_default();
        let first = self.surface.opposite(key);
        self.disconnect_vertex(first, v, &mut remaining)?;

        while let Some(&h) = remaining.first() {
            let nv = self.copy_vertex(v);
            self.disconnect_vertex(h, nv, &mut remaining)?;
        }
        Ok(true)
    }

    /// Moves the wedge of outgoing halfedges containing `start_in` onto `v`.
    fn disconnect_vertex(
        &mut self,
        start_in: HalfEdgeId,
        v: VertexId,
        remaining: &mut Vec<HalfEdgeId>,
    ) -> SurfaceResult<()> {
        let before = remaining.len();
        let limit = self.surface.orbit_limit();
        let mut wedge = Vec::new();

        let mut start = start_in;
        let mut steps = 0;
        while !self.surface.is_border(start) {
            start = self.surface.opposite(self.surface.prev(start));
            steps += 1;
            if start == start_in || steps > limit {
                break;
            }
        }
        self.surface
            .set_vertex_half_edge(v, Some(self.surface.opposite(start)));

        let mut cur = start;
        let o = self.surface.opposite(cur);
        self.surface.set_half_edge_vertex(o, v);
        wedge.push(cur);

        steps = 0;
        while !self.surface.is_border(self.surface.opposite(cur)) {
            cur = self.surface.next(self.surface.opposite(cur));
            steps += 1;
            if cur == start || steps > limit {
                break;
            }
            let o = self.surface.opposite(cur);
            self.surface.set_half_edge_vertex(o, v);
            wedge.push(cur);
        }

        if self.surface.is_border(start) {
            let o = self.surface.opposite(cur);
            self.surface.link(o, start);
        }

        remaining.retain(|h| !wedge.contains(h));
        if remaining.len() == before {
            return Err(SurfaceError::inconsistent(
                "split_non_manifold_vertex",
                format!("wedge at halfedge {} is not part of the star", start_in.0),
            ));
        }
        self.star.insert(v, wedge);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_repeated_corner() {
        let mut b = SurfaceBuilder::<f64>::new();
        for i in 0..3 {
            b.add_vertex(Point3::new(i as f64, 0.0, 0.0));
        }
        assert_eq!(
            b.add_facet(&[0, 1, 1]),
            Err(SurfaceError::DegenerateFacet { facet: 0 })
        );
    }

    #[test]
    fn polygon_facets_keep_their_degree() {
        let mut b = SurfaceBuilder::<f64>::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            b.add_vertex(Point3::from(p));
        }
        let f = b.add_facet(&[0, 1, 2, 3]).unwrap();
        let s = b.end_surface().unwrap();
        assert_eq!(s.facet_degree(f), 4);
        assert_eq!(s.nb_half_edges(), 8);
        assert_eq!(s.border_half_edges().count(), 4);
    }
}
