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
    geometry::aabb::Aabb,
    mesh::{face::Facet, half_edge::HalfEdge, vertex::Vertex},
    numeric::scalar::Scalar,
};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            pub const INVALID: Self = Self(usize::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != usize::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

handle!(
    /// Arena index of a vertex.
    VertexId
);
handle!(
    /// Arena index of a halfedge.
    HalfEdgeId
);
handle!(
    /// Arena index of a facet.
    FacetId
);

/// Halfedge surface. Owns every vertex, halfedge and facet in flat arenas;
/// removed elements are tombstoned and skipped by traversals.
#[derive(Debug, Clone)]
pub struct Surface<T: Scalar = f64> {
    pub(crate) vertices: Vec<Vertex<T>>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) facets: Vec<Facet>,

    /// Live vertices by id, rebuilt on reindex.
    pub(crate) vertex_by_id: Vec<VertexId>,
    pub(crate) facet_by_id: Vec<FacetId>,
    pub(crate) bbox: Option<Aabb<T>>,
}

impl<T: Scalar> Default for Surface<T> {
    fn default() -> Self {
        Surface {
            vertices: Vec::new(),
            half_edges: Vec::new(),
            facets: Vec::new(),
            vertex_by_id: Vec::new(),
            facet_by_id: Vec::new(),
            bbox: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_handles_are_not_valid() {
        assert!(!VertexId::INVALID.is_valid());
        assert!(HalfEdgeId(0).is_valid());
        assert_eq!(FacetId::default(), FacetId::INVALID);
    }
}
