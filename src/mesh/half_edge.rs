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

use crate::mesh::basic_types::{FacetId, HalfEdgeId, VertexId};

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub vertex: VertexId,        // vertex it ends at
    pub facet: Option<FacetId>,  // None on the border
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    pub opposite: HalfEdgeId,
    pub removed: bool,
}

impl HalfEdge {
    pub fn new() -> Self {
        Self {
            vertex: VertexId::INVALID,
            facet: None,
            next: HalfEdgeId::INVALID,
            prev: HalfEdgeId::INVALID,
            opposite: HalfEdgeId::INVALID,
            removed: false,
        }
    }

    #[inline]
    pub fn is_border(&self) -> bool {
        self.facet.is_none()
    }
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self::new()
    }
}
