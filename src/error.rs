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

//! Error types for every layer of the crate.
//!
//! Construction failures surface as [`SurfaceError`], editor failures as
//! [`EditError`] (a topological refusal carries its [`Refusal`] reason),
//! action failures as [`ActionError`] and log replay failures as
//! [`ReplayError`].

use thiserror::Error;

pub type SurfaceResult<T> = Result<T, SurfaceError>;
pub type EditResult<T> = Result<T, EditError>;
pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A facet with fewer than three distinct vertices.
    #[error("facet {facet} has fewer than 3 distinct vertices")]
    DegenerateFacet { facet: usize },

    #[error("facet {facet} refers to vertex {vertex}, only {count} vertices exist")]
    VertexOutOfRange {
        facet: usize,
        vertex: usize,
        count: usize,
    },

    #[error("malformed {buffer} buffer: length {len} is not a multiple of 3")]
    MalformedBuffer { buffer: &'static str, len: usize },

    #[error("facet {facet} is not a triangle")]
    NotTriangulated { facet: usize },

    /// Halfedge linkage found broken while building or traversing.
    #[error("inconsistent surface during {operation}: {details}")]
    Inconsistent {
        operation: &'static str,
        details: String,
    },
}

impl SurfaceError {
    pub fn inconsistent(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Inconsistent {
            operation,
            details: details.into(),
        }
    }
}

/// Why an editor operator declined to modify the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The handle points at a removed or unknown element.
    DeadElement,
    IsolatedVertex,
    /// Both halfedges flanking the vertex are borders.
    BorderFan,
    /// The border corner around the vertex has only two edges.
    DegenerateBorderCorner,
    NotBorder,
    OnBorder,
    SameHalfEdge,
    NotSameFacet,
    ConsecutiveHalfEdges,
    NotTriangles,
    /// Gluing would connect a facet to itself.
    SameFacet,
    EdgeExists,
    IncompatibleOrbits,
    NoBorderEndpoint,
    NoBorderAroundVertex,
    TooFewSides,
    /// The vertex joins more than one border wedge.
    PinchedVertex,
    /// The vertex is linked to the same neighbour through two edges.
    RepeatedNeighbor,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Refusal::DeadElement => "element is not live",
            Refusal::IsolatedVertex => "vertex has no incident halfedge",
            Refusal::BorderFan => "both halfedges around the vertex are borders",
            Refusal::DegenerateBorderCorner => "border corner has prev == next",
            Refusal::NotBorder => "halfedge is not a border",
            Refusal::OnBorder => "halfedge lies on a border",
            Refusal::SameHalfEdge => "both halfedges are the same",
            Refusal::NotSameFacet => "halfedges are not on the same facet",
            Refusal::ConsecutiveHalfEdges => "halfedges are consecutive",
            Refusal::NotTriangles => "incident facets are not both triangles",
            Refusal::SameFacet => "opposite facets are the same",
            Refusal::EdgeExists => "an edge already connects the merged vertices",
            Refusal::IncompatibleOrbits => "vertex orbits cannot be merged",
            Refusal::NoBorderEndpoint => "no endpoint lies on a border",
            Refusal::NoBorderAroundVertex => "no border pair around the vertex",
            Refusal::TooFewSides => "a polygon needs at least 3 sides",
            Refusal::PinchedVertex => "vertex joins several border wedges",
            Refusal::RepeatedNeighbor => "vertex reaches a neighbour through two edges",
        };
        f.write_str(msg)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("editor is not in edit mode")]
    NotInEditMode,

    #[error("vertex id {id} out of range ({count} vertices)")]
    VertexOutOfRange { id: usize, count: usize },

    #[error("facet id {id} out of range ({count} facets)")]
    FacetOutOfRange { id: usize, count: usize },

    #[error("halfedge {id} out of range ({count} halfedges)")]
    HalfEdgeOutOfRange { id: usize, count: usize },

    /// The handle is in range but its element was removed.
    #[error("{kind} {index} was removed")]
    StaleHandle { kind: &'static str, index: usize },

    #[error("no edge between vertex ids {v1} and {v2}")]
    NoSuchEdge { v1: usize, v2: usize },

    #[error("refused: {0}")]
    Refused(Refusal),

    #[error("inconsistent surface during {operation}: {details}")]
    Inconsistent {
        operation: &'static str,
        details: String,
    },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl EditError {
    pub fn inconsistent(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Inconsistent {
            operation,
            details: details.into(),
        }
    }

    pub fn is_refusal(&self) -> bool {
        matches!(self, EditError::Refused(_))
    }
}

impl From<Refusal> for EditError {
    fn from(r: Refusal) -> Self {
        EditError::Refused(r)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("vertex {id} out of range ({count} vertices)")]
    VertexOutOfRange { id: usize, count: usize },

    #[error("face {id} out of range ({count} faces)")]
    FaceOutOfRange { id: usize, count: usize },

    #[error("no edge between vertices {v1} and {v2}")]
    NoSuchEdge { v1: usize, v2: usize },

    #[error("record {found} handed to factory for {expected}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Why a registered factory could not build its action.
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Action(#[from] ActionError),
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("action log is not a JSON array of records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {index} has no \"name\" field")]
    MissingName { index: usize },

    #[error("record {index}: unknown action {name:?}")]
    UnknownAction { index: usize, name: String },

    #[error("record {index}: cannot decode parameters: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index}: {source}")]
    Action {
        index: usize,
        #[source]
        source: ActionError,
    },
}
