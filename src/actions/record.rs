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

use serde::{Deserialize, Serialize};

/// Serialized parameters of one action, tagged by its `"name"`.
///
/// Field names follow the log format, e.g.
/// `{"name": "DeleteFace", "faceID": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ActionRecord {
    DeleteFace {
        #[serde(rename = "faceID")]
        face_id: usize,
    },
    DeleteVertex {
        #[serde(rename = "nodeID")]
        node_id: usize,
    },
    MoveVertex {
        #[serde(rename = "vertexID")]
        vertex_id: usize,
        to: [f64; 3],
    },
    SnapVertex {
        #[serde(rename = "vertexID")]
        vertex_id: usize,
        #[serde(rename = "targetID")]
        target_id: usize,
    },
    MatrixTransformObject {
        /// Row-major 4x4.
        matrix: [f64; 16],
        /// Informational: translation, scaling, rotation or general.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },
    FlipEdge {
        v1: usize,
        v2: usize,
        #[serde(rename = "face1ID", default)]
        face1_id: usize,
        #[serde(rename = "face2ID", default)]
        face2_id: usize,
        #[serde(rename = "face1IDs", default)]
        face1_ids: [usize; 3],
        #[serde(rename = "face2IDs", default)]
        face2_ids: [usize; 3],
    },
    MoveObject {
        translation: [f64; 3],
    },
    CollapseVertex {
        #[serde(rename = "nodeID")]
        node_id: usize,
    },
    GlueEdges {
        edge1: [usize; 2],
        edge2: [usize; 2],
    },
    Unzip {
        id1: usize,
        id2: usize,
    },
}

impl ActionRecord {
    /// The `"name"` tag this record serializes with.
    pub fn name(&self) -> &'static str {
        match self {
            ActionRecord::DeleteFace { .. } => "DeleteFace",
            ActionRecord::DeleteVertex { .. } => "DeleteVertex",
            ActionRecord::MoveVertex { .. } => "MoveVertex",
            ActionRecord::SnapVertex { .. } => "SnapVertex",
            ActionRecord::MatrixTransformObject { .. } => "MatrixTransformObject",
            ActionRecord::FlipEdge { .. } => "FlipEdge",
            ActionRecord::MoveObject { .. } => "MoveObject",
            ActionRecord::CollapseVertex { .. } => "CollapseVertex",
            ActionRecord::GlueEdges { .. } => "GlueEdges",
            ActionRecord::Unzip { .. } => "Unzip",
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
