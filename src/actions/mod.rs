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

//! Reversible edits of flat mesh buffers, their undo/redo history, JSON
//! log and replay.

pub mod action;
pub mod collapse_vertex;
pub mod delete_face;
pub mod delete_vertex;
pub mod flip_edge;
pub mod glue_edges;
pub mod matrix_transform;
pub mod move_object;
pub mod move_vertex;
pub mod record;
pub mod recorder;
pub mod replay;
pub mod snap_vertex;
pub mod stack;
pub mod storage;
pub mod unzip;

pub use action::Action;
pub use collapse_vertex::CollapseVertex;
pub use delete_face::DeleteFace;
pub use delete_vertex::DeleteVertex;
pub use flip_edge::FlipEdge;
pub use glue_edges::GlueEdges;
pub use matrix_transform::MatrixTransformObject;
pub use move_object::MoveObject;
pub use move_vertex::MoveVertex;
pub use record::ActionRecord;
pub use recorder::Recorder;
pub use replay::{ActionFactory, ActionRegistry, FactoryResult, Replayer};
pub use snap_vertex::SnapVertex;
pub use stack::{CommandStack, StackEvent, StackOp};
pub use storage::{MeshBuffers, MeshStorage};
pub use unzip::Unzip;
