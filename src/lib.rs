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

//! Editable triangulated surfaces with an undoable, replayable action log.
//!
//! The [`mesh`] layer holds a halfedge [`Surface`](mesh::Surface), its
//! builder from flat buffers and the Euler operators of
//! [`SurfaceEditor`](mesh::SurfaceEditor). The [`actions`] layer wraps edits
//! of flat position/index buffers as reversible actions driven by a bounded
//! [`CommandStack`](actions::CommandStack), recorded as JSON and replayed
//! through an [`ActionRegistry`](actions::ActionRegistry).

pub mod actions;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod numeric;

pub use actions::{
    Action, ActionRecord, ActionRegistry, CommandStack, MeshBuffers, MeshStorage, Recorder,
    Replayer,
};
pub use config::EditConfig;
pub use error::{ActionError, EditError, FactoryError, Refusal, ReplayError, SurfaceError};
pub use mesh::{HalfedgeApi, Surface, SurfaceBuilder, SurfaceEditor};
