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

use std::fmt::Debug;

use crate::{
    actions::{record::ActionRecord, storage::MeshStorage},
    error::{ActionError, ActionResult, EditResult},
    mesh::HalfedgeApi,
};

/// A reversible edit of a [`MeshStorage`].
///
/// `revert` after `apply` must restore the buffers exactly, and `apply`
/// after `revert` must redo the same edit.
pub trait Action: Debug {
    fn name(&self) -> &'static str;
    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()>;
    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()>;
    fn serialize_params(&self) -> ActionRecord;
}

pub(crate) fn check_vertex(mesh: &dyn MeshStorage, id: usize) -> ActionResult<()> {
    let count = mesh.nb_vertices();
    if id < count {
        Ok(())
    } else {
        Err(ActionError::VertexOutOfRange { id, count })
    }
}

pub(crate) fn check_face(mesh: &dyn MeshStorage, id: usize) -> ActionResult<()> {
    let count = mesh.nb_faces();
    if id < count {
        Ok(())
    } else {
        Err(ActionError::FaceOutOfRange { id, count })
    }
}

/// Full copy of both buffers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub positions: Vec<f64>,
    pub indices: Vec<usize>,
}

impl Snapshot {
    pub fn capture(mesh: &dyn MeshStorage) -> Self {
        Self {
            positions: mesh.positions().to_vec(),
            indices: mesh.indices().to_vec(),
        }
    }

    pub fn restore(&self, mesh: &mut dyn MeshStorage) {
        mesh.set_positions(self.positions.clone());
        mesh.set_indices(self.indices.clone());
    }
}

/// Before and after buffers of an edit run through the halfedge editor.
#[derive(Debug, Clone)]
pub(crate) struct EditedBuffers {
    pub before: Snapshot,
    pub after: Snapshot,
}

impl EditedBuffers {
    /// Builds a surface from `mesh`, runs `op` on it and flattens the result.
    /// `mesh` itself is left untouched.
    pub fn run<F>(mesh: &dyn MeshStorage, op: F) -> ActionResult<Self>
    where
        F: FnOnce(&mut HalfedgeApi) -> EditResult<()>,
    {
        let before = Snapshot::capture(mesh);
        let mut api = HalfedgeApi::from_buffers(&before.positions, &before.indices)?;
        op(&mut api)?;
        let after = Snapshot {
            positions: api.positions(),
            indices: api.indices()?,
        };
        Ok(Self { before, after })
    }

    pub fn apply(&self, mesh: &mut dyn MeshStorage) {
        self.after.restore(mesh);
    }

    pub fn revert(&self, mesh: &mut dyn MeshStorage) {
        self.before.restore(mesh);
    }
}
