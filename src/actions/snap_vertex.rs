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
    actions::{
        action::{Action, check_vertex},
        record::ActionRecord,
        storage::MeshStorage,
    },
    error::{ActionError, ActionResult},
};

/// Moves a vertex onto the position of another one.
#[derive(Debug, Clone)]
pub struct SnapVertex {
    vertex_id: usize,
    target_id: usize,
    from: Option<[f64; 3]>,
}

impl SnapVertex {
    pub fn new(vertex_id: usize, target_id: usize) -> Self {
        Self {
            vertex_id,
            target_id,
            from: None,
        }
    }
}

impl Action for SnapVertex {
    fn name(&self) -> &'static str {
        "SnapVertex"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        check_vertex(mesh, self.vertex_id)?;
        let target = mesh
            .position(self.target_id)
            .ok_or(ActionError::VertexOutOfRange {
                id: self.target_id,
                count: mesh.nb_vertices(),
            })?;
        self.from = mesh.position(self.vertex_id);
        mesh.set_position(self.vertex_id, target);
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        if let Some(from) = self.from.take() {
            check_vertex(mesh, self.vertex_id)?;
            mesh.set_position(self.vertex_id, from);
        }
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        ActionRecord::SnapVertex {
            vertex_id: self.vertex_id,
            target_id: self.target_id,
        }
    }
}
