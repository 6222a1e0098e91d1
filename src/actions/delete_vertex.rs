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
    error::ActionResult,
};

/// Removes every triangle referencing a vertex. The position stays in place.
#[derive(Debug, Clone)]
pub struct DeleteVertex {
    node_id: usize,
    /// Removed triangles with their face index before removal, ascending.
    removed: Vec<(usize, [usize; 3])>,
}

impl DeleteVertex {
    pub fn new(node_id: usize) -> Self {
        Self {
            node_id,
            removed: Vec::new(),
        }
    }
}

impl Action for DeleteVertex {
    fn name(&self) -> &'static str {
        "DeleteVertex"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        check_vertex(mesh, self.node_id)?;
        let mut kept = Vec::with_capacity(mesh.indices().len());
        self.removed.clear();
        for (face, t) in mesh.indices().chunks_exact(3).enumerate() {
            if t.contains(&self.node_id) {
                self.removed.push((face, [t[0], t[1], t[2]]));
            } else {
                kept.extend_from_slice(t);
            }
        }
        mesh.set_indices(kept);
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        if self.removed.is_empty() {
            return Ok(());
        }
        let mut indices = mesh.indices().to_vec();
        for (face, t) in self.removed.drain(..) {
            let start = (face * 3).min(indices.len());
            indices.splice(start..start, t);
        }
        mesh.set_indices(indices);
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        ActionRecord::DeleteVertex {
            node_id: self.node_id,
        }
    }
}
