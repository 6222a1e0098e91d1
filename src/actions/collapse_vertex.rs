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
        action::{Action, EditedBuffers, check_vertex},
        record::ActionRecord,
        storage::MeshStorage,
    },
    error::ActionResult,
};

/// Removes a vertex and merges its star into one facet, triangulated again.
#[derive(Debug, Clone)]
pub struct CollapseVertex {
    node_id: usize,
    edit: EditedBuffers,
}

impl CollapseVertex {
    pub fn new(mesh: &dyn MeshStorage, node_id: usize) -> ActionResult<Self> {
        check_vertex(mesh, node_id)?;
        let edit = EditedBuffers::run(mesh, |api| api.collapse_vertex(node_id))?;
        Ok(Self { node_id, edit })
    }
}

impl Action for CollapseVertex {
    fn name(&self) -> &'static str {
        "CollapseVertex"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        self.edit.apply(mesh);
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        self.edit.revert(mesh);
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        ActionRecord::CollapseVertex {
            node_id: self.node_id,
        }
    }
}
