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

/// Glues two border edges, each given by its two vertex ids.
#[derive(Debug, Clone)]
pub struct GlueEdges {
    edge1: [usize; 2],
    edge2: [usize; 2],
    edit: EditedBuffers,
}

impl GlueEdges {
    pub fn new(mesh: &dyn MeshStorage, edge1: [usize; 2], edge2: [usize; 2]) -> ActionResult<Self> {
        for id in edge1.iter().chain(edge2.iter()) {
            check_vertex(mesh, *id)?;
        }
        let edit = EditedBuffers::run(mesh, |api| api.glue_edges(edge1, edge2))?;
        Ok(Self { edge1, edge2, edit })
    }
}

impl Action for GlueEdges {
    fn name(&self) -> &'static str {
        "GlueEdges"
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
        ActionRecord::GlueEdges {
            edge1: self.edge1,
            edge2: self.edge2,
        }
    }
}
