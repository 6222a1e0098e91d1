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

/// Opens the interior edge between two vertices, at least one of them on a
/// border.
#[derive(Debug, Clone)]
pub struct Unzip {
    id1: usize,
    id2: usize,
    edit: EditedBuffers,
}

impl Unzip {
    pub fn new(mesh: &dyn MeshStorage, id1: usize, id2: usize) -> ActionResult<Self> {
        check_vertex(mesh, id1)?;
        check_vertex(mesh, id2)?;
        let edit = EditedBuffers::run(mesh, |api| api.unzip_edge(id1, id2))?;
        Ok(Self { id1, id2, edit })
    }
}

impl Action for Unzip {
    fn name(&self) -> &'static str {
        "Unzip"
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
        ActionRecord::Unzip {
            id1: self.id1,
            id2: self.id2,
        }
    }
}
