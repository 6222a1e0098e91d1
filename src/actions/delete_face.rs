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
        action::{Action, check_face},
        record::ActionRecord,
        storage::MeshStorage,
    },
    error::ActionResult,
};

/// Removes one triangle from the index buffer.
#[derive(Debug, Clone)]
pub struct DeleteFace {
    face_id: usize,
    removed: Option<[usize; 3]>,
}

impl DeleteFace {
    pub fn new(face_id: usize) -> Self {
        Self {
            face_id,
            removed: None,
        }
    }
}

impl Action for DeleteFace {
    fn name(&self) -> &'static str {
        "DeleteFace"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        check_face(mesh, self.face_id)?;
        let mut indices = mesh.indices().to_vec();
        let start = self.face_id * 3;
        let removed: Vec<usize> = indices.drain(start..start + 3).collect();
        self.removed = Some([removed[0], removed[1], removed[2]]);
        mesh.set_indices(indices);
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        let Some(triangle) = self.removed.take() else {
            return Ok(());
        };
        let mut indices = mesh.indices().to_vec();
        let start = (self.face_id * 3).min(indices.len());
        indices.splice(start..start, triangle);
        mesh.set_indices(indices);
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        ActionRecord::DeleteFace {
            face_id: self.face_id,
        }
    }
}
