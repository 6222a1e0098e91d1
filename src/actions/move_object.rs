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
        action::Action, matrix_transform::transform_positions, record::ActionRecord,
        storage::MeshStorage,
    },
    error::ActionResult,
    geometry::Vector3,
};

/// Translates every position.
#[derive(Debug, Clone)]
pub struct MoveObject {
    translation: [f64; 3],
    previous: Option<Vec<f64>>,
}

impl MoveObject {
    pub fn new(translation: [f64; 3]) -> Self {
        Self {
            translation,
            previous: None,
        }
    }
}

impl Action for MoveObject {
    fn name(&self) -> &'static str {
        "MoveObject"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        self.previous = Some(mesh.positions().to_vec());
        let [x, y, z] = self.translation;
        let t = Vector3::new(x, y, z);
        transform_positions(mesh, |p| p.add_vector(&t));
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        if let Some(previous) = self.previous.take() {
            mesh.set_positions(previous);
        }
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        ActionRecord::MoveObject {
            translation: self.translation,
        }
    }
}
