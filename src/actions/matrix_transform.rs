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
    actions::{action::Action, record::ActionRecord, storage::MeshStorage},
    error::ActionResult,
    geometry::{Matrix4, Point3, TransformKind},
};

/// Applies a homogeneous transform to every position.
#[derive(Debug, Clone)]
pub struct MatrixTransformObject {
    matrix: Matrix4<f64>,
    previous: Option<Vec<f64>>,
}

impl MatrixTransformObject {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self {
            matrix,
            previous: None,
        }
    }

    pub fn from_row_major(values: &[f64; 16]) -> Self {
        Self::new(Matrix4::from_row_major(values))
    }

    pub fn kind(&self) -> TransformKind {
        self.matrix.classify()
    }
}

pub(crate) fn transform_positions(mesh: &mut dyn MeshStorage, f: impl Fn(&Point3<f64>) -> Point3<f64>) {
    for chunk in mesh.positions_mut().chunks_exact_mut(3) {
        let p = f(&Point3::new(chunk[0], chunk[1], chunk[2]));
        chunk.copy_from_slice(&p.coords);
    }
}

impl Action for MatrixTransformObject {
    fn name(&self) -> &'static str {
        "MatrixTransformObject"
    }

    fn apply(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        self.previous = Some(mesh.positions().to_vec());
        let m = self.matrix;
        transform_positions(mesh, |p| m.transform_point(p));
        Ok(())
    }

    fn revert(&mut self, mesh: &mut dyn MeshStorage) -> ActionResult<()> {
        if let Some(previous) = self.previous.take() {
            mesh.set_positions(previous);
        }
        Ok(())
    }

    fn serialize_params(&self) -> ActionRecord {
        let operation = match self.kind() {
            TransformKind::Identity | TransformKind::General => None,
            kind => Some(kind.as_str().to_string()),
        };
        ActionRecord::MatrixTransformObject {
            matrix: self.matrix.to_row_major(),
            operation,
        }
    }
}
