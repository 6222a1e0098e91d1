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

use crate::geometry::{Aabb, Point3};

/// Flat vertex and triangle buffers an action edits.
///
/// Positions are `[x, y, z, ...]`, indices are three vertex ids per
/// triangle. `mark_changed` is called once after every apply or revert.
pub trait MeshStorage {
    fn positions(&self) -> &[f64];
    fn indices(&self) -> &[usize];
    fn positions_mut(&mut self) -> &mut [f64];
    fn set_positions(&mut self, positions: Vec<f64>);
    fn set_indices(&mut self, indices: Vec<usize>);
    fn mark_changed(&mut self);

    fn nb_vertices(&self) -> usize {
        self.positions().len() / 3
    }

    fn nb_faces(&self) -> usize {
        self.indices().len() / 3
    }

    fn position(&self, vertex: usize) -> Option<[f64; 3]> {
        let base = vertex.checked_mul(3)?;
        let p = self.positions().get(base..base + 3)?;
        Some([p[0], p[1], p[2]])
    }

    fn set_position(&mut self, vertex: usize, p: [f64; 3]) -> bool {
        let Some(base) = vertex.checked_mul(3) else {
            return false;
        };
        match self.positions_mut().get_mut(base..base + 3) {
            Some(slot) => {
                slot.copy_from_slice(&p);
                true
            }
            None => false,
        }
    }
}

/// In-memory buffers with a cached bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<f64>,
    indices: Vec<usize>,
    bbox: Option<Aabb<f64>>,
    revision: u64,
}

impl MeshBuffers {
    pub fn new(positions: Vec<f64>, indices: Vec<usize>) -> Self {
        let bbox = Aabb::from_buffer(&positions);
        Self {
            positions,
            indices,
            bbox,
            revision: 0,
        }
    }

    pub fn bbox(&self) -> Option<&Aabb<f64>> {
        self.bbox.as_ref()
    }

    /// Number of `mark_changed` calls so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_buffers(self) -> (Vec<f64>, Vec<usize>) {
        (self.positions, self.indices)
    }

    pub fn triangle(&self, face: usize) -> Option<[usize; 3]> {
        let base = face.checked_mul(3)?;
        let t = self.indices.get(base..base + 3)?;
        Some([t[0], t[1], t[2]])
    }

    pub fn point(&self, vertex: usize) -> Option<Point3<f64>> {
        Point3::from_slice(&self.positions, vertex)
    }
}

impl MeshStorage for MeshBuffers {
    fn positions(&self) -> &[f64] {
        &self.positions
    }

    fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn positions_mut(&mut self) -> &mut [f64] {
        &mut self.positions
    }

    fn set_positions(&mut self, positions: Vec<f64>) {
        self.positions = positions;
    }

    fn set_indices(&mut self, indices: Vec<usize>) {
        self.indices = indices;
    }

    fn mark_changed(&mut self) {
        self.bbox = Aabb::from_buffer(&self.positions);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_changed_refreshes_the_box() {
        let mut m = MeshBuffers::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], vec![]);
        assert!(m.set_position(1, [2.0, 3.0, 4.0]));
        assert_eq!(m.bbox().unwrap().max, Point3::new(1.0, 1.0, 1.0));
        m.mark_changed();
        assert_eq!(m.bbox().unwrap().max, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(m.revision(), 1);
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        let mut m = MeshBuffers::new(vec![0.0; 3], vec![]);
        assert_eq!(m.position(1), None);
        assert!(!m.set_position(1, [1.0; 3]));
        assert_eq!(m.nb_vertices(), 1);
    }
}
