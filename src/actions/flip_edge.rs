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
    mesh::{FacetId, Surface},
};

/// Switches the diagonal shared by two triangles.
///
/// The edit runs when the action is built, against the buffers it is built
/// from; `apply` and `revert` swap between the stored results.
#[derive(Debug, Clone)]
pub struct FlipEdge {
    v1: usize,
    v2: usize,
    faces: [(usize, [usize; 3]); 2],
    edit: EditedBuffers,
}

fn face_record(surface: &Surface<f64>, f: Option<FacetId>) -> (usize, [usize; 3]) {
    let Some(f) = f else {
        return (0, [0; 3]);
    };
    let ids = surface.facet_vertex_ids(f);
    let mut corners = [0; 3];
    for (slot, id) in corners.iter_mut().zip(ids.iter()) {
        *slot = *id;
    }
    (surface.facet(f).id, corners)
}

impl FlipEdge {
    pub fn new(mesh: &dyn MeshStorage, v1: usize, v2: usize) -> ActionResult<Self> {
        check_vertex(mesh, v1)?;
        check_vertex(mesh, v2)?;
        let mut faces = [(0, [0; 3]); 2];
        let edit = EditedBuffers::run(mesh, |api| {
            let h = api.edge(v1, v2)?;
            let s = api.surface();
            faces = [
                face_record(s, s.facet_of(h)),
                face_record(s, s.opposite_facet(h)),
            ];
            api.switch_edge(v1, v2)
        })?;
        Ok(Self { v1, v2, faces, edit })
    }

    /// Resulting index buffer.
    pub fn flipped_indices(&self) -> &[usize] {
        &self.edit.after.indices
    }
}

impl Action for FlipEdge {
    fn name(&self) -> &'static str {
        "FlipEdge"
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
        let [(face1_id, face1_ids), (face2_id, face2_ids)] = self.faces;
        ActionRecord::FlipEdge {
            v1: self.v1,
            v2: self.v2,
            face1_id,
            face2_id,
            face1_ids,
            face2_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::storage::MeshBuffers;

    fn quad() -> MeshBuffers {
        MeshBuffers::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn record_names_both_faces() {
        let m = quad();
        let a = FlipEdge::new(&m, 0, 2).unwrap();
        match a.serialize_params() {
            ActionRecord::FlipEdge {
                face1_id,
                face2_id,
                face1_ids,
                face2_ids,
                ..
            } => {
                let mut faces = [face1_id, face2_id];
                faces.sort();
                assert_eq!(faces, [0, 1]);
                assert!(face1_ids.contains(&0) && face1_ids.contains(&2));
                assert!(face2_ids.contains(&0) && face2_ids.contains(&2));
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn border_edge_cannot_flip() {
        let m = quad();
        assert!(FlipEdge::new(&m, 0, 1).is_err());
    }
}
