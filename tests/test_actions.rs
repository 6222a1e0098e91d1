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

use meshedit::{
    actions::{
        Action, ActionRecord, CollapseVertex, CommandStack, DeleteFace, DeleteVertex, FlipEdge,
        GlueEdges, MatrixTransformObject, MeshBuffers, MeshStorage, MoveObject, MoveVertex,
        SnapVertex, Unzip,
    },
    error::{ActionError, EditError, Refusal},
    geometry::Matrix4,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quad() -> MeshBuffers {
    MeshBuffers::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        vec![0, 1, 2, 0, 2, 3],
    )
}

fn fan() -> MeshBuffers {
    MeshBuffers::new(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.3, 0.6, 0.1,
        ],
        vec![0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4],
    )
}

fn split_square() -> MeshBuffers {
    MeshBuffers::new(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        vec![0, 1, 2, 3, 4, 5],
    )
}

fn normalized(indices: &[usize]) -> Vec<[usize; 3]> {
    let mut tris: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|t| {
            let k = (0..3).min_by_key(|&i| t[i]).unwrap();
            [t[k], t[(k + 1) % 3], t[(k + 2) % 3]]
        })
        .collect();
    tris.sort();
    tris
}

/// Executes `action`, checks it changed the mesh, undoes it and checks the
/// buffers are restored bit for bit; then redoes it.
fn round_trip(mesh: MeshBuffers, action: Box<dyn Action>) -> CommandStack<MeshBuffers> {
    init_logger();
    let before = (mesh.positions().to_vec(), mesh.indices().to_vec());
    let mut stack = CommandStack::new(mesh);
    stack.execute(action).unwrap();
    let after = (stack.mesh().positions().to_vec(), stack.mesh().indices().to_vec());
    assert_ne!(before, after);

    assert!(stack.undo().unwrap());
    let undone = (stack.mesh().positions().to_vec(), stack.mesh().indices().to_vec());
    assert_eq!(before, undone);

    assert!(stack.redo().unwrap());
    let redone = (stack.mesh().positions().to_vec(), stack.mesh().indices().to_vec());
    assert_eq!(after, redone);
    stack
}

#[test]
fn test_delete_face() {
    let stack = round_trip(quad(), Box::new(DeleteFace::new(0)));
    assert_eq!(stack.mesh().indices(), &[0, 2, 3]);
}

#[test]
fn test_delete_vertex() {
    let stack = round_trip(fan(), Box::new(DeleteVertex::new(1)));
    assert_eq!(stack.mesh().indices(), &[2, 3, 4, 3, 0, 4]);
    assert_eq!(stack.mesh().nb_vertices(), 5);
}

#[test]
fn test_move_vertex() {
    let stack = round_trip(quad(), Box::new(MoveVertex::new(2, [2.0, 3.0, 4.0])));
    assert_eq!(stack.mesh().position(2), Some([2.0, 3.0, 4.0]));
    assert_eq!(stack.mesh().bbox().unwrap().max.coords, [2.0, 3.0, 4.0]);
}

#[test]
fn test_snap_vertex() {
    let stack = round_trip(fan(), Box::new(SnapVertex::new(4, 2)));
    assert_eq!(stack.mesh().position(4), Some([1.0, 1.0, 0.0]));
}

#[test]
fn test_matrix_transform() {
    let m = Matrix4::scaling([2.0, 2.0, 2.0]);
    let stack = round_trip(fan(), Box::new(MatrixTransformObject::new(m)));
    assert_eq!(stack.mesh().position(2), Some([2.0, 2.0, 0.0]));
    let record = stack.recorder().unwrap().records()[0].clone();
    match record {
        ActionRecord::MatrixTransformObject { matrix, operation } => {
            assert_eq!(matrix[0], 2.0);
            assert_eq!(matrix[15], 1.0);
            assert_eq!(operation.as_deref(), Some("scaling"));
        }
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn test_move_object() {
    let stack = round_trip(fan(), Box::new(MoveObject::new([0.1, 0.2, 0.3])));
    assert_eq!(stack.mesh().position(0), Some([0.1, 0.2, 0.3]));
}

#[test]
fn test_flip_edge() {
    let mesh = quad();
    let action = FlipEdge::new(&mesh, 0, 2).unwrap();
    let stack = round_trip(mesh, Box::new(action));
    assert_eq!(normalized(stack.mesh().indices()), vec![[0, 1, 3], [1, 2, 3]]);
}

#[test]
fn test_flip_edge_back_restores_pair() {
    let mesh = quad();
    let first = FlipEdge::new(&mesh, 0, 2).unwrap();
    let mut stack = CommandStack::new(mesh);
    stack.execute(Box::new(first)).unwrap();
    let second = FlipEdge::new(stack.mesh(), 1, 3).unwrap();
    stack.execute(Box::new(second)).unwrap();
    assert_eq!(normalized(stack.mesh().indices()), vec![[0, 1, 2], [0, 2, 3]]);
}

#[test]
fn test_refused_flip_is_never_built() {
    let mesh = quad();
    let err = FlipEdge::new(&mesh, 0, 1).unwrap_err();
    assert_eq!(err, ActionError::Edit(EditError::Refused(Refusal::OnBorder)));
    let err = FlipEdge::new(&mesh, 0, 9).unwrap_err();
    assert_eq!(err, ActionError::VertexOutOfRange { id: 9, count: 4 });
}

#[test]
fn test_collapse_vertex() {
    let mesh = fan();
    let action = CollapseVertex::new(&mesh, 4).unwrap();
    let stack = round_trip(mesh, Box::new(action));
    assert_eq!(stack.mesh().nb_vertices(), 4);
    assert_eq!(stack.mesh().nb_faces(), 2);
}

#[test]
fn test_glue_edges() {
    let mesh = split_square();
    let action = GlueEdges::new(&mesh, [1, 2], [3, 5]).unwrap();
    let stack = round_trip(mesh, Box::new(action));
    assert_eq!(stack.mesh().nb_vertices(), 4);
    assert_eq!(stack.mesh().nb_faces(), 2);
}

#[test]
fn test_unzip() {
    let mesh = quad();
    let action = Unzip::new(&mesh, 0, 2).unwrap();
    let stack = round_trip(mesh, Box::new(action));
    assert_eq!(stack.mesh().nb_vertices(), 6);
    assert_eq!(stack.mesh().nb_faces(), 2);
}

#[test]
fn test_out_of_range_actions_fail_cleanly() {
    let mut stack = CommandStack::new(quad());
    assert_eq!(
        stack.execute(Box::new(DeleteFace::new(2))).unwrap_err(),
        ActionError::FaceOutOfRange { id: 2, count: 2 }
    );
    assert_eq!(
        stack.execute(Box::new(DeleteVertex::new(4))).unwrap_err(),
        ActionError::VertexOutOfRange { id: 4, count: 4 }
    );
    assert!(!stack.can_undo());
    assert_eq!(stack.mesh().revision(), 0);
}

#[test]
fn test_records_serialize_with_log_names() {
    let mesh = quad();
    let flip = FlipEdge::new(&mesh, 0, 2).unwrap();
    let v = flip.serialize_params().to_value();
    assert_eq!(v["name"], "FlipEdge");
    assert_eq!(v["v1"], 0);
    assert_eq!(v["v2"], 2);
    assert!(v.get("face1IDs").is_some());
    assert_eq!(
        DeleteVertex::new(3).serialize_params().to_value(),
        serde_json::json!({"name": "DeleteVertex", "nodeID": 3})
    );
}
