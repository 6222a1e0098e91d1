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
        Action, ActionRegistry, CommandStack, DeleteFace, FactoryResult, FlipEdge, MeshBuffers,
        MeshStorage, MoveObject, MoveVertex, Replayer, SnapVertex,
    },
    config::EditConfig,
    error::{ActionError, ReplayError},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::Value;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quad() -> MeshBuffers {
    MeshBuffers::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// `n` x `n` grid of quads, two triangles each.
fn grid(n: usize) -> MeshBuffers {
    let mut positions = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            positions.extend_from_slice(&[i as f64, j as f64, 0.0]);
        }
    }
    let mut indices = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let a = j * (n + 1) + i;
            let (b, c, d) = (a + 1, a + n + 2, a + n + 1);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    MeshBuffers::new(positions, indices)
}

#[test]
fn test_replay_delete_face_on_quad() {
    init_logger();
    let mut mesh = quad();
    let n = Replayer::default()
        .replay(r#"[{"name":"DeleteFace","faceID":0}]"#, &mut mesh)
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(mesh.indices(), &[0, 2, 3]);
    assert_eq!(mesh.revision(), 1);
}

#[test]
fn test_unknown_action_aborts() {
    let mut mesh = quad();
    let log = r#"[
        {"name": "DeleteFace", "faceID": 0},
        {"name": "Explode"},
        {"name": "DeleteFace", "faceID": 0}
    ]"#;
    let err = Replayer::default().replay(log, &mut mesh).unwrap_err();
    match err {
        ReplayError::UnknownAction { index, name } => {
            assert_eq!(index, 1);
            assert_eq!(name, "Explode");
        }
        other => panic!("unexpected error {other}"),
    }
    // no rollback of what was already applied
    assert_eq!(mesh.indices(), &[0, 2, 3]);
}

#[test]
fn test_unregistered_name_is_unknown() {
    let mut registry = ActionRegistry::with_defaults();
    registry.unregister("DeleteFace");
    let mut mesh = quad();
    let err = Replayer::new(registry)
        .replay(r#"[{"name":"DeleteFace","faceID":0}]"#, &mut mesh)
        .unwrap_err();
    assert!(matches!(err, ReplayError::UnknownAction { index: 0, .. }));
    assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
}

#[test]
fn test_bad_parameters() {
    let mut mesh = quad();
    let replayer = Replayer::default();
    let err = replayer
        .replay(r#"[{"name":"MoveVertex","vertexID":"zero"}]"#, &mut mesh)
        .unwrap_err();
    assert!(matches!(err, ReplayError::Decode { index: 0, .. }));

    let err = replayer
        .replay(r#"[{"name":"DeleteFace","faceID":3}]"#, &mut mesh)
        .unwrap_err();
    match err {
        ReplayError::Action { index, source } => {
            assert_eq!(index, 0);
            assert_eq!(source, ActionError::FaceOutOfRange { id: 3, count: 2 });
        }
        other => panic!("unexpected error {other}"),
    }

    assert!(matches!(
        replayer.replay("{}", &mut mesh),
        Err(ReplayError::Parse(_))
    ));
}

fn delete_first_face(_: Value, _: &dyn MeshStorage) -> FactoryResult {
    Ok(Box::new(DeleteFace::new(0)))
}

/// Lifts one vertex by `dz`.
fn nudge(value: Value, mesh: &dyn MeshStorage) -> FactoryResult {
    #[derive(Deserialize)]
    struct Nudge {
        #[serde(rename = "vertexID")]
        vertex_id: usize,
        dz: f64,
    }
    let n: Nudge = serde_json::from_value(value)?;
    let [x, y, z] = mesh.position(n.vertex_id).ok_or(ActionError::VertexOutOfRange {
        id: n.vertex_id,
        count: mesh.nb_vertices(),
    })?;
    Ok(Box::new(MoveVertex::new(n.vertex_id, [x, y, z + n.dz])))
}

#[test]
fn test_registry_accepts_new_action_names() {
    let mut registry = ActionRegistry::with_defaults();
    registry.register("Nudge", nudge);
    let replayer = Replayer::new(registry);
    let mut mesh = quad();
    let n = replayer
        .replay(r#"[{"name":"Nudge","vertexID":2,"dz":0.5},{"name":"DeleteFace","faceID":0}]"#, &mut mesh)
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(mesh.position(2), Some([1.0, 1.0, 0.5]));
    assert_eq!(mesh.indices(), &[0, 2, 3]);

    let err = replayer
        .replay(r#"[{"name":"Nudge","vertexID":2}]"#, &mut mesh)
        .unwrap_err();
    assert!(matches!(err, ReplayError::Decode { index: 0, .. }));
    let err = replayer
        .replay(r#"[{"name":"Nudge","vertexID":9,"dz":1.0}]"#, &mut mesh)
        .unwrap_err();
    assert!(matches!(
        err,
        ReplayError::Action {
            index: 0,
            source: ActionError::VertexOutOfRange { id: 9, .. }
        }
    ));
}

#[test]
fn test_registry_overrides_factory() {
    let mut registry = ActionRegistry::with_defaults();
    registry.register("DeleteFace", delete_first_face);
    let mut mesh = quad();
    Replayer::new(registry)
        .replay(r#"[{"name":"DeleteFace","faceID":1}]"#, &mut mesh)
        .unwrap();
    assert_eq!(mesh.indices(), &[0, 2, 3]);
}

#[test]
fn test_replay_onto_stack_is_undoable() {
    let mut stack = CommandStack::new(quad());
    let log = r#"[{"name":"FlipEdge","v1":0,"v2":2},{"name":"MoveObject","translation":[0.0,0.0,1.0]}]"#;
    let replayer = Replayer::with_config(ActionRegistry::with_defaults(), &EditConfig::default());
    assert_eq!(replayer.replay_onto(log, &mut stack).unwrap(), 2);
    assert_eq!(stack.done_len(), 2);
    assert_eq!(stack.mesh().position(0), Some([0.0, 0.0, 1.0]));

    stack.undo().unwrap();
    stack.undo().unwrap();
    assert_eq!(stack.mesh().indices(), quad().indices());
    assert_eq!(stack.mesh().positions(), quad().positions());
}

#[test]
fn test_recorded_flip_replays_identically() {
    let mesh = quad();
    let mut stack = CommandStack::new(mesh.clone());
    stack.execute(Box::new(FlipEdge::new(&mesh, 0, 2).unwrap())).unwrap();
    let log = stack.recorder().unwrap().to_json().unwrap();

    let mut fresh = quad();
    Replayer::default().verbose(true).replay(&log, &mut fresh).unwrap();
    assert_eq!(fresh.indices(), stack.mesh().indices());
    assert_eq!(fresh.positions(), stack.mesh().positions());
}

/// Random moves, snaps, translations and face deletions.
fn random_session(seed: u64, steps: usize) -> CommandStack<MeshBuffers> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cfg = EditConfig {
        stack_capacity: 1000,
        ..EditConfig::default()
    };
    let mut stack = CommandStack::with_config(grid(4), &cfg);
    for _ in 0..steps {
        let nv = stack.mesh().nb_vertices();
        let nf = stack.mesh().nb_faces();
        let action: Box<dyn Action> = match rng.random_range(0..5) {
            0 => Box::new(MoveVertex::new(
                rng.random_range(0..nv),
                [rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>()],
            )),
            1 => Box::new(SnapVertex::new(rng.random_range(0..nv), rng.random_range(0..nv))),
            2 => Box::new(MoveObject::new([rng.random::<f64>() - 0.5, 0.25, -0.125])),
            3 if nf > 1 => Box::new(DeleteFace::new(rng.random_range(0..nf))),
            _ => {
                if stack.can_undo() && rng.random_bool(0.5) {
                    stack.undo().unwrap();
                } else if stack.can_redo() {
                    stack.redo().unwrap();
                }
                continue;
            }
        };
        stack.execute(action).unwrap();
    }
    stack
}

#[test]
fn test_replay_is_deterministic() {
    init_logger();
    for seed in [1, 7, 42] {
        let stack = random_session(seed, 60);
        let log = stack.recorder().unwrap().to_json().unwrap();

        let mut first = grid(4);
        let mut second = grid(4);
        let replayer = Replayer::default();
        let n = replayer.replay(&log, &mut first).unwrap();
        assert_eq!(n, stack.recorder().unwrap().len());
        replayer.replay(&log, &mut second).unwrap();

        assert_eq!(first.positions(), second.positions());
        assert_eq!(first.indices(), second.indices());
        assert_eq!(first.positions(), stack.mesh().positions());
        assert_eq!(first.indices(), stack.mesh().indices());
    }
}
