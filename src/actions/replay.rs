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

use ahash::AHashMap;
use log::{debug, info};
use serde_json::Value;

use crate::{
    actions::{
        action::Action,
        collapse_vertex::CollapseVertex,
        delete_face::DeleteFace,
        delete_vertex::DeleteVertex,
        flip_edge::FlipEdge,
        glue_edges::GlueEdges,
        matrix_transform::MatrixTransformObject,
        move_object::MoveObject,
        move_vertex::MoveVertex,
        record::ActionRecord,
        snap_vertex::SnapVertex,
        stack::CommandStack,
        storage::MeshStorage,
        unzip::Unzip,
    },
    config::EditConfig,
    error::{ActionError, FactoryError, ReplayError},
};

/// Builds an action from one raw log record, against the current mesh. The
/// record still carries its `"name"`; the factory decodes the rest.
pub type ActionFactory = fn(Value, &dyn MeshStorage) -> FactoryResult;

pub type FactoryResult = Result<Box<dyn Action>, FactoryError>;

/// Action names a replay session accepts, with the factory for each.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    factories: AHashMap<String, ActionFactory>,
}

fn mismatch(expected: &'static str, found: &ActionRecord) -> FactoryError {
    ActionError::Mismatch {
        expected,
        found: found.name(),
    }
    .into()
}

fn decode(value: Value) -> Result<ActionRecord, FactoryError> {
    Ok(serde_json::from_value(value)?)
}

fn delete_face(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::DeleteFace { face_id } => Ok(Box::new(DeleteFace::new(face_id))),
        other => Err(mismatch("DeleteFace", &other)),
    }
}

fn delete_vertex(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::DeleteVertex { node_id } => Ok(Box::new(DeleteVertex::new(node_id))),
        other => Err(mismatch("DeleteVertex", &other)),
    }
}

fn move_vertex(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::MoveVertex { vertex_id, to } => Ok(Box::new(MoveVertex::new(vertex_id, to))),
        other => Err(mismatch("MoveVertex", &other)),
    }
}

fn snap_vertex(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::SnapVertex {
            vertex_id,
            target_id,
        } => Ok(Box::new(SnapVertex::new(vertex_id, target_id))),
        other => Err(mismatch("SnapVertex", &other)),
    }
}

fn matrix_transform(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::MatrixTransformObject { matrix, .. } => {
            Ok(Box::new(MatrixTransformObject::from_row_major(&matrix)))
        }
        other => Err(mismatch("MatrixTransformObject", &other)),
    }
}

fn move_object(value: Value, _: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::MoveObject { translation } => Ok(Box::new(MoveObject::new(translation))),
        other => Err(mismatch("MoveObject", &other)),
    }
}

fn flip_edge(value: Value, mesh: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::FlipEdge { v1, v2, .. } => Ok(Box::new(FlipEdge::new(mesh, v1, v2)?)),
        other => Err(mismatch("FlipEdge", &other)),
    }
}

fn collapse_vertex(value: Value, mesh: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::CollapseVertex { node_id } => Ok(Box::new(CollapseVertex::new(mesh, node_id)?)),
        other => Err(mismatch("CollapseVertex", &other)),
    }
}

fn glue_edges(value: Value, mesh: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::GlueEdges { edge1, edge2 } => Ok(Box::new(GlueEdges::new(mesh, edge1, edge2)?)),
        other => Err(mismatch("GlueEdges", &other)),
    }
}

fn unzip(value: Value, mesh: &dyn MeshStorage) -> FactoryResult {
    match decode(value)? {
        ActionRecord::Unzip { id1, id2 } => Ok(Box::new(Unzip::new(mesh, id1, id2)?)),
        other => Err(mismatch("Unzip", &other)),
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry knowing every built-in action.
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        r.register("DeleteFace", delete_face);
        r.register("DeleteVertex", delete_vertex);
        r.register("MoveVertex", move_vertex);
        r.register("SnapVertex", snap_vertex);
        r.register("MatrixTransformObject", matrix_transform);
        r.register("MoveObject", move_object);
        r.register("FlipEdge", flip_edge);
        r.register("CollapseVertex", collapse_vertex);
        r.register("GlueEdges", glue_edges);
        r.register("Unzip", unzip);
        r
    }

    /// Adds or replaces the factory for `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: ActionFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn unregister(&mut self, name: &str) -> Option<ActionFactory> {
        self.factories.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<ActionFactory> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Re-runs a JSON action log.
///
/// Records are handled in order; the first one that cannot be resolved,
/// decoded, built or applied aborts the replay. Records already applied stay
/// applied.
#[derive(Debug, Clone)]
pub struct Replayer {
    registry: ActionRegistry,
    verbose: bool,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(ActionRegistry::with_defaults())
    }
}

impl Replayer {
    pub fn new(registry: ActionRegistry) -> Self {
        Self {
            registry,
            verbose: false,
        }
    }

    pub fn with_config(registry: ActionRegistry, config: &EditConfig) -> Self {
        Self::new(registry).verbose(config.verbose_replay)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Applies every record of `log` directly to `mesh`. Returns the number
    /// of records applied.
    pub fn replay(&self, log: &str, mesh: &mut dyn MeshStorage) -> Result<usize, ReplayError> {
        let values = parse_log(log)?;
        let mut applied = 0;
        for (index, value) in values.into_iter().enumerate() {
            let mut action = self.build(index, value, &*mesh)?;
            action
                .apply(mesh)
                .map_err(|source| ReplayError::Action { index, source })?;
            mesh.mark_changed();
            applied += 1;
        }
        Ok(applied)
    }

    /// Executes every record of `log` on `stack`, so the replayed actions
    /// can be undone. Returns the number of records executed.
    pub fn replay_onto<M: MeshStorage>(
        &self,
        log: &str,
        stack: &mut CommandStack<M>,
    ) -> Result<usize, ReplayError> {
        let values = parse_log(log)?;
        let mut applied = 0;
        for (index, value) in values.into_iter().enumerate() {
            let action = self.build(index, value, stack.mesh())?;
            stack
                .execute(action)
                .map_err(|source| ReplayError::Action { index, source })?;
            applied += 1;
        }
        Ok(applied)
    }

    fn build(
        &self,
        index: usize,
        value: Value,
        mesh: &dyn MeshStorage,
    ) -> Result<Box<dyn Action>, ReplayError> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ReplayError::MissingName { index })?
            .to_string();
        let factory = self
            .registry
            .get(&name)
            .ok_or_else(|| ReplayError::UnknownAction {
                index,
                name: name.clone(),
            })?;
        if self.verbose {
            info!("replay #{}: {}", index, value);
        } else {
            debug!("replay #{}: {}", index, name);
        }
        factory(value, mesh).map_err(|e| match e {
            FactoryError::Decode(source) => ReplayError::Decode { index, source },
            FactoryError::Action(source) => ReplayError::Action { index, source },
        })
    }
}

fn parse_log(log: &str) -> Result<Vec<Value>, ReplayError> {
    Ok(serde_json::from_str(log)?)
}
