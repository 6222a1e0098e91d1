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

use std::collections::VecDeque;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    actions::{action::Action, record::ActionRecord, recorder::Recorder, storage::MeshStorage},
    config::EditConfig,
    error::ActionResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackOp {
    Execute,
    Undo,
    Redo,
}

/// Sent to observers after every successful transition.
///
/// Serializes as the action record with an extra `"op"` field:
/// `{"op": "undo", "name": "DeleteFace", "faceID": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEvent {
    pub op: StackOp,
    #[serde(flatten)]
    pub record: ActionRecord,
}

type Observer = Box<dyn FnMut(&StackEvent)>;
type ChangeHook<M> = Box<dyn FnMut(&M)>;

/// Bounded undo/redo history over a mesh it owns.
pub struct CommandStack<M: MeshStorage> {
    mesh: M,
    done: VecDeque<Box<dyn Action>>,
    undone: VecDeque<Box<dyn Action>>,
    capacity: usize,
    recorder: Option<Recorder>,
    observers: Vec<Observer>,
    on_change: Option<ChangeHook<M>>,
}

impl<M: MeshStorage + std::fmt::Debug> std::fmt::Debug for CommandStack<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStack")
            .field("mesh", &self.mesh)
            .field("done", &self.done)
            .field("undone", &self.undone)
            .field("capacity", &self.capacity)
            .field("recorder", &self.recorder)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<M: MeshStorage> CommandStack<M> {
    pub fn new(mesh: M) -> Self {
        Self::with_config(mesh, &EditConfig::default())
    }

    pub fn with_config(mesh: M, config: &EditConfig) -> Self {
        Self {
            mesh,
            done: VecDeque::new(),
            undone: VecDeque::new(),
            capacity: config.stack_capacity,
            recorder: config.record.then(Recorder::new),
            observers: Vec::new(),
            on_change: None,
        }
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn into_mesh(self) -> M {
        self.mesh
    }

    /// Log of the actions currently in effect, if recording is on.
    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, dropping the oldest entries of both stacks
    /// that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        Self::truncate(&mut self.done, capacity);
        Self::truncate(&mut self.undone, capacity);
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    pub fn undone_len(&self) -> usize {
        self.undone.len()
    }

    pub fn add_observer<F: FnMut(&StackEvent) + 'static>(&mut self, observer: F) {
        self.observers.push(Box::new(observer));
    }

    /// Called with the mesh after observers, on every transition.
    pub fn on_change<F: FnMut(&M) + 'static>(&mut self, hook: F) {
        self.on_change = Some(Box::new(hook));
    }

    /// Applies `action` and pushes it. A failed apply leaves both stacks and
    /// the recorder untouched.
    pub fn execute(&mut self, mut action: Box<dyn Action>) -> ActionResult<()> {
        action.apply(&mut self.mesh)?;
        self.mesh.mark_changed();
        let record = action.serialize_params();
        trace!("stack: execute {}", action.name());

        if let Some(r) = self.recorder.as_mut() {
            r.record(record.clone());
        }
        self.undone.clear();
        self.done.push_back(action);
        Self::truncate(&mut self.done, self.capacity);
        self.notify(StackOp::Execute, record);
        Ok(())
    }

    /// Reverts the most recent action. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> ActionResult<bool> {
        let Some(mut action) = self.done.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = action.revert(&mut self.mesh) {
            self.done.push_back(action);
            return Err(e);
        }
        self.mesh.mark_changed();
        let record = action.serialize_params();
        trace!("stack: undo {}", action.name());

        if let Some(r) = self.recorder.as_mut() {
            r.undo();
        }
        self.undone.push_back(action);
        Self::truncate(&mut self.undone, self.capacity);
        self.notify(StackOp::Undo, record);
        Ok(true)
    }

    /// Re-applies the most recently undone action. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> ActionResult<bool> {
        let Some(mut action) = self.undone.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = action.apply(&mut self.mesh) {
            self.undone.push_back(action);
            return Err(e);
        }
        self.mesh.mark_changed();
        let record = action.serialize_params();
        trace!("stack: redo {}", action.name());

        if let Some(r) = self.recorder.as_mut() {
            r.record(record.clone());
        }
        self.done.push_back(action);
        Self::truncate(&mut self.done, self.capacity);
        self.notify(StackOp::Redo, record);
        Ok(true)
    }

    fn truncate(stack: &mut VecDeque<Box<dyn Action>>, capacity: usize) {
        while stack.len() > capacity {
            if let Some(evicted) = stack.pop_front() {
                trace!("stack: evicted {}", evicted.name());
            }
        }
    }

    fn notify(&mut self, op: StackOp, record: ActionRecord) {
        let event = StackEvent { op, record };
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
        if let Some(hook) = self.on_change.as_mut() {
            hook(&self.mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{MeshBuffers, MoveVertex};

    fn stack() -> CommandStack<MeshBuffers> {
        CommandStack::new(MeshBuffers::new(vec![0.0; 3], vec![]))
    }

    #[test]
    fn empty_stack_cannot_undo_or_redo() {
        let mut s = stack();
        assert!(!s.can_undo());
        assert!(!s.can_redo());
        assert!(!s.undo().unwrap());
        assert!(!s.redo().unwrap());
        assert_eq!(s.mesh().revision(), 0);
    }

    #[test]
    fn new_execute_clears_redo_stack() {
        let mut s = stack();
        s.execute(Box::new(MoveVertex::new(0, [1.0, 0.0, 0.0]))).unwrap();
        s.undo().unwrap();
        assert!(s.can_redo());
        s.execute(Box::new(MoveVertex::new(0, [2.0, 0.0, 0.0]))).unwrap();
        assert!(!s.can_redo());
        assert_eq!(s.recorder().unwrap().len(), 1);
    }

    #[test]
    fn failed_execute_changes_nothing() {
        let mut s = stack();
        assert!(s.execute(Box::new(MoveVertex::new(5, [1.0; 3]))).is_err());
        assert_eq!(s.done_len(), 0);
        assert!(s.recorder().unwrap().is_empty());
        assert_eq!(s.mesh().revision(), 0);
    }
}
