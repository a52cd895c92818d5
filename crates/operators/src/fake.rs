// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake operator for testing the engine without real backends.

use crate::error::OperatorError;
use crate::operator::{Operator, OperatorContext};
use async_trait::async_trait;
use ms_core::{Attempt, ExternalStatus, Task};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Recorded call into a [`FakeOperator`], for assertions in engine tests.
#[derive(Debug, Clone)]
pub enum OperatorCall {
    Prepare { task_id: String, attempt_id: String },
    Submit { attempt_id: String },
    Check { attempt_id: String },
    Collect { attempt_id: String },
    Cancel { attempt_id: String },
}

struct FakeOperatorState {
    /// Per-task scripted `check` responses, consumed front-to-back. Once
    /// exhausted, `default_status` is returned forever.
    scripts: HashMap<String, VecDeque<ExternalStatus>>,
    calls: Vec<OperatorCall>,
}

/// A controllable [`Operator`] that never touches a real backend: `prepare`
/// and `collect` are no-ops beyond bookkeeping, `submit` always succeeds,
/// and `check` replays a per-task script of [`ExternalStatus`] values.
#[derive(Clone)]
pub struct FakeOperator {
    inner: Arc<Mutex<FakeOperatorState>>,
    default_status: ExternalStatus,
}

impl FakeOperator {
    pub fn new(default_status: ExternalStatus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeOperatorState {
                scripts: HashMap::new(),
                calls: Vec::new(),
            })),
            default_status,
        }
    }

    /// Script `check` to return each status in order for the given task,
    /// then fall back to `default_status` once exhausted.
    pub fn script(&self, task_id: &str, statuses: impl IntoIterator<Item = ExternalStatus>) {
        self.inner
            .lock()
            .scripts
            .insert(task_id.to_string(), statuses.into_iter().collect());
    }

    pub fn calls(&self) -> Vec<OperatorCall> {
        self.inner.lock().calls.clone()
    }
}

impl Default for FakeOperator {
    fn default() -> Self {
        Self::new(ExternalStatus::Succeeded)
    }
}

#[async_trait]
impl Operator for FakeOperator {
    async fn prepare(
        &self,
        _ctx: &OperatorContext,
        task: &Task,
        attempt: &mut Attempt,
    ) -> Result<(), OperatorError> {
        self.inner.lock().calls.push(OperatorCall::Prepare {
            task_id: task.task_id.as_str().to_string(),
            attempt_id: attempt.attempt_id.as_str().to_string(),
        });
        Ok(())
    }

    async fn submit(&self, _ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        self.inner.lock().calls.push(OperatorCall::Submit {
            attempt_id: attempt.attempt_id.as_str().to_string(),
        });
        if attempt.external_id.is_none() {
            attempt.external_id = Some(format!("fake-{}", attempt.attempt_id));
        }
        Ok(())
    }

    async fn check(&self, _ctx: &OperatorContext, attempt: &Attempt) -> Result<ExternalStatus, OperatorError> {
        let mut state = self.inner.lock();
        state.calls.push(OperatorCall::Check {
            attempt_id: attempt.attempt_id.as_str().to_string(),
        });
        let task_id = attempt.task_id.as_str();
        if let Some(queue) = state.scripts.get_mut(task_id) {
            if let Some(next) = queue.pop_front() {
                return Ok(next);
            }
        }
        Ok(self.default_status)
    }

    async fn collect(&self, _ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        self.inner.lock().calls.push(OperatorCall::Collect {
            attempt_id: attempt.attempt_id.as_str().to_string(),
        });
        Ok(())
    }

    async fn cancel(&self, _ctx: &OperatorContext, attempt: &Attempt) -> Result<(), OperatorError> {
        self.inner.lock().calls.push(OperatorCall::Cancel {
            attempt_id: attempt.attempt_id.as_str().to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
