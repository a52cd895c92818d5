// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lab-instrument operator variant: protocol-identical to the human
//! reviewer exchange but named `experiment_request.json` /
//! `experiment_result.json` and kept as a distinct kind for UX purposes.

use crate::error::OperatorError;
use crate::operator::{Operator, OperatorContext};
use crate::path_safety::resolve_within;
use async_trait::async_trait;
use ms_core::{Attempt, ExternalStatus, Task};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ExperimentRequest<'a> {
    procedure: &'a str,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ExperimentResult {
    Success { data: serde_json::Value },
    Failed { reason: String },
}

/// An experiment operator talking to a lab instrument through the shared
/// drop-box directory convention: `exchange_dir`, if configured, mirrors the
/// request file to wherever the instrument's polling agent actually watches.
pub struct ExperimentOperator {
    exchange_dir: Option<PathBuf>,
}

impl ExperimentOperator {
    pub fn new(exchange_dir: Option<PathBuf>) -> Self {
        Self { exchange_dir }
    }

    fn mirror_dir(&self, task: &Task, attempt: &Attempt) -> Option<PathBuf> {
        self.exchange_dir
            .as_ref()
            .map(|root| root.join(task.task_id.as_str()).join(attempt.attempt_id.as_str()))
    }
}

#[async_trait]
impl Operator for ExperimentOperator {
    async fn prepare(
        &self,
        ctx: &OperatorContext,
        task: &Task,
        attempt: &mut Attempt,
    ) -> Result<(), OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        tokio::fs::create_dir_all(&attempt_dir).await?;

        let request = ExperimentRequest {
            procedure: task.task_id.as_str(),
            parameters: serde_json::json!({ "command": task.command }),
        };
        let request_json = serde_json::to_string_pretty(&request)?;
        tokio::fs::write(attempt_dir.join("experiment_request.json"), &request_json).await?;

        if let Some(mirror_dir) = self.mirror_dir(task, attempt) {
            tokio::fs::create_dir_all(&mirror_dir).await?;
            tokio::fs::write(mirror_dir.join("experiment_request.json"), &request_json).await?;
        }

        Ok(())
    }

    async fn submit(&self, _ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        if attempt.external_id.is_none() {
            attempt.external_id = Some(attempt.attempt_id.as_str().to_string());
        }
        Ok(())
    }

    async fn check(&self, ctx: &OperatorContext, attempt: &Attempt) -> Result<ExternalStatus, OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        let result_path = attempt_dir.join("experiment_result.json");
        if !result_path.exists() {
            return Ok(ExternalStatus::Pending);
        }
        let contents = tokio::fs::read_to_string(&result_path).await?;
        match serde_json::from_str::<ExperimentResult>(&contents) {
            Ok(ExperimentResult::Success { .. }) => Ok(ExternalStatus::Succeeded),
            Ok(ExperimentResult::Failed { .. }) => Ok(ExternalStatus::Failed),
            Err(e) => Err(OperatorError::ManifestValidation(format!(
                "malformed experiment_result.json: {e}"
            ))),
        }
    }

    async fn collect(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        let contents = tokio::fs::read_to_string(attempt_dir.join("experiment_result.json")).await?;
        let result: ExperimentResult = serde_json::from_str(&contents).map_err(|e| {
            OperatorError::ManifestValidation(format!("malformed experiment_result.json: {e}"))
        })?;
        match result {
            ExperimentResult::Success { data } => {
                attempt.operator_data = data;
                Ok(())
            }
            ExperimentResult::Failed { reason } => Err(OperatorError::AttemptFailed(reason)),
        }
    }
}

#[cfg(test)]
#[path = "experiment_tests.rs"]
mod tests;
