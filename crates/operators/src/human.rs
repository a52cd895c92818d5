// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The human-reviewer operator variant: a file-exchange protocol instead of
//! a compute backend. `check` waits on a reviewer dropping a `response.json`
//! next to the instructions this operator wrote.

use crate::error::OperatorError;
use crate::operator::{Operator, OperatorContext};
use crate::path_safety::resolve_within;
use async_trait::async_trait;
use ms_core::{Attempt, ExternalStatus, Task};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    procedure: &'a str,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ExchangeResponse {
    Success { data: serde_json::Value },
    Failed { reason: String },
}

/// A human-reviewer operator. `review_root`, if configured, mirrors the
/// exchange files to a reviewer-facing location outside the run root;
/// the canonical copy always lives in the attempt's evidence directory.
pub struct HumanOperator {
    review_root: Option<PathBuf>,
}

impl HumanOperator {
    pub fn new(review_root: Option<PathBuf>) -> Self {
        Self { review_root }
    }

    fn mirror_dir(&self, task: &Task, attempt: &Attempt) -> Option<PathBuf> {
        self.review_root
            .as_ref()
            .map(|root| root.join(task.task_id.as_str()).join(attempt.attempt_id.as_str()))
    }
}

async fn write_both(primary: &std::path::Path, mirror: Option<&std::path::Path>, name: &str, contents: &str) -> Result<(), OperatorError> {
    tokio::fs::write(primary.join(name), contents).await?;
    if let Some(mirror_dir) = mirror {
        tokio::fs::create_dir_all(mirror_dir).await?;
        tokio::fs::write(mirror_dir.join(name), contents).await?;
    }
    Ok(())
}

#[async_trait]
impl Operator for HumanOperator {
    async fn prepare(
        &self,
        ctx: &OperatorContext,
        task: &Task,
        attempt: &mut Attempt,
    ) -> Result<(), OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        tokio::fs::create_dir_all(&attempt_dir).await?;
        let mirror = self.mirror_dir(task, attempt);

        let instructions = format!(
            "# Review requested for task `{}`\n\nCommand under review:\n\n```\n{}\n```\n\nWrite your verdict to `response.json` in this directory, matching `schema.json`.\n",
            task.task_id, task.command
        );
        write_both(&attempt_dir, mirror.as_deref(), "instructions.md", &instructions).await?;

        let schema = serde_json::json!({
            "type": "object",
            "required": ["status"],
            "properties": {
                "status": {"enum": ["success", "failed"]},
                "data": {"type": "object"},
                "reason": {"type": "string"}
            }
        });
        write_both(
            &attempt_dir,
            mirror.as_deref(),
            "schema.json",
            &serde_json::to_string_pretty(&schema)?,
        )
        .await?;

        let request = ExchangeRequest {
            procedure: task.task_id.as_str(),
            parameters: serde_json::json!({ "command": task.command }),
        };
        write_both(
            &attempt_dir,
            mirror.as_deref(),
            "request.json",
            &serde_json::to_string_pretty(&request)?,
        )
        .await?;

        Ok(())
    }

    async fn submit(&self, _ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        // There is no backend to transmit to; the reviewer polls the
        // directory this operator already prepared. The attempt's own id
        // doubles as its external id so later lookups have something to key on.
        if attempt.external_id.is_none() {
            attempt.external_id = Some(attempt.attempt_id.as_str().to_string());
        }
        Ok(())
    }

    async fn check(&self, ctx: &OperatorContext, attempt: &Attempt) -> Result<ExternalStatus, OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        let response_path = attempt_dir.join("response.json");
        if !response_path.exists() {
            return Ok(ExternalStatus::Pending);
        }
        let contents = tokio::fs::read_to_string(&response_path).await?;
        match serde_json::from_str::<ExchangeResponse>(&contents) {
            Ok(ExchangeResponse::Success { .. }) => Ok(ExternalStatus::Succeeded),
            Ok(ExchangeResponse::Failed { .. }) => Ok(ExternalStatus::Failed),
            Err(e) => Err(OperatorError::ManifestValidation(format!(
                "malformed response.json: {e}"
            ))),
        }
    }

    async fn collect(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        let contents = tokio::fs::read_to_string(attempt_dir.join("response.json")).await?;
        let response: ExchangeResponse = serde_json::from_str(&contents)
            .map_err(|e| OperatorError::ManifestValidation(format!("malformed response.json: {e}")))?;
        match response {
            ExchangeResponse::Success { data } => {
                attempt.operator_data = data;
                Ok(())
            }
            ExchangeResponse::Failed { reason } => Err(OperatorError::AttemptFailed(reason)),
        }
    }
}

#[cfg(test)]
#[path = "human_tests.rs"]
mod tests;
