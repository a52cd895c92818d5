// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::task::{Task, TaskId};
use serde_json::json;

struct CountingCampaign {
    max_iterations: u64,
}

impl Campaign for CountingCampaign {
    fn plan(&self, state: &Value) -> Option<Workflow> {
        let iteration = state["iteration"].as_u64().unwrap_or(0);
        if iteration >= self.max_iterations {
            return None;
        }
        Some(vec![Task::new(
            TaskId::new(format!("iter_{iteration}")),
            "echo step",
        )])
    }

    fn analyze(&self, state: &Value, _results: &AnalyzeResults) -> Value {
        let iteration = state["iteration"].as_u64().unwrap_or(0);
        json!({"iteration": iteration + 1})
    }
}

#[test]
fn plan_returns_none_once_iteration_budget_is_spent() {
    let campaign = CountingCampaign { max_iterations: 2 };
    assert!(campaign.plan(&json!({"iteration": 0})).is_some());
    assert!(campaign.plan(&json!({"iteration": 1})).is_some());
    assert!(campaign.plan(&json!({"iteration": 2})).is_none());
}

#[test]
fn analyze_advances_state() {
    let campaign = CountingCampaign { max_iterations: 5 };
    let next = campaign.analyze(&json!({"iteration": 3}), &AnalyzeResults::new());
    assert_eq!(next["iteration"], 4);
}
