// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chronological ID generation.
//!
//! Run, attempt, and run-event identifiers are generated as
//! `YYYYMMDD_HHMMSS_<8-random>`: sortable by plain string/listing order, and
//! unique under reasonable clock skew because of the random suffix.

use crate::clock::Clock;
use chrono::{TimeZone, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Generates chronologically-sortable unique identifiers.
pub trait IdGen: Send + Sync {
    fn next(&self, clock: &dyn Clock) -> String;
}

fn random_suffix(n: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(n)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Production ID generator: `YYYYMMDD_HHMMSS_<8-random>`.
#[derive(Clone, Default)]
pub struct ChronologicalIdGen;

impl IdGen for ChronologicalIdGen {
    fn next(&self, clock: &dyn Clock) -> String {
        let epoch_ms = clock.epoch_ms();
        let dt = Utc
            .timestamp_millis_opt(epoch_ms as i64)
            .single()
            .unwrap_or_else(Utc::now);
        format!("{}_{}", dt.format("%Y%m%d_%H%M%S"), random_suffix(8))
    }
}

/// Sequential ID generator for deterministic tests.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self, _clock: &dyn Clock) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}_{:08}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
