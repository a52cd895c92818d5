// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ms-operators: the Operator Interface (C4) and Operator Registry (C3) —
//! the uniform `prepare -> submit -> check -> collect` lifecycle contract
//! applied to compute (HPC/local), human-reviewer, and lab-instrument
//! backends.

pub mod compute;
pub mod error;
pub mod experiment;
pub mod human;
pub mod operator;
pub mod path_safety;
pub mod registry;
pub mod transport;

pub use compute::ComputeOperator;
pub use error::OperatorError;
pub use experiment::ExperimentOperator;
pub use human::HumanOperator;
pub use operator::{Operator, OperatorContext};
pub use registry::OperatorRegistry;
pub use transport::{ClusterTransport, LocalProcessTransport, SshSlurmTransport, WorkDir};

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOperator, OperatorCall};
