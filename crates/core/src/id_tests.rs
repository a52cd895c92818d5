// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use yare::parameterized;

#[test]
fn chronological_id_has_expected_shape() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    let gen = ChronologicalIdGen;
    let id = gen.next(&clock);
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3, "expected DATE_TIME_RANDOM, got {id}");
    assert_eq!(parts[0].len(), 8);
    assert_eq!(parts[1].len(), 6);
    assert_eq!(parts[2].len(), 8);
}

#[test]
fn chronological_ids_are_listing_sortable_within_a_second() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    let gen = ChronologicalIdGen;
    let a = gen.next(&clock);
    let b = gen.next(&clock);
    // Same second -> same prefix; random suffixes differ (overwhelmingly likely).
    assert_eq!(&a[..15], &b[..15]);
    assert_ne!(a, b);
}

#[parameterized(
    short = { "abc", 5, "abc" },
    exact = { "abcde", 5, "abcde" },
    truncated = { "abcdefgh", 3, "abc" },
)]
fn short_truncates(input: &str, n: usize, expected: &str) {
    assert_eq!(input.short(n), expected);
}

#[test]
fn sequential_id_gen_is_deterministic() {
    let clock = FakeClock::new();
    let gen = SequentialIdGen::new("run");
    assert_eq!(gen.next(&clock), "run_00000001");
    assert_eq!(gen.next(&clock), "run_00000002");
}
