/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers: GCD and checked LCM.
//!
//! Free functions rather than methods so they can be used and tested
//! independently of the task-set wrapper in the parent module.

use super::HyperperiodError;
use crate::task::Time;

/// Iterative Euclidean GCD over non-negative inputs.  Returns the other
/// operand when one input is `0`.
///
/// The iterative form is preferred over the recursive one because it does not
/// risk a stack overflow for very large inputs.
pub fn gcd(mut a: Time, mut b: Time) -> Time {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Checked LCM: returns `Err(HyperperiodError::Overflow { a, b })` if the
/// result would overflow.
///
/// Uses the overflow-safe formulation `(a / gcd(a, b)) * b` — the division
/// happens first, making overflow far less likely — but the final
/// multiplication is still checked with `checked_mul`.
///
/// Returns `Ok(0)` when either input is `0`, matching standard LCM
/// convention.
pub fn lcm(a: Time, b: Time) -> Result<Time, HyperperiodError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }

    let g = gcd(a, b);
    // a / g is exact (g divides a by definition)
    let reduced = a / g;

    reduced
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// Reduce a slice of periods to their overall LCM.
///
/// Returns:
/// * `Ok(0)` for an empty slice.
/// * `Err` on the first overflow encountered.
pub fn lcm_of_slice(periods: &[Time]) -> Result<Time, HyperperiodError> {
    periods
        .iter()
        .try_fold(periods.first().copied().unwrap_or(0), |acc, &p| lcm(acc, p))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
