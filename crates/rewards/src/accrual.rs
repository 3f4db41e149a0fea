//! Time-bucket inflation accrual.
//!
//! New tokens are minted in proportion to wall-clock time elapsed since the
//! last fill, then split across the beneficiary funds by fixed integer
//! percentages. Each split truncates independently; the remainder is left
//! unminted rather than redistributed.

use crate::ledger::TokenLedger;
use crate::params::{RewardParams, WellKnownAccounts};
use crate::state::GlobalState;
use anyhow::Result;
use kestrel_types::{TimePoint, Tokens, USECONDS_PER_DAY};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Amounts minted and routed by one accrual cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualBreakdown {
    pub new_tokens: Tokens,
    pub to_producers: Tokens,
    pub to_social: Tokens,
    pub to_op_fund: Tokens,
    pub to_user_fund: Tokens,
}

/// Minor units minted for `elapsed_us` of wall-clock time at `daily_rate`.
///
/// Determinism contract: double-precision multiply-divide, truncated
/// toward zero. Every conforming implementation must reproduce this
/// bit-for-bit; do not reorder the operations.
pub fn new_tokens_for_elapsed(daily_rate: Tokens, elapsed_us: i64) -> Tokens {
    ((daily_rate as f64 * elapsed_us as f64) / USECONDS_PER_DAY as f64) as Tokens
}

/// Run one accrual cycle as of `now`.
///
/// No-op (all-zero breakdown, no state change, no ledger calls) when the
/// bucket was never started or no time has elapsed since the last fill.
/// Otherwise mints `new_tokens` to the system account, transfers the four
/// fund splits out, credits the producer share to `perblock_bucket`, and
/// advances `last_pervote_bucket_fill`.
pub fn accrue_inflation(
    state: &mut GlobalState,
    params: &RewardParams,
    accounts: &WellKnownAccounts,
    ledger: &mut dyn TokenLedger,
    now: TimePoint,
) -> Result<AccrualBreakdown> {
    let last_fill = match state.last_pervote_bucket_fill {
        Some(t) => t,
        None => return Ok(AccrualBreakdown::default()),
    };
    let elapsed_us = now - last_fill;
    if elapsed_us <= 0 {
        return Ok(AccrualBreakdown::default());
    }

    let new_tokens = new_tokens_for_elapsed(params.daily_rate, elapsed_us);

    let breakdown = AccrualBreakdown {
        new_tokens,
        to_producers: new_tokens * params.producer_pct / 100,
        to_social: new_tokens * params.social_pct / 100,
        to_op_fund: new_tokens * params.op_fund_pct / 100,
        to_user_fund: new_tokens * params.user_fund_pct / 100,
    };

    ledger.issue(&accounts.system, breakdown.new_tokens, "issue new tokens")?;
    ledger.transfer(
        &accounts.system,
        &accounts.social_fund,
        breakdown.to_social,
        "social media fund",
    )?;
    ledger.transfer(
        &accounts.system,
        &accounts.op_fund,
        breakdown.to_op_fund,
        "op fund",
    )?;
    ledger.transfer(
        &accounts.system,
        &accounts.user_fund,
        breakdown.to_user_fund,
        "user fund",
    )?;
    ledger.transfer(
        &accounts.system,
        &accounts.bpay,
        breakdown.to_producers,
        "fund per-block bucket",
    )?;

    state.perblock_bucket += breakdown.to_producers;
    state.last_pervote_bucket_fill = Some(now);

    debug!(
        target: "rewards",
        "accrued {} minor units over {}us ({} to per-block bucket)",
        breakdown.new_tokens, elapsed_us, breakdown.to_producers
    );

    Ok(breakdown)
}
