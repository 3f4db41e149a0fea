//! Proportional per-block payout.
//!
//! A producer is paid its share of the per-block bucket proportional to its
//! unpaid blocks. Truncation is asymmetric on purpose: the bucket gives up
//! only the truncated payout, while the global unpaid-block counter drops by
//! the producer's full count, so rounding losses accumulate in the bucket
//! rather than inflating later shares.

use crate::ledger::TokenLedger;
use crate::params::WellKnownAccounts;
use crate::state::{GlobalState, ProducerRecord};
use anyhow::Result;
use kestrel_types::{TimePoint, Tokens};
use tracing::{debug, info};

/// Truncating proportional share: `floor(bucket * unpaid / total_unpaid)`,
/// zero when no blocks are outstanding anywhere.
pub fn producer_per_block_pay(bucket: Tokens, unpaid_blocks: u64, total_unpaid_blocks: u64) -> Tokens {
    if total_unpaid_blocks == 0 {
        return 0;
    }
    (bucket as i128 * unpaid_blocks as i128 / total_unpaid_blocks as i128) as Tokens
}

/// Settle a producer's pending blocks as of `now`.
///
/// Always debits the bucket by the computed payout, removes the producer's
/// entire unpaid count from the global total, zeroes its counter, and
/// stamps `last_claim_time` — even when the payout truncates to zero. The
/// bpay transfer is only issued for a positive amount.
///
/// Preconditions (ownership, active key, claim throttle) are the caller's
/// responsibility; this function assumes they already passed.
pub fn distribute_payout(
    state: &mut GlobalState,
    producer: &mut ProducerRecord,
    accounts: &WellKnownAccounts,
    ledger: &mut dyn TokenLedger,
    now: TimePoint,
) -> Result<Tokens> {
    let pay = producer_per_block_pay(
        state.perblock_bucket,
        producer.unpaid_blocks,
        state.total_unpaid_blocks,
    );

    state.perblock_bucket -= pay;
    state.total_unpaid_blocks -= producer.unpaid_blocks;
    producer.unpaid_blocks = 0;
    producer.last_claim_time = Some(now);

    if pay > 0 {
        ledger.transfer(&accounts.bpay, &producer.owner, pay, "producer block pay")?;
        info!(
            target: "rewards",
            "paid {} minor units of block pay to {}",
            pay, producer.owner
        );
    } else {
        debug!(target: "rewards", "zero block pay for {}, counters settled", producer.owner);
    }

    Ok(pay)
}
