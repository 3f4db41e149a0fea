//! Global accounting state and the producer registry.

use kestrel_types::{AccountId, BlockTimestamp, TimePoint, Tokens};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Process-wide accounting singleton. Mutated by the per-block hook, the
/// inflation accrual, the payout distributor, and the auction closer.
///
/// Invariants: `total_unpaid_blocks` equals the sum of `unpaid_blocks`
/// across all registered producers; `perblock_bucket` is never negative
/// and always covers any single pending payout computed from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalState {
    /// Instant of the last inflation-bucket fill. `None` until the first
    /// produced block starts the presses.
    pub last_pervote_bucket_fill: Option<TimePoint>,
    /// Slot of the last producer schedule re-election.
    pub last_producer_schedule_update: BlockTimestamp,
    /// Slot of the last name-auction close.
    pub last_name_close: BlockTimestamp,
    /// Instant the stake-activation threshold was crossed; `None` until
    /// the network activates.
    pub thresh_activated_stake_time: Option<TimePoint>,
    /// Blocks produced since their producers were last paid.
    pub total_unpaid_blocks: u64,
    /// Minor units reserved for per-block producer pay.
    pub perblock_bucket: Tokens,
}

/// Per-producer accounting record. Created by producer registration
/// (external to this engine); counters mutated only through the per-block
/// hook and the claim operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerRecord {
    pub owner: AccountId,
    /// Blocks produced since the last successful claim.
    pub unpaid_blocks: u64,
    /// Instant of the last successful claim; `None` if never claimed.
    pub last_claim_time: Option<TimePoint>,
    /// Whether the producer currently holds an active signing key.
    pub active: bool,
}

impl ProducerRecord {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            unpaid_blocks: 0,
            last_claim_time: None,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Producer table keyed by owner account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProducerRegistry {
    producers: BTreeMap<AccountId, ProducerRecord>,
}

impl ProducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer, replacing any previous record for the owner.
    pub fn register(&mut self, record: ProducerRecord) {
        self.producers.insert(record.owner.clone(), record);
    }

    pub fn get(&self, owner: &AccountId) -> Option<&ProducerRecord> {
        self.producers.get(owner)
    }

    pub fn get_mut(&mut self, owner: &AccountId) -> Option<&mut ProducerRecord> {
        self.producers.get_mut(owner)
    }

    /// Mark a producer's key inactive; claims are rejected until the
    /// registration layer reactivates it.
    pub fn deactivate(&mut self, owner: &AccountId) {
        if let Some(p) = self.producers.get_mut(owner) {
            p.active = false;
        }
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Sum of unpaid blocks over every registered producer. Used by audits
    /// to cross-check `GlobalState::total_unpaid_blocks`.
    pub fn total_unpaid_blocks(&self) -> u64 {
        self.producers.values().map(|p| p.unpaid_blocks).sum()
    }
}
