//! Reward engine: the two inbound chain operations.
//!
//! [`RewardEngine::on_block`] is the per-block accounting hook, invoked once
//! per produced block by the block-production mechanism. It also drives the
//! two recurring gates: producer re-election (~every minute of slots) and,
//! nested inside it, name-auction settlement (~daily).
//!
//! [`RewardEngine::claim`] is the producer-facing payout action: it runs the
//! inflation accrual and then distributes the caller's proportional share of
//! the per-block bucket.
//!
//! Execution is strictly single-threaded and sequential; each operation is
//! one atomic state transition. Collaborators (token ledger, election layer)
//! are passed in per call so hosts and tests inject their own.

use crate::accrual::accrue_inflation;
use crate::auction::{try_close_highest_bid, NameBidTable};
use crate::clock::interval_elapsed;
use crate::errors::RewardsError;
use crate::ledger::{ElectionHook, TokenLedger};
use crate::params::{RewardParams, WellKnownAccounts};
use crate::payout::distribute_payout;
use crate::state::{GlobalState, ProducerRecord, ProducerRegistry};
use kestrel_types::{AccountId, BlockTimestamp, TimePoint, Tokens};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Block-production accounting and inflation-distribution engine.
///
/// Owns the global accounting state plus the producer and bid tables; every
/// mutation flows through [`Self::on_block`] or [`Self::claim`], or through
/// the thin registration accessors the host's registration layer uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEngine {
    state: GlobalState,
    producers: ProducerRegistry,
    bids: NameBidTable,
    params: RewardParams,
    accounts: WellKnownAccounts,
}

impl Default for RewardEngine {
    fn default() -> Self {
        Self::new(RewardParams::default(), WellKnownAccounts::default())
    }
}

impl RewardEngine {
    pub fn new(params: RewardParams, accounts: WellKnownAccounts) -> Self {
        Self {
            state: GlobalState::default(),
            producers: ProducerRegistry::new(),
            bids: NameBidTable::new(),
            params,
            accounts,
        }
    }

    /// Per-block hook. Authorized for the system account only.
    ///
    /// Counts the block against the producer when (and only when) a record
    /// exists — at startup the scheduled producer may not be registered
    /// yet, which is a silent skip, not an error. Then evaluates the
    /// re-election gate and, when that fires, the nested auction gate.
    pub fn on_block(
        &mut self,
        caller: &AccountId,
        timestamp: BlockTimestamp,
        producer: &AccountId,
        now: TimePoint,
        elections: &mut dyn ElectionHook,
    ) -> Result<(), RewardsError> {
        if caller != &self.accounts.system {
            return Err(RewardsError::Unauthorized(self.accounts.system.clone()));
        }

        // First block ever observed starts the presses.
        if self.state.last_pervote_bucket_fill.is_none() {
            self.state.last_pervote_bucket_fill = Some(now);
        }

        if let Some(record) = self.producers.get_mut(producer) {
            // Both counters move together or not at all.
            self.state.total_unpaid_blocks += 1;
            record.unpaid_blocks += 1;
        } else {
            debug!(target: "rewards", "block by unregistered producer {producer}, not counted");
        }

        if interval_elapsed(
            timestamp,
            self.state.last_producer_schedule_update,
            self.params.schedule_update_interval_slots,
        ) {
            elections.update_elected_producers(timestamp);
            self.state.last_producer_schedule_update = timestamp;

            if interval_elapsed(
                timestamp,
                self.state.last_name_close,
                self.params.name_close_interval_slots,
            ) && try_close_highest_bid(&self.state, &mut self.bids, &self.params, now)
            {
                self.state.last_name_close = timestamp;
            }
        }

        Ok(())
    }

    /// Claim accumulated block pay for `owner`, as of `now`.
    ///
    /// Fails without any state change on a precondition violation; on
    /// success the inflation accrual runs first (claims are its only
    /// trigger), then the proportional payout settles the producer's
    /// counters whether or not the paid amount is positive.
    pub fn claim(
        &mut self,
        caller: &AccountId,
        owner: &AccountId,
        now: TimePoint,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Tokens, RewardsError> {
        if caller != owner {
            return Err(RewardsError::Unauthorized(owner.clone()));
        }

        let record = self
            .producers
            .get(owner)
            .ok_or_else(|| RewardsError::ProducerNotFound(owner.clone()))?;
        if !record.is_active() {
            return Err(RewardsError::ProducerInactive(owner.clone()));
        }
        if let Some(last_claim) = record.last_claim_time {
            if now - last_claim <= self.params.claim_interval_us {
                return Err(RewardsError::AlreadyClaimed);
            }
        }

        accrue_inflation(&mut self.state, &self.params, &self.accounts, ledger, now)?;

        let record = self
            .producers
            .get_mut(owner)
            .ok_or_else(|| RewardsError::ProducerNotFound(owner.clone()))?;
        let paid = distribute_payout(&mut self.state, record, &self.accounts, ledger, now)?;
        Ok(paid)
    }

    // -------------------------------------------------------------------------
    // Registration-layer accessors
    // -------------------------------------------------------------------------

    /// Register a producer, or reactivate an existing record. Counters on an
    /// existing record are preserved so the global unpaid total stays in
    /// sync. Registration mechanics beyond this live outside the engine.
    pub fn register_producer(&mut self, owner: AccountId) {
        if let Some(existing) = self.producers.get_mut(&owner) {
            existing.active = true;
        } else {
            self.producers.register(ProducerRecord::new(owner));
        }
    }

    /// Drop a producer's active key; claims fail until re-registered.
    pub fn deactivate_producer(&mut self, owner: &AccountId) {
        self.producers.deactivate(owner);
    }

    /// Record bid activity on a reserved name.
    pub fn place_bid(
        &mut self,
        name: AccountId,
        bidder: AccountId,
        amount: Tokens,
        now: TimePoint,
    ) {
        self.bids.place_bid(name, bidder, amount, now);
    }

    /// Mark the stake-activation threshold as crossed at `now`. Set once by
    /// the staking layer; later calls keep the original instant.
    pub fn activate_stake_threshold(&mut self, now: TimePoint) {
        if self.state.thresh_activated_stake_time.is_none() {
            self.state.thresh_activated_stake_time = Some(now);
        }
    }

    pub fn state(&self) -> &GlobalState {
        &self.state
    }

    pub fn producers(&self) -> &ProducerRegistry {
        &self.producers
    }

    pub fn bids(&self) -> &NameBidTable {
        &self.bids
    }

    pub fn params(&self) -> &RewardParams {
        &self.params
    }

    pub fn accounts(&self) -> &WellKnownAccounts {
        &self.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NullElections, RecordingElections, RecordingLedger};

    fn engine() -> RewardEngine {
        RewardEngine::default()
    }

    fn sys() -> AccountId {
        WellKnownAccounts::default().system
    }

    fn slot(s: u32) -> BlockTimestamp {
        BlockTimestamp::from_slot(s)
    }

    fn us(t: i64) -> TimePoint {
        TimePoint::from_micros(t)
    }

    #[test]
    fn on_block_rejects_non_system_caller() {
        let mut engine = engine();
        let err = engine
            .on_block(
                &AccountId::new("mallory"),
                slot(1),
                &AccountId::new("alpha"),
                us(1),
                &mut NullElections,
            )
            .unwrap_err();
        assert!(matches!(err, RewardsError::Unauthorized(_)));
        assert!(engine.state().last_pervote_bucket_fill.is_none());
    }

    #[test]
    fn first_block_starts_the_presses() {
        let mut engine = engine();
        engine
            .on_block(&sys(), slot(1), &AccountId::new("alpha"), us(77), &mut NullElections)
            .unwrap();
        assert_eq!(engine.state().last_pervote_bucket_fill, Some(us(77)));

        // Later blocks do not move the fill time; only accrual does.
        engine
            .on_block(&sys(), slot(2), &AccountId::new("alpha"), us(99), &mut NullElections)
            .unwrap();
        assert_eq!(engine.state().last_pervote_bucket_fill, Some(us(77)));
    }

    #[test]
    fn unregistered_producer_blocks_are_skipped() {
        let mut engine = engine();
        for s in 1..=5 {
            engine
                .on_block(&sys(), slot(s), &AccountId::new("ghost"), us(s as i64), &mut NullElections)
                .unwrap();
        }
        assert_eq!(engine.state().total_unpaid_blocks, 0);
    }

    #[test]
    fn registered_producer_blocks_move_both_counters() {
        let mut engine = engine();
        let alpha = AccountId::new("alpha");
        let beta = AccountId::new("beta");
        engine.register_producer(alpha.clone());
        engine.register_producer(beta.clone());

        for s in 1..=3 {
            engine
                .on_block(&sys(), slot(s), &alpha, us(s as i64), &mut NullElections)
                .unwrap();
        }
        engine
            .on_block(&sys(), slot(4), &beta, us(4), &mut NullElections)
            .unwrap();

        assert_eq!(engine.state().total_unpaid_blocks, 4);
        assert_eq!(engine.producers().get(&alpha).unwrap().unpaid_blocks, 3);
        assert_eq!(engine.producers().get(&beta).unwrap().unpaid_blocks, 1);
        assert_eq!(
            engine.state().total_unpaid_blocks,
            engine.producers().total_unpaid_blocks()
        );
    }

    #[test]
    fn election_triggers_strictly_after_interval() {
        let mut engine = engine();
        let mut elections = RecordingElections::new();
        let prod = AccountId::new("alpha");

        engine.on_block(&sys(), slot(120), &prod, us(1), &mut elections).unwrap();
        assert!(elections.triggers().is_empty());

        engine.on_block(&sys(), slot(121), &prod, us(2), &mut elections).unwrap();
        assert_eq!(elections.triggers(), [slot(121)]);
        assert_eq!(engine.state().last_producer_schedule_update, slot(121));

        // Gate re-arms relative to the new baseline.
        engine.on_block(&sys(), slot(241), &prod, us(3), &mut elections).unwrap();
        assert_eq!(elections.triggers().len(), 1);
        engine.on_block(&sys(), slot(242), &prod, us(4), &mut elections).unwrap();
        assert_eq!(elections.triggers(), [slot(121), slot(242)]);
    }

    #[test]
    fn auction_settles_through_the_block_hook() {
        let mut engine = engine();
        let mut elections = RecordingElections::new();
        let t0 = us(0);

        engine.activate_stake_threshold(t0);
        engine.place_bid(AccountId::new("prime"), AccountId::new("alice"), 5_000, t0);

        // Well past every time guard.
        let now = t0.plus_days(30);
        let ts = slot(400_000);
        engine
            .on_block(&sys(), ts, &AccountId::new("alpha"), now, &mut elections)
            .unwrap();

        let bid = engine.bids().get(&AccountId::new("prime")).unwrap();
        assert!(!bid.is_open());
        assert_eq!(bid.high_bid, 5_000);
        assert_eq!(engine.state().last_name_close, ts);
    }

    #[test]
    fn name_close_slot_not_advanced_when_nothing_closes() {
        let mut engine = engine();
        let mut elections = RecordingElections::new();

        // No activation threshold: the gate fires but nothing settles.
        engine.place_bid(AccountId::new("prime"), AccountId::new("alice"), 5_000, us(0));
        engine
            .on_block(
                &sys(),
                slot(400_000),
                &AccountId::new("alpha"),
                us(0).plus_days(30),
                &mut elections,
            )
            .unwrap();

        assert_eq!(engine.state().last_name_close, slot(0));
        assert!(engine.bids().get(&AccountId::new("prime")).unwrap().is_open());
    }

    #[test]
    fn claim_requires_owner_authorization() {
        let mut engine = engine();
        let mut ledger = RecordingLedger::new();
        let alpha = AccountId::new("alpha");
        engine.register_producer(alpha.clone());

        let err = engine
            .claim(&AccountId::new("mallory"), &alpha, us(1), &mut ledger)
            .unwrap_err();
        assert!(matches!(err, RewardsError::Unauthorized(_)));
        assert!(ledger.calls().is_empty());
    }

    #[test]
    fn claim_unknown_producer_errors() {
        let mut engine = engine();
        let mut ledger = RecordingLedger::new();
        let ghost = AccountId::new("ghost");

        let err = engine.claim(&ghost, &ghost, us(1), &mut ledger).unwrap_err();
        assert!(matches!(err, RewardsError::ProducerNotFound(_)));
    }

    #[test]
    fn claim_inactive_producer_errors() {
        let mut engine = engine();
        let mut ledger = RecordingLedger::new();
        let alpha = AccountId::new("alpha");
        engine.register_producer(alpha.clone());
        engine.deactivate_producer(&alpha);

        let err = engine.claim(&alpha, &alpha, us(1), &mut ledger).unwrap_err();
        assert!(matches!(err, RewardsError::ProducerInactive(_)));
    }

    #[test]
    fn reregistration_reactivates_without_resetting_counters() {
        let mut engine = engine();
        let alpha = AccountId::new("alpha");
        engine.register_producer(alpha.clone());
        engine
            .on_block(&sys(), slot(1), &alpha, us(1), &mut NullElections)
            .unwrap();
        engine.deactivate_producer(&alpha);

        engine.register_producer(alpha.clone());
        let record = engine.producers().get(&alpha).unwrap();
        assert!(record.is_active());
        assert_eq!(record.unpaid_blocks, 1);
        assert_eq!(engine.state().total_unpaid_blocks, 1);
    }

    #[test]
    fn claim_throttled_to_one_per_day() {
        let mut engine = engine();
        let mut ledger = RecordingLedger::new();
        let alpha = AccountId::new("alpha");
        engine.register_producer(alpha.clone());

        let t0 = us(1_000);
        engine.claim(&alpha, &alpha, t0, &mut ledger).unwrap();

        // Exactly one day later: still throttled (strict inequality).
        let err = engine
            .claim(&alpha, &alpha, t0.plus_days(1), &mut ledger)
            .unwrap_err();
        assert!(matches!(err, RewardsError::AlreadyClaimed));

        // One microsecond past a day: allowed.
        engine
            .claim(&alpha, &alpha, t0.plus_days(1).plus_micros(1), &mut ledger)
            .unwrap();
    }

    #[test]
    fn failed_claim_leaves_counters_untouched() {
        let mut engine = engine();
        let mut ledger = RecordingLedger::new();
        let alpha = AccountId::new("alpha");
        engine.register_producer(alpha.clone());
        engine
            .on_block(&sys(), slot(1), &alpha, us(1), &mut NullElections)
            .unwrap();
        engine.claim(&alpha, &alpha, us(10), &mut ledger).unwrap();
        engine
            .on_block(&sys(), slot(2), &alpha, us(20), &mut NullElections)
            .unwrap();

        let before_total = engine.state().total_unpaid_blocks;
        let err = engine.claim(&alpha, &alpha, us(30), &mut ledger).unwrap_err();
        assert!(matches!(err, RewardsError::AlreadyClaimed));
        assert_eq!(engine.state().total_unpaid_blocks, before_total);
        assert_eq!(engine.producers().get(&alpha).unwrap().unpaid_blocks, 1);
    }
}
