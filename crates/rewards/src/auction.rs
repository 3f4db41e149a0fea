//! Reserved-name auction settlement.
//!
//! The bid table itself is maintained by the naming layer; this module only
//! settles the highest open bid once the network-activation and quiet-period
//! guards hold. A closed bid keeps its amount immutably for audit, with an
//! explicit [`BidStatus`] instead of the historical sign-flip marker.

use crate::params::RewardParams;
use crate::state::GlobalState;
use kestrel_types::{AccountId, TimePoint, Tokens};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Settlement state of a name bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Open,
    Closed,
}

/// Highest-bid entry for one reserved name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameBid {
    /// The name under auction.
    pub name: AccountId,
    /// Current highest bidder.
    pub high_bidder: AccountId,
    /// Current highest bid in minor units. Immutable once closed.
    pub high_bid: Tokens,
    /// Instant of the last bid activity on this name.
    pub last_bid_time: TimePoint,
    pub status: BidStatus,
}

impl NameBid {
    pub fn is_open(&self) -> bool {
        self.status == BidStatus::Open
    }
}

/// Bid table keyed by name, with amount-ordered lookup of the highest
/// open bid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameBidTable {
    bids: BTreeMap<AccountId, NameBid>,
}

impl NameBidTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record bid activity on a name. A higher bid replaces the previous
    /// high bidder; any bid refreshes `last_bid_time`.
    pub fn place_bid(&mut self, name: AccountId, bidder: AccountId, amount: Tokens, now: TimePoint) {
        let entry = self.bids.entry(name.clone()).or_insert(NameBid {
            name,
            high_bidder: bidder.clone(),
            high_bid: 0,
            last_bid_time: now,
            status: BidStatus::Open,
        });
        if entry.status == BidStatus::Closed {
            return;
        }
        if amount > entry.high_bid {
            entry.high_bid = amount;
            entry.high_bidder = bidder;
        }
        entry.last_bid_time = now;
    }

    pub fn get(&self, name: &AccountId) -> Option<&NameBid> {
        self.bids.get(name)
    }

    /// Open bid with the numerically highest amount, if any has a positive
    /// bid at all.
    pub fn highest_open_bid_mut(&mut self) -> Option<&mut NameBid> {
        self.bids
            .values_mut()
            .filter(|b| b.is_open() && b.high_bid > 0)
            .max_by_key(|b| b.high_bid)
    }

    pub fn highest_open_bid(&self) -> Option<&NameBid> {
        self.bids
            .values()
            .filter(|b| b.is_open() && b.high_bid > 0)
            .max_by_key(|b| b.high_bid)
    }
}

/// Settle the highest open bid if every guard holds:
/// the bid has been quiet for longer than the quiet period, the
/// stake-activation threshold is set, and the activation delay has fully
/// elapsed. Returns `true` when a bid was closed; the caller records
/// `last_name_close` on its slot clock only in that case.
///
/// Closing is idempotent by construction: a closed bid no longer appears
/// as the highest open bid, so a second invocation is a no-op.
pub fn try_close_highest_bid(
    state: &GlobalState,
    bids: &mut NameBidTable,
    params: &RewardParams,
    now: TimePoint,
) -> bool {
    let activated = match state.thresh_activated_stake_time {
        Some(t) => t,
        None => return false,
    };
    if now - activated <= params.activation_delay_us {
        return false;
    }

    let Some(highest) = bids.highest_open_bid_mut() else {
        return false;
    };
    if now - highest.last_bid_time <= params.bid_quiet_period_us {
        return false;
    }

    highest.status = BidStatus::Closed;
    info!(
        target: "rewards",
        "name auction closed: {} awarded to {} for {} minor units",
        highest.name, highest.high_bidder, highest.high_bid
    );
    true
}
