//! Reward parameters and well-known ledger accounts.

use kestrel_types::{AccountId, Micros, Tokens, BLOCKS_PER_DAY, USECONDS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Protocol parameters for inflation accrual, payout throttling, and the
/// recurring schedule/auction gates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardParams {
    /// New minor units minted per day of elapsed time (5B tokens annual
    /// increase at 4-decimal precision, over a 365-day year).
    pub daily_rate: Tokens,
    /// Percentage of new tokens routed to the per-block producer bucket.
    pub producer_pct: Tokens,
    /// Percentage routed to the social media fund.
    pub social_pct: Tokens,
    /// Percentage routed to the operations fund.
    pub op_fund_pct: Tokens,
    /// Percentage routed to the user fund.
    pub user_fund_pct: Tokens,
    /// Producer schedule re-election gate, in half-second slots (~1 minute).
    pub schedule_update_interval_slots: u32,
    /// Name-auction close gate, in half-second slots (~1 day).
    pub name_close_interval_slots: u32,
    /// Minimum elapsed time between two claims by the same producer.
    pub claim_interval_us: Micros,
    /// Quiet period a winning bid must hold before the auction can close.
    pub bid_quiet_period_us: Micros,
    /// Delay after stake-threshold activation before auctions may close.
    pub activation_delay_us: Micros,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            daily_rate: 136_986_300_000,
            producer_pct: 20,
            social_pct: 65,
            op_fund_pct: 5,
            user_fund_pct: 10,
            schedule_update_interval_slots: 120,
            name_close_interval_slots: BLOCKS_PER_DAY,
            claim_interval_us: USECONDS_PER_DAY,
            bid_quiet_period_us: USECONDS_PER_DAY,
            activation_delay_us: 14 * USECONDS_PER_DAY,
        }
    }
}

/// Ledger accounts the engine mints to and transfers between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellKnownAccounts {
    /// The system account; authorized caller of the per-block hook and the
    /// account new tokens are issued to.
    pub system: AccountId,
    /// Social media content fund.
    pub social_fund: AccountId,
    /// Operations fund.
    pub op_fund: AccountId,
    /// User behaviour fund.
    pub user_fund: AccountId,
    /// Holding account for the per-block producer bucket.
    pub bpay: AccountId,
}

impl Default for WellKnownAccounts {
    fn default() -> Self {
        Self {
            system: AccountId::new("kestrel"),
            social_fund: AccountId::new("kestrel.soc"),
            op_fund: AccountId::new("kestrel.ops"),
            user_fund: AccountId::new("kestrel.usr"),
            bpay: AccountId::new("kestrel.bpay"),
        }
    }
}
