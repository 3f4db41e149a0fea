//! Kestrel Rewards — block-production accounting & inflation distribution
//!
//! Tracks unpaid blocks per elected producer, accrues a time-based inflation
//! bucket split across fixed-percentage beneficiary funds, pays producers
//! proportionally to their unpaid-block share, triggers periodic producer
//! re-election, and settles the reserved-name auction once network
//! conditions are met.
//!
//! Monetary unit: minor units at 4-decimal precision (1 token = 10_000
//! minor units). All arithmetic is deterministic; every validating node
//! reproduces the same state bit-for-bit.

pub mod accrual;
pub mod auction;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod params;
pub mod payout;
pub mod state;

pub use accrual::*;
pub use auction::*;
pub use clock::*;
pub use engine::*;
pub use errors::*;
pub use ledger::*;
pub use params::*;
pub use payout::*;
pub use state::*;
