//! Kestrel core types
//!
//! Shared scalar types for the reward and accounting subsystems: wall-clock
//! time points, block-slot timestamps, token amounts, and account identity.

pub mod account;
pub mod amount;
pub mod time;

pub use account::*;
pub use amount::*;
pub use time::*;
