//! Token amount scalars.
//!
//! Amounts are signed 64-bit integers denominated in minor units with four
//! decimal places, matching the on-chain asset precision. Signed so that
//! bucket debits and audit math never wrap.

/// Token amount in minor units (4-decimal precision).
pub type Tokens = i64;

/// Minor units per whole token (10^4).
pub const MINOR_UNITS_PER_TOKEN: Tokens = 10_000;

/// Convert whole tokens into minor units.
pub const fn tokens(whole: i64) -> Tokens {
    whole * MINOR_UNITS_PER_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_token_conversion() {
        assert_eq!(tokens(1), 10_000);
        assert_eq!(tokens(250), 2_500_000);
    }
}
