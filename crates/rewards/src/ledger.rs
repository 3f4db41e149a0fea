//! Collaborator interfaces: the token ledger and the election layer.
//!
//! Modeled as injected capability objects so the engine can run against
//! the real chain ledger in production and against recording doubles in
//! tests. Ledger calls are assumed atomic with the enclosing operation on
//! the host; no partial-transfer state is ever observable.

use anyhow::Result;
use kestrel_types::{AccountId, BlockTimestamp, Tokens};
use std::collections::HashMap;

/// Token ledger operations the engine issues.
pub trait TokenLedger {
    /// Mint `amount` new minor units into `to`.
    fn issue(&mut self, to: &AccountId, amount: Tokens, memo: &str) -> Result<()>;

    /// Move `amount` minor units from `from` to `to`.
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Tokens, memo: &str)
        -> Result<()>;
}

/// Producer re-election entry point, invoked once per schedule interval.
pub trait ElectionHook {
    /// Recompute the active producer set as of `timestamp`. The engine
    /// advances its trigger timestamp whether or not the set changes.
    fn update_elected_producers(&mut self, timestamp: BlockTimestamp);
}

// -----------------------------------------------------------------------------
// In-memory ledger (host runtime or testing)
// -----------------------------------------------------------------------------

/// Balance-tracking ledger backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<AccountId, Tokens>,
    total_issued: Tokens,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &AccountId) -> Tokens {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_issued(&self) -> Tokens {
        self.total_issued
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn issue(&mut self, to: &AccountId, amount: Tokens, _memo: &str) -> Result<()> {
        let balance = self.balances.entry(to.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
        self.total_issued = self.total_issued.saturating_add(amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Tokens,
        _memo: &str,
    ) -> Result<()> {
        let from_balance = self.balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(anyhow::anyhow!(
                "insufficient balance on {from}: need {amount}, have {from_balance}"
            ));
        }
        self.balances.insert(from.clone(), from_balance - amount);
        let to_balance = self.balances.entry(to.clone()).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Recording doubles (deterministic testing)
// -----------------------------------------------------------------------------

/// A single captured ledger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Issue {
        to: AccountId,
        amount: Tokens,
        memo: String,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Tokens,
        memo: String,
    },
}

/// Ledger double that records every call while keeping balances, so tests
/// can assert both the effects and the exact outbound call sequence.
#[derive(Debug, Clone, Default)]
pub struct RecordingLedger {
    inner: InMemoryTokenLedger,
    calls: Vec<LedgerCall>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[LedgerCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn balance(&self, account: &AccountId) -> Tokens {
        self.inner.balance(account)
    }

    pub fn total_issued(&self) -> Tokens {
        self.inner.total_issued()
    }
}

impl TokenLedger for RecordingLedger {
    fn issue(&mut self, to: &AccountId, amount: Tokens, memo: &str) -> Result<()> {
        self.calls.push(LedgerCall::Issue {
            to: to.clone(),
            amount,
            memo: memo.to_owned(),
        });
        self.inner.issue(to, amount, memo)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Tokens,
        memo: &str,
    ) -> Result<()> {
        self.calls.push(LedgerCall::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
            memo: memo.to_owned(),
        });
        self.inner.transfer(from, to, amount, memo)
    }
}

/// Election hook that ignores every trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullElections;

impl ElectionHook for NullElections {
    fn update_elected_producers(&mut self, _timestamp: BlockTimestamp) {}
}

/// Election hook that records every trigger timestamp.
#[derive(Debug, Clone, Default)]
pub struct RecordingElections {
    triggers: Vec<BlockTimestamp>,
}

impl RecordingElections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> &[BlockTimestamp] {
        &self.triggers
    }
}

impl ElectionHook for RecordingElections {
    fn update_elected_producers(&mut self, timestamp: BlockTimestamp) {
        self.triggers.push(timestamp);
    }
}
