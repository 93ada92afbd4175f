//! Points ledger.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{keys, Store};

/// Whether the balance may drop below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerPolicy {
    /// `max(0, balance + delta)`.
    #[default]
    Clamped,
    /// Penalties may push the balance negative.
    Unclamped,
}

/// Read-through view of the balance stored under `fp_points`.
pub struct PointsLedger<'s, S: Store + ?Sized> {
    store: &'s S,
    policy: LedgerPolicy,
}

impl<'s, S: Store + ?Sized> PointsLedger<'s, S> {
    pub fn new(store: &'s S, policy: LedgerPolicy) -> Self {
        Self { store, policy }
    }

    pub fn balance(&self) -> Result<i64> {
        Ok(self.store.get_i64(keys::POINTS, 0)?)
    }

    /// Apply `delta` and return the new balance.
    pub fn add(&self, delta: i64) -> Result<i64> {
        let raw = self.balance()?.saturating_add(delta);
        let next = match self.policy {
            LedgerPolicy::Clamped => raw.max(0),
            LedgerPolicy::Unclamped => raw,
        };
        self.store.set_i64(keys::POINTS, next)?;
        Ok(next)
    }
}
