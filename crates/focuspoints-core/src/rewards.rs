//! Reward unlocking.
//!
//! A brand's code is minted the first time a reveal succeeds and never
//! changes afterwards. Codes are display strings, not secrets: the
//! four-digit suffix can collide across brands or resets.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ledger::{LedgerPolicy, PointsLedger};
use crate::storage::{keys, Store};

/// Shown in place of a code that has not been revealed.
pub const NOT_REVEALED: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Starbucks,
    Dunkin,
    Amazon,
}

impl Brand {
    pub const ALL: [Brand; 3] = [Brand::Starbucks, Brand::Dunkin, Brand::Amazon];

    pub fn as_str(self) -> &'static str {
        match self {
            Brand::Starbucks => "starbucks",
            Brand::Dunkin => "dunkin",
            Brand::Amazon => "amazon",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Brand::Starbucks => "Starbucks",
            Brand::Dunkin => "Dunkin",
            Brand::Amazon => "Amazon",
        }
    }

    fn store_key(self) -> String {
        keys::reward_code(self.as_str())
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Brand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starbucks" => Ok(Brand::Starbucks),
            "dunkin" => Ok(Brand::Dunkin),
            "amazon" => Ok(Brand::Amazon),
            other => Err(CoreError::invalid(
                "brand",
                format!("unknown brand '{other}' (expected starbucks, dunkin or amazon)"),
            )),
        }
    }
}

/// `FP-<BRAND>-<1000..=9999>`.
pub fn make_code<R: Rng>(brand: Brand, rng: &mut R) -> String {
    let n: u32 = rng.gen_range(1000..=9999);
    format!("FP-{}-{n}", brand.as_str().to_ascii_uppercase())
}

/// Per-brand unlock status for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardStatus {
    pub brand: Brand,
    pub required_points: i64,
    pub unlocked: bool,
    pub code: Option<String>,
}

pub struct RewardVault<'s, S: Store + ?Sized> {
    store: &'s S,
    ledger: PointsLedger<'s, S>,
}

impl<'s, S: Store + ?Sized> RewardVault<'s, S> {
    pub fn new(store: &'s S, policy: LedgerPolicy) -> Self {
        Self {
            store,
            ledger: PointsLedger::new(store, policy),
        }
    }

    pub fn code(&self, brand: Brand) -> Result<Option<String>> {
        Ok(self
            .store
            .get(&brand.store_key())?
            .filter(|code| !code.is_empty()))
    }

    pub fn is_unlocked(&self, required_points: i64) -> Result<bool> {
        Ok(self.ledger.balance()? >= required_points)
    }

    /// Return the brand's code, minting it on first success.
    ///
    /// # Errors
    /// `Locked` when the balance is below `required_points`; nothing is
    /// written in that case.
    pub fn reveal<R: Rng>(
        &self,
        brand: Brand,
        required_points: i64,
        rng: &mut R,
    ) -> Result<String> {
        let balance = self.ledger.balance()?;
        if balance < required_points {
            return Err(CoreError::Locked {
                required: required_points,
                balance,
            });
        }
        if let Some(existing) = self.code(brand)? {
            return Ok(existing);
        }
        let code = make_code(brand, rng);
        self.store.set(&brand.store_key(), &code)?;
        tracing::info!("Revealed {} reward code", brand);
        Ok(code)
    }

    /// [`reveal`](Self::reveal) with a fixed seed, or the thread RNG when
    /// `seed` is `None`.
    pub fn reveal_seeded(
        &self,
        brand: Brand,
        required_points: i64,
        seed: Option<u64>,
    ) -> Result<String> {
        match seed {
            Some(seed) => self.reveal(brand, required_points, &mut Mcg128Xsl64::seed_from_u64(seed)),
            None => self.reveal(brand, required_points, &mut rand::thread_rng()),
        }
    }

    pub fn status(&self, brand: Brand, required_points: i64) -> Result<RewardStatus> {
        Ok(RewardStatus {
            brand,
            required_points,
            unlocked: self.is_unlocked(required_points)?,
            code: self.code(brand)?,
        })
    }

    /// One line per brand, `Starbucks: <code>`, for pasting elsewhere.
    pub fn summary(&self) -> Result<String> {
        let mut lines = Vec::with_capacity(Brand::ALL.len());
        for brand in Brand::ALL {
            let code = self.code(brand)?;
            lines.push(format!(
                "{}: {}",
                brand.display_name(),
                code.as_deref().unwrap_or(NOT_REVEALED)
            ));
        }
        Ok(lines.join("\n"))
    }
}
