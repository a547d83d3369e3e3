// ===============================
// src/tiers.rs (tiered commission, marginal brackets)
// ===============================
//
// Komisi progresif: rate tiap bracket hanya berlaku untuk porsi sales di dalam
// span bracket tsb. Nilai tepat di batas bracket masuk bracket bawah.
// Bracket terakhir tidak punya batas atas.
//
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Money, RateBps};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionTier {
    pub lower_bound: Money,
    pub rate_bps: RateBps,
}

impl CommissionTier {
    pub const fn new(lower_bound: Money, rate_bps: RateBps) -> Self { Self { lower_bound, rate_bps } }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    #[error("tier table is empty")]
    Empty,
    #[error("first tier must start at 0, got {0}")]
    FirstNotZero(Money),
    #[error("tier lower bounds must strictly increase ({prev} then {next})")]
    NotIncreasing { prev: Money, next: Money },
}

/// Porsi sales yang jatuh di satu bracket + komisinya
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketShare {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate_bps: RateBps,
    pub span: Money,
    pub commission: Money,
}

/// Tabel bracket tervalidasi (urut, mulai 0, naik ketat)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierSchedule {
    tiers: Vec<CommissionTier>,
}

impl TierSchedule {
    pub fn new(tiers: Vec<CommissionTier>) -> Result<Self, TierError> {
        let first = tiers.first().ok_or(TierError::Empty)?;
        if !first.lower_bound.is_zero() {
            return Err(TierError::FirstNotZero(first.lower_bound));
        }
        for w in tiers.windows(2) {
            if w[1].lower_bound <= w[0].lower_bound {
                return Err(TierError::NotIncreasing { prev: w[0].lower_bound, next: w[1].lower_bound });
            }
        }
        Ok(Self { tiers })
    }

    /// 0 @10%, 1000 @15%, 1800 @20%
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                CommissionTier::new(Decimal::ZERO, RateBps(1_000)),
                CommissionTier::new(Decimal::from(1_000), RateBps(1_500)),
                CommissionTier::new(Decimal::from(1_800), RateBps(2_000)),
            ],
        }
    }

    pub fn tiers(&self) -> &[CommissionTier] { &self.tiers }

    // Span per bracket yang terisi oleh sales. Bracket pertama selalu ikut
    // (sales negatif -> span negatif), bracket lain hanya jika sales > lower.
    fn shares(&self, total_sales: Money) -> impl Iterator<Item = BracketShare> + '_ {
        self.tiers
            .iter()
            .enumerate()
            .take_while(move |(i, t)| *i == 0 || total_sales > t.lower_bound)
            .map(move |(i, t)| {
                let upper_bound = self.tiers.get(i + 1).map(|n| n.lower_bound);
                let top = match upper_bound {
                    Some(u) if total_sales > u => u,
                    _ => total_sales,
                };
                let span = top.saturating_sub(t.lower_bound);
                BracketShare {
                    lower_bound: t.lower_bound,
                    upper_bound,
                    rate_bps: t.rate_bps,
                    span,
                    commission: span.saturating_mul(t.rate_bps.fraction()).normalize(),
                }
            })
    }

    /// Fold marginal: Σ span × rate, exact (tanpa pembulatan)
    pub fn compute_commission(&self, total_sales: Money) -> Money {
        self.shares(total_sales)
            .fold(Money::ZERO, |acc, share| acc.saturating_add(share.commission))
            .normalize()
    }

    pub fn breakdown(&self, total_sales: Money) -> Vec<BracketShare> {
        self.shares(total_sales).collect()
    }
}

impl Default for TierSchedule {
    fn default() -> Self { Self::standard() }
}

/// Free function versi "computeCommission(totalSales, tiers)"
pub fn compute_commission(total_sales: Money, tiers: &TierSchedule) -> Money {
    tiers.compute_commission(total_sales)
}
