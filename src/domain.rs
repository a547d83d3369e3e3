// ===============================
// src/domain.rs
// ===============================
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Jumlah unit per transaksi / akumulasi (input untrusted, boleh negatif)
pub type Quantity = i64;

/// Uang: decimal exact ("45.0", 45, 45.0 semua valid di file plan)
pub type Money = Decimal;

/// Rate dalam basis point (10_000 = 100%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateBps(pub u32);

impl RateBps {
    /// 1500 bps -> 0.1500
    pub fn fraction(self) -> Decimal { Decimal::new(self.0 as i64, 4) }
}

impl fmt::Display for RateBps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Hasil tryAdmit per kategori. Reject adalah outcome normal, bukan error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionResult {
    Admitted { new_total: Quantity },
    RejectedOutOfRange { min: Quantity, max: Quantity },
    RejectedExceedsCumulative { attempted_total: Quantity, cap: Quantity },
}

impl AdmissionResult {
    pub fn is_admitted(&self) -> bool { matches!(self, AdmissionResult::Admitted { .. }) }

    /// label untuk metrics
    pub fn label(&self) -> &'static str {
        match self {
            AdmissionResult::Admitted { .. } => "admitted",
            AdmissionResult::RejectedOutOfRange { .. } => "out_of_range",
            AdmissionResult::RejectedExceedsCumulative { .. } => "exceeds_cumulative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutcome {
    pub category: String,
    pub quantity: Quantity,
    #[serde(flatten)]
    pub result: AdmissionResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySnapshot {
    pub name: String,
    pub running_total: Quantity,
    pub min_per_transaction: Quantity,
    pub max_per_transaction: Quantity,
    pub max_cumulative: Quantity,
    pub unit_price: Money,
    pub sales: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub categories: Vec<CategorySnapshot>,
    pub total_sales: Money,
}
