// ===============================
// src/ledger.rs (quota ledger: admission + running totals)
// ===============================
use ahash::AHashMap as HashMap;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    AdmissionResult, CategoryOutcome, CategorySnapshot, LedgerSnapshot, Money, Quantity,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("round has {got} quantities, ledger has {expected} categories")]
    RoundArity { expected: usize, got: usize },
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("ledger needs at least one category")]
    NoCategories,
    #[error("category {category}: invalid bounds (min {min}, max {max}, cap {cap})")]
    InvalidBounds { category: String, min: Quantity, max: Quantity, cap: Quantity },
    #[error("category {category}: unit price {price} is negative")]
    NegativePrice { category: String, price: Money },
}

/// Satu kategori: harga tetap, batas per transaksi, batas kumulatif, dan akumulator.
#[derive(Debug, Clone)]
pub struct CategoryQuota {
    name: String,
    unit_price: Money,
    min_per_transaction: Quantity,
    max_per_transaction: Quantity,
    max_cumulative: Quantity,
    running_total: Quantity,
}

impl CategoryQuota {
    pub fn new(
        name: impl Into<String>,
        unit_price: Money,
        min_per_transaction: Quantity,
        max_per_transaction: Quantity,
        max_cumulative: Quantity,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        // min >= 0 menjaga 0 <= running_total dan running_total tidak pernah turun
        if min_per_transaction < 0 || min_per_transaction > max_per_transaction || max_cumulative < 0 {
            return Err(LedgerError::InvalidBounds {
                category: name,
                min: min_per_transaction,
                max: max_per_transaction,
                cap: max_cumulative,
            });
        }
        if unit_price < Money::ZERO {
            return Err(LedgerError::NegativePrice { category: name, price: unit_price });
        }
        Ok(Self {
            name,
            unit_price,
            min_per_transaction,
            max_per_transaction,
            max_cumulative,
            running_total: 0,
        })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn unit_price(&self) -> Money { self.unit_price }
    pub fn running_total(&self) -> Quantity { self.running_total }
    pub fn max_cumulative(&self) -> Quantity { self.max_cumulative }
    pub fn bounds(&self) -> (Quantity, Quantity) { (self.min_per_transaction, self.max_per_transaction) }

    pub fn sales(&self) -> Money { self.unit_price.saturating_mul(Decimal::from(self.running_total)) }

    /// Pre-admission checks -> jika lolos, commit ke running_total
    fn try_admit(&mut self, quantity: Quantity) -> AdmissionResult {
        // 1) Range per transaksi
        if quantity < self.min_per_transaction || quantity > self.max_per_transaction {
            return AdmissionResult::RejectedOutOfRange {
                min: self.min_per_transaction,
                max: self.max_per_transaction,
            };
        }

        // 2) Cap kumulatif (qty sudah dalam range, tapi tetap saturating)
        let attempted_total = self.running_total.saturating_add(quantity);
        if attempted_total > self.max_cumulative {
            return AdmissionResult::RejectedExceedsCumulative {
                attempted_total,
                cap: self.max_cumulative,
            };
        }

        // 3) Commit
        self.running_total = attempted_total;
        AdmissionResult::Admitted { new_total: attempted_total }
    }

    fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            name: self.name.clone(),
            running_total: self.running_total,
            min_per_transaction: self.min_per_transaction,
            max_per_transaction: self.max_per_transaction,
            max_cumulative: self.max_cumulative,
            unit_price: self.unit_price,
            sales: self.sales(),
        }
    }
}

/// Pemilik semua akumulator. Urutan kategori = urutan plan (dan urutan input per round).
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    categories: Vec<CategoryQuota>,
    index: HashMap<String, usize>,
}

impl QuotaLedger {
    pub fn new(categories: Vec<CategoryQuota>) -> Result<Self, LedgerError> {
        if categories.is_empty() {
            return Err(LedgerError::NoCategories);
        }
        let mut index = HashMap::with_capacity(categories.len());
        for (i, c) in categories.iter().enumerate() {
            if index.insert(c.name.clone(), i).is_some() {
                return Err(LedgerError::DuplicateCategory(c.name.clone()));
            }
        }
        Ok(Self { categories, index })
    }

    pub fn len(&self) -> usize { self.categories.len() }
    pub fn is_empty(&self) -> bool { self.categories.is_empty() }
    pub fn categories(&self) -> &[CategoryQuota] { &self.categories }

    pub fn category(&self, name: &str) -> Option<&CategoryQuota> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    pub fn try_admit(&mut self, category: &str, quantity: Quantity) -> Result<AdmissionResult, LedgerError> {
        let i = *self
            .index
            .get(category)
            .ok_or_else(|| LedgerError::UnknownCategory(category.to_string()))?;
        Ok(self.admit_at(i, quantity))
    }

    /// Satu round = satu quantity per kategori, divalidasi independen.
    pub fn admit_round(&mut self, quantities: &[Quantity]) -> Result<Vec<CategoryOutcome>, LedgerError> {
        if quantities.len() != self.categories.len() {
            return Err(LedgerError::RoundArity { expected: self.categories.len(), got: quantities.len() });
        }
        Ok(quantities
            .iter()
            .enumerate()
            .map(|(i, &quantity)| CategoryOutcome {
                category: self.categories[i].name.clone(),
                quantity,
                result: self.admit_at(i, quantity),
            })
            .collect())
    }

    fn admit_at(&mut self, i: usize, quantity: Quantity) -> AdmissionResult {
        let cat = &mut self.categories[i];
        let result = cat.try_admit(quantity);
        match result {
            AdmissionResult::Admitted { new_total } => {
                debug!(category = %cat.name, quantity, new_total, "admitted")
            }
            _ => info!(category = %cat.name, quantity, outcome = result.label(), "rejected"),
        }
        result
    }

    pub fn total_sales(&self) -> Money {
        self.categories.iter().map(CategoryQuota::sales).fold(Money::ZERO, Money::saturating_add)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            categories: self.categories.iter().map(CategoryQuota::snapshot).collect(),
            total_sales: self.total_sales(),
        }
    }
}
