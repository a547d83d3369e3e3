// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : commission_engine — quota-bounded sales ledger & tiered commission
Module  : config.rs
Version : 0.5.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
Email   : kukuhtw@gmail.com
WhatsApp: https://wa.me/628129893706
LinkedIn: https://id.linkedin.com/in/kukuhtw
License : MIT (see LICENSE)

Summary : Reads per-category transaction quantities from stdin, admits them
          against per-transaction and cumulative quotas, converts the final
          totals into sales, computes a marginal tiered commission, and
          reports each round as text or JSON lines.

(c) 2025 Kukuh TW. All rights reserved where applicable.
=============================================================================
*/
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Money, Quantity};
use crate::ledger::{CategoryQuota, LedgerError, QuotaLedger};
use crate::tiers::{CommissionTier, TierError, TierSchedule};

/// Format output ke stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Parser)]
#[command(name = "commission_engine", version, about = "Quota-bounded sales ledger with tiered commission")]
pub struct Args {
    /// JSON plan file (categories + tiers); default = locks/stocks/barrels
    #[arg(long, env = "COMMISSION_PLAN")]
    pub plan: Option<PathBuf>,

    #[arg(long, env = "REPORT_FORMAT", value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Nilai lead field yang mengakhiri input
    #[arg(long, env = "SENTINEL", default_value_t = -1, allow_hyphen_values = true)]
    pub sentinel: Quantity,

    /// Port Prometheus (opsional)
    #[arg(long, env = "METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read plan {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("parse plan {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Tiers(#[from] TierError),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub unit_price: Money,
    #[serde(default = "default_min_per_transaction")]
    pub min_per_transaction: Quantity,
    pub max_per_transaction: Quantity,
    pub max_cumulative: Quantity,
}

fn default_min_per_transaction() -> Quantity {
    1
}

/// Plan = daftar kategori (urutan = urutan input per round) + tabel tier
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CommissionPlan {
    pub categories: Vec<CategorySpec>,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<CommissionTier>,
}

fn default_tiers() -> Vec<CommissionTier> {
    TierSchedule::standard().tiers().to_vec()
}

impl Default for CommissionPlan {
    fn default() -> Self {
        let cat = |name: &str, price: i64, cap: Quantity| CategorySpec {
            name: name.to_string(),
            unit_price: Decimal::from(price),
            min_per_transaction: 1,
            max_per_transaction: cap,
            max_cumulative: cap,
        };
        Self {
            categories: vec![cat("locks", 45, 70), cat("stocks", 30, 80), cat("barrels", 25, 90)],
            tiers: default_tiers(),
        }
    }
}

impl CommissionPlan {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: shown.clone(), source })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse { path: shown, source })
    }

    /// Build ledger + schedule (validasi bounds, duplikat, tier)
    pub fn build(&self) -> Result<(QuotaLedger, TierSchedule), ConfigError> {
        let quotas = self
            .categories
            .iter()
            .map(|c| {
                CategoryQuota::new(
                    c.name.clone(),
                    c.unit_price,
                    c.min_per_transaction,
                    c.max_per_transaction,
                    c.max_cumulative,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ledger = QuotaLedger::new(quotas)?;
        let tiers = TierSchedule::new(self.tiers.clone())?;
        Ok((ledger, tiers))
    }
}

pub fn load() -> Result<(Args, CommissionPlan), ConfigError> {
    // Pastikan .env dibaca sebelum clap melihat env
    let _ = dotenv();
    let args = Args::parse();

    let plan = match &args.plan {
        Some(path) => CommissionPlan::from_file(path)?,
        None => CommissionPlan::default(),
    };
    Ok((args, plan))
}
