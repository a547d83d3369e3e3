// ===============================
// src/lib.rs
// ===============================
pub mod config;
pub mod domain;
pub mod input;
pub mod ledger;
pub mod metrics;
pub mod report;
pub mod session;
pub mod tiers;
