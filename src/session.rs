// ===============================
// src/session.rs (driving loop: read round -> admit -> report)
// ===============================
use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::domain::Quantity;
use crate::input::{InputError, QuantityReader};
use crate::ledger::{LedgerError, QuotaLedger};
use crate::metrics;
use crate::report::{Reporter, RoundReport, SessionSummary};
use crate::tiers::TierSchedule;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Pemilik ledger selama proses berjalan; satu round selesai sebelum round berikutnya dibaca.
pub struct Session {
    ledger: QuotaLedger,
    tiers: TierSchedule,
    sentinel: Quantity,
    rounds: u64,
}

impl Session {
    pub fn new(ledger: QuotaLedger, tiers: TierSchedule, sentinel: Quantity) -> Self {
        Self { ledger, tiers, sentinel, rounds: 0 }
    }

    pub fn ledger(&self) -> &QuotaLedger { &self.ledger }

    pub async fn run<R, P>(
        mut self,
        input: &mut QuantityReader<R>,
        reporter: &mut P,
    ) -> Result<SessionSummary, SessionError>
    where
        R: AsyncBufRead + Unpin,
        P: Reporter + ?Sized,
    {
        let names: Vec<String> = self.ledger.categories().iter().map(|c| c.name().to_string()).collect();
        let rest: Vec<&str> = names.iter().skip(1).map(String::as_str).collect();
        info!(categories = ?names, sentinel = self.sentinel, "session started");

        loop {
            reporter.prompt_lead(&names[0], self.sentinel, self.rounds == 0)?;
            let lead = match input.next_quantity().await? {
                Some(q) if q == self.sentinel => break,
                Some(q) => q,
                None => {
                    warn!("input closed without sentinel, finishing session");
                    break;
                }
            };
            reporter.prompt_rest(&rest)?;
            let quantities = input.read_rest(lead, names.len()).await?;

            let outcomes = self.ledger.admit_round(&quantities)?;
            self.rounds += 1;

            let report = RoundReport {
                round: self.rounds,
                ts_ms: Utc::now().timestamp_millis(),
                outcomes,
                ledger: self.ledger.snapshot(),
            };
            metrics::observe_round(
                &report.outcomes,
                report.ledger.categories.iter().map(|c| (c.name.clone(), c.running_total)),
            );
            reporter.round(&report)?;
        }

        let summary = self.summarize();
        metrics::observe_summary(&summary);
        info!(
            rounds = summary.rounds,
            total_sales = %summary.total_sales,
            commission = %summary.commission,
            "session finished"
        );
        reporter.summary(&summary)?;
        Ok(summary)
    }

    /// Total akhir -> sales -> komisi
    pub fn summarize(&self) -> SessionSummary {
        let ledger = self.ledger.snapshot();
        let total_sales = ledger.total_sales.normalize();
        SessionSummary {
            rounds: self.rounds,
            total_sales,
            commission: self.tiers.compute_commission(total_sales),
            breakdown: self.tiers.breakdown(total_sales),
            ledger,
        }
    }
}
