// ===============================
// src/main.rs
// ===============================
/*
 cd /home/kukuhtw/rust/commission_engine

 # sesi interaktif (default plan: locks/stocks/barrels)
 cargo run --release

 # JSON lines + metrics
 printf '70 80 90\n-1\n' | REPORT_FORMAT=json METRICS_PORT=9898 cargo run --release
*/
/*
=============================================================================
Project : commission_engine — quota-bounded sales ledger & tiered commission
Module  : main.rs
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
use std::process::ExitCode;

use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commission_engine::config::{self, ReportFormat};
use commission_engine::input::QuantityReader;
use commission_engine::metrics;
use commission_engine::report::{ConsoleReporter, JsonReporter, Reporter};
use commission_engine::session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ---- Load config & plan ----
    let loaded = config::load();

    // ---- Logging (stderr, stdout khusus report) ----
    let level = loaded.as_ref().map(|(a, _)| a.log_level.clone()).unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let (args, plan) = match loaded {
        Ok(v) => v,
        Err(e) => {
            error!(%e, "config");
            return ExitCode::FAILURE;
        }
    };
    let (ledger, tiers) = match plan.build() {
        Ok(v) => v,
        Err(e) => {
            error!(%e, "plan");
            return ExitCode::FAILURE;
        }
    };

    info!(
        plan = ?args.plan,
        format = ?args.format,
        sentinel = args.sentinel,
        categories = ledger.len(),
        tiers = tiers.tiers().len(),
        "startup config"
    );

    // ---- Metrics (opsional) ----
    metrics::init();
    if let Some(port) = args.metrics_port {
        if let Err(e) = metrics::serve_metrics(port) {
            error!(%e, port, "metrics bind failed");
            return ExitCode::FAILURE;
        }
    }

    // ---- Session ----
    let mut input = QuantityReader::new(BufReader::new(tokio::io::stdin()));
    let stdout = std::io::stdout();
    let mut reporter: Box<dyn Reporter> = match args.format {
        ReportFormat::Text => Box::new(ConsoleReporter::new(stdout.lock())),
        ReportFormat::Json => Box::new(JsonReporter::new(stdout.lock())),
    };

    match Session::new(ledger, tiers, args.sentinel).run(&mut input, &mut *reporter).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "session aborted");
            ExitCode::FAILURE
        }
    }
}
