// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use rust_decimal::prelude::ToPrimitive;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Once;
use std::thread;
use tracing::{error, info};

use crate::domain::CategoryOutcome;
use crate::report::SessionSummary;

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Ledger metrics --------
pub static ADMISSIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("admissions_total", "admission outcomes (labels: category, outcome)"),
        &["category", "outcome"],
    )
    .unwrap()
});

pub static RUNNING_TOTAL: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(Opts::new("running_total", "running total per category"), &["category"]).unwrap()
});

pub static ROUNDS: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("rounds_total", "transaction rounds processed").unwrap());

// -------- Sales / commission --------
pub static TOTAL_SALES: Lazy<Gauge> =
    Lazy::new(|| Gauge::new("total_sales", "total sales (final totals x unit price)").unwrap());

pub static COMMISSION: Lazy<Gauge> =
    Lazy::new(|| Gauge::new("commission", "computed tiered commission").unwrap());

static INIT: Once = Once::new();

pub fn init() {
    // Register all metrics to the custom registry (sekali saja, aman dipanggil dari test)
    INIT.call_once(|| {
        for m in [
            REGISTRY.register(Box::new(ADMISSIONS.clone())),
            REGISTRY.register(Box::new(RUNNING_TOTAL.clone())),
            REGISTRY.register(Box::new(ROUNDS.clone())),
            REGISTRY.register(Box::new(TOTAL_SALES.clone())),
            REGISTRY.register(Box::new(COMMISSION.clone())),
        ] {
            if let Err(e) = m {
                error!(?e, "metrics register failed");
            }
        }
    });
}

pub fn observe_round(outcomes: &[CategoryOutcome], totals: impl IntoIterator<Item = (String, i64)>) {
    ROUNDS.inc();
    for o in outcomes {
        ADMISSIONS.with_label_values(&[o.category.as_str(), o.result.label()]).inc();
    }
    for (name, total) in totals {
        RUNNING_TOTAL.with_label_values(&[name.as_str()]).set(total);
    }
}

pub fn observe_summary(summary: &SessionSummary) {
    // gauge f64 hanya untuk scrape; angka exact tetap di report
    TOTAL_SALES.set(summary.total_sales.to_f64().unwrap_or(f64::NAN));
    COMMISSION.set(summary.commission.to_f64().unwrap_or(f64::NAN));
}

/// Encode all metrics in Prometheus text format
pub fn render() -> Vec<u8> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() || buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    buf
}

// Routing minimal dari request line: GET / atau /metrics -> 200, path lain 404, method lain 405
fn route(request: &[u8]) -> (&'static str, Vec<u8>) {
    let head = String::from_utf8_lossy(request);
    let mut parts = head.lines().next().unwrap_or("").split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some("/" | "/metrics")) => ("200 OK", render()),
        (Some("GET"), _) => ("404 Not Found", b"not found\n".to_vec()),
        _ => ("405 Method Not Allowed", b"method not allowed\n".to_vec()),
    }
}

fn handle_client(mut stream: TcpStream) {
    let mut req = [0u8; 1024];
    let n = match stream.read(&mut req) {
        Ok(n) => n,
        Err(e) => {
            error!(?e, "metrics read failed");
            return;
        }
    };
    let (status, body) = route(&req[..n]);
    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; version=0.0.4; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    if let Err(e) = stream.write_all(head.as_bytes()).and_then(|_| stream.write_all(&body)) {
        error!(?e, "metrics write failed");
    }
}

/// Metrics server di OS thread tersendiri; tidak menyentuh state ledger
pub fn serve_metrics(port: u16) -> std::io::Result<thread::JoinHandle<()>> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)?;
    info!(%addr, "metrics listening on / (and /metrics)");

    Ok(thread::spawn(move || {
        for conn in listener.incoming() {
            match conn {
                Ok(stream) => handle_client(stream),
                Err(e) => error!(?e, "metrics accept error"),
            }
        }
    }))
}
