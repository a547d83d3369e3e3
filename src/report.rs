// ===============================
// src/report.rs (output collaborator: text console / JSON lines)
// ===============================
use std::io::{self, Write};

use serde::Serialize;

use crate::domain::{AdmissionResult, CategoryOutcome, LedgerSnapshot, Money, Quantity};
use crate::tiers::BracketShare;

/// Hasil satu round: outcome per kategori + total setelah update
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub round: u64,
    pub ts_ms: i64,
    pub outcomes: Vec<CategoryOutcome>,
    pub ledger: LedgerSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub rounds: u64,
    pub ledger: LedgerSnapshot,
    pub total_sales: Money,
    pub commission: Money,
    pub breakdown: Vec<BracketShare>,
}

pub trait Reporter {
    /// Prompt untuk lead field (yang bisa berisi sentinel)
    fn prompt_lead(&mut self, category: &str, sentinel: Quantity, first: bool) -> io::Result<()>;
    fn prompt_rest(&mut self, categories: &[&str]) -> io::Result<()>;
    fn round(&mut self, report: &RoundReport) -> io::Result<()>;
    fn summary(&mut self, summary: &SessionSummary) -> io::Result<()>;
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_uppercase().chain(c).collect(),
        None => String::new(),
    }
}

// "a", "a and b", "a, b and c"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Output teks untuk manusia (stdout)
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self { Self { out } }
    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn prompt_lead(&mut self, category: &str, sentinel: Quantity, first: bool) -> io::Result<()> {
        if !first {
            writeln!(self.out)?;
        }
        writeln!(self.out, "Enter the number of {} (enter {} to exit):", category, sentinel)?;
        self.out.flush()
    }

    fn prompt_rest(&mut self, categories: &[&str]) -> io::Result<()> {
        if categories.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "Enter the number of {}:", join_names(categories))?;
        self.out.flush()
    }

    fn round(&mut self, report: &RoundReport) -> io::Result<()> {
        for (o, cat) in report.outcomes.iter().zip(&report.ledger.categories) {
            match o.result {
                AdmissionResult::Admitted { .. } => {}
                AdmissionResult::RejectedOutOfRange { min, max } => {
                    writeln!(self.out, "Value of {} not in the range {}–{}", o.category, min, max)?
                }
                AdmissionResult::RejectedExceedsCumulative { attempted_total, cap } => writeln!(
                    self.out,
                    "New total {} = {} not in the range {}–{}",
                    o.category, attempted_total, cat.min_per_transaction, cap
                )?,
            }
        }
        for cat in &report.ledger.categories {
            writeln!(self.out, "Total {} = {}", cat.name, cat.running_total)?;
        }
        self.out.flush()
    }

    fn summary(&mut self, summary: &SessionSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Final Totals:")?;
        for cat in &summary.ledger.categories {
            writeln!(self.out, "{} = {}", capitalize(&cat.name), cat.running_total)?;
        }
        writeln!(self.out, "Total sales = {}", summary.total_sales)?;
        writeln!(self.out, "Commission = {}", summary.commission)?;
        self.out.flush()
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Round(&'a RoundReport),
    Summary(&'a SessionSummary),
}

/// Satu objek JSON per baris, tanpa prompt
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self { Self { out } }
    pub fn into_inner(self) -> W { self.out }

    fn emit(&mut self, ev: &JsonEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, ev)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn prompt_lead(&mut self, _category: &str, _sentinel: Quantity, _first: bool) -> io::Result<()> { Ok(()) }
    fn prompt_rest(&mut self, _categories: &[&str]) -> io::Result<()> { Ok(()) }

    fn round(&mut self, report: &RoundReport) -> io::Result<()> { self.emit(&JsonEvent::Round(report)) }

    fn summary(&mut self, summary: &SessionSummary) -> io::Result<()> { self.emit(&JsonEvent::Summary(summary)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::domain::CategorySnapshot;

    fn snap(name: &str, total: Quantity, cap: Quantity) -> CategorySnapshot {
        CategorySnapshot {
            name: name.into(),
            running_total: total,
            min_per_transaction: 1,
            max_per_transaction: cap,
            max_cumulative: cap,
            unit_price: Decimal::ONE,
            sales: Decimal::from(total),
        }
    }

    fn sample_round() -> RoundReport {
        RoundReport {
            round: 2,
            ts_ms: 0,
            outcomes: vec![
                CategoryOutcome {
                    category: "locks".into(),
                    quantity: 30,
                    result: AdmissionResult::RejectedExceedsCumulative { attempted_total: 80, cap: 70 },
                },
                CategoryOutcome {
                    category: "stocks".into(),
                    quantity: 0,
                    result: AdmissionResult::RejectedOutOfRange { min: 1, max: 80 },
                },
                CategoryOutcome {
                    category: "barrels".into(),
                    quantity: 5,
                    result: AdmissionResult::Admitted { new_total: 5 },
                },
            ],
            ledger: LedgerSnapshot {
                categories: vec![snap("locks", 50, 70), snap("stocks", 0, 80), snap("barrels", 5, 90)],
                total_sales: Decimal::from(55),
            },
        }
    }

    #[test]
    fn console_round_matches_legacy_wording() {
        let mut rep = ConsoleReporter::new(Vec::new());
        rep.round(&sample_round()).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(
            text,
            "New total locks = 80 not in the range 1–70\n\
             Value of stocks not in the range 1–80\n\
             Total locks = 50\n\
             Total stocks = 0\n\
             Total barrels = 5\n"
        );
    }

    #[test]
    fn console_prompts() {
        let mut rep = ConsoleReporter::new(Vec::new());
        rep.prompt_lead("locks", -1, true).unwrap();
        rep.prompt_rest(&["stocks", "barrels"]).unwrap();
        rep.prompt_lead("locks", -1, false).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(
            text,
            "Enter the number of locks (enter -1 to exit):\n\
             Enter the number of stocks and barrels:\n\
             \nEnter the number of locks (enter -1 to exit):\n"
        );
    }

    #[test]
    fn joins_names() {
        assert_eq!(join_names(&["a"]), "a");
        assert_eq!(join_names(&["a", "b", "c"]), "a, b and c");
        assert_eq!(capitalize("barrels"), "Barrels");
    }

    #[test]
    fn json_round_is_one_tagged_line() {
        let mut rep = JsonReporter::new(Vec::new());
        rep.prompt_lead("locks", -1, true).unwrap();
        rep.round(&sample_round()).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
        let v: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(v["type"], "round");
        assert_eq!(v["round"], 2);
        assert_eq!(v["outcomes"][1]["outcome"], "rejected_out_of_range");
        assert_eq!(v["ledger"]["total_sales"], "55");
    }
}
