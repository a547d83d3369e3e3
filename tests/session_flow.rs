use commission_engine::config::CommissionPlan;
use commission_engine::domain::{AdmissionResult, Money};
use commission_engine::input::{InputError, QuantityReader};
use commission_engine::report::{ConsoleReporter, JsonReporter};
use commission_engine::session::{Session, SessionError};
use rust_decimal_macros::dec;

fn default_session() -> Session {
    let (ledger, tiers) = CommissionPlan::default().build().unwrap();
    Session::new(ledger, tiers, -1)
}

#[tokio::test]
async fn full_quota_in_one_round() {
    let mut input = QuantityReader::new(&b"70 80 90\n-1\n"[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let summary = default_session().run(&mut input, &mut rep).await.unwrap();

    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.total_sales, dec!(7800));
    assert_eq!(summary.commission, dec!(1420));

    let text = String::from_utf8(rep.into_inner()).unwrap();
    assert!(text.contains("Total sales = 7800\n"));
    assert!(text.contains("Commission = 1420\n"));
    assert!(text.contains("Locks = 70\nStocks = 80\nBarrels = 90\n"));
}

#[tokio::test]
async fn full_quota_over_several_rounds_with_rejections() {
    // round 2: locks 30 ditolak (80 > 70); round 3: stocks 0 ditolak
    let input_text = b"50\n40 45\n30 40 45\n20 0 1\n1 1 1\n-1\n";
    let mut input = QuantityReader::new(&input_text[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let summary = default_session().run(&mut input, &mut rep).await.unwrap();

    assert_eq!(summary.rounds, 4);
    let totals: Vec<_> = summary.ledger.categories.iter().map(|c| c.running_total).collect();
    // locks: 50, (30 ditolak), 20, (1 ditolak)
    // stocks: 40, 40, (0 ditolak), (1 ditolak)
    // barrels: 45, 45, (1 ditolak), (1 ditolak)
    assert_eq!(totals, vec![70, 80, 90]);
    assert_eq!(summary.commission, dec!(1420));

    let text = String::from_utf8(rep.into_inner()).unwrap();
    assert!(text.contains("New total locks = 80 not in the range 1–70\n"));
    assert!(text.contains("Value of stocks not in the range 1–80\n"));
    assert!(text.contains("New total barrels = 91 not in the range 1–90\n"));
}

#[tokio::test]
async fn sentinel_first_gives_zero_commission() {
    let mut input = QuantityReader::new(&b"-1\n"[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let summary = default_session().run(&mut input, &mut rep).await.unwrap();
    assert_eq!(summary.rounds, 0);
    assert_eq!(summary.total_sales, Money::ZERO);
    assert_eq!(summary.commission, Money::ZERO);
    assert!(summary.breakdown.iter().all(|b| b.commission == Money::ZERO));
}

#[tokio::test]
async fn eof_without_sentinel_finishes_normally() {
    let mut input = QuantityReader::new(&b"10 10 10\n"[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let summary = default_session().run(&mut input, &mut rep).await.unwrap();
    // 450 + 300 + 250 = 1000 -> tepat di batas tier pertama
    assert_eq!(summary.total_sales, dec!(1000));
    assert_eq!(summary.commission, dec!(100));
}

#[tokio::test]
async fn sentinel_only_checked_on_lead_field() {
    // -1 di field kedua bukan sentinel, hanya quantity yang ditolak
    let mut input = QuantityReader::new(&b"5 -1 5\n-1\n"[..]);
    let mut rep = JsonReporter::new(Vec::new());
    let summary = default_session().run(&mut input, &mut rep).await.unwrap();
    assert_eq!(summary.rounds, 1);

    let text = String::from_utf8(rep.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["type"], "round");
    assert_eq!(lines[0]["outcomes"][1]["outcome"], "rejected_out_of_range");
    assert_eq!(lines[1]["type"], "summary");
    assert_eq!(lines[1]["total_sales"], "350");
    assert_eq!(lines[1]["commission"], "35");
}

#[tokio::test]
async fn custom_sentinel_and_plan() {
    let plan = CommissionPlan::from_json(
        r#"{
            "categories": [{"name": "seats", "unit_price": "100", "max_per_transaction": 5, "max_cumulative": 12}],
            "tiers": [{"lower_bound": "0", "rate_bps": 500}, {"lower_bound": "1000", "rate_bps": 1000}]
        }"#,
    )
    .unwrap();
    let (ledger, tiers) = plan.build().unwrap();
    let mut input = QuantityReader::new(&b"5\n5\n5\n2\n0\n"[..]);
    let mut rep = JsonReporter::new(Vec::new());
    let summary = Session::new(ledger, tiers, 0).run(&mut input, &mut rep).await.unwrap();

    assert_eq!(summary.rounds, 4);
    assert_eq!(summary.ledger.categories[0].running_total, 12);
    // 1200: 1000*5% + 200*10%
    assert_eq!(summary.commission, dec!(70));
}

#[tokio::test]
async fn truncated_round_is_an_error() {
    let mut input = QuantityReader::new(&b"10 20"[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let err = default_session().run(&mut input, &mut rep).await.unwrap_err();
    assert!(matches!(err, SessionError::Input(InputError::Truncated { read: 2, expected: 3 })));
}

#[tokio::test]
async fn garbage_input_is_an_error() {
    let mut input = QuantityReader::new(&b"10 x 20\n"[..]);
    let mut rep = ConsoleReporter::new(Vec::new());
    let err = default_session().run(&mut input, &mut rep).await.unwrap_err();
    assert!(matches!(err, SessionError::Input(InputError::NotAnInteger { .. })));
}

#[test]
fn rejection_outcomes_are_values() {
    let (mut ledger, _) = CommissionPlan::default().build().unwrap();
    assert_eq!(ledger.try_admit("locks", 50).unwrap(), AdmissionResult::Admitted { new_total: 50 });
    assert_eq!(
        ledger.try_admit("locks", 30).unwrap(),
        AdmissionResult::RejectedExceedsCumulative { attempted_total: 80, cap: 70 }
    );
}

#[tokio::test]
async fn commission_is_exact_for_fractional_sales() {
    let plan = CommissionPlan::from_json(
        r#"{"categories": [{"name": "kits", "unit_price": "1000.01", "max_per_transaction": 1, "max_cumulative": 1}]}"#,
    )
    .unwrap();
    let (ledger, tiers) = plan.build().unwrap();
    let mut input = QuantityReader::new(&b"1\n-1\n"[..]);
    let mut rep = JsonReporter::new(Vec::new());
    let summary = Session::new(ledger, tiers, -1).run(&mut input, &mut rep).await.unwrap();

    // 1000 × 10% + 0.01 × 15%
    assert_eq!(summary.commission, dec!(100.0015));
    let text = String::from_utf8(rep.into_inner()).unwrap();
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["commission"], "100.0015");
    assert_eq!(last["total_sales"], "1000.01");
}
