mod common;

use anyhow::Result;
use common::{sample_receipt, test_store};
use tally::domain::{category_breakdown, remaining, total_spent};
use tally::io::{Exporter, LedgerSnapshot};

#[tokio::test]
async fn test_single_coffee_scenario() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    store.add_expense("Coffee", 4.50, "food_drink").await?;

    let summary = store.summary();

    assert_eq!(summary.total_spent, 450);
    assert_eq!(summary.remaining, 99_550);
    assert!(!summary.over_budget);
    assert_eq!(summary.breakdown.len(), 1);
    assert_eq!(summary.breakdown[0].category, "food_drink");
    assert_eq!(summary.breakdown[0].amount, 450);
    assert_eq!(summary.breakdown[0].percentage, 100.0);

    Ok(())
}

#[tokio::test]
async fn test_summary_matches_aggregates() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    store.add_expense("Rent", 700.0, "household").await?;
    store.add_expense("Train", 45.5, "travel").await?;
    store.add_expense("Lamp", 30.0, "household").await?;
    store.add_expense("Course", 299.99, "education").await?;

    let summary = store.summary();
    let total = total_spent(store.expenses());

    assert_eq!(total, 107_549);
    assert_eq!(summary.total_spent, total);
    assert_eq!(summary.remaining, remaining(store.budget(), total));
    assert_eq!(summary.remaining, -7_549);
    assert!(summary.over_budget);

    let categories: Vec<&str> = summary
        .breakdown
        .iter()
        .map(|s| s.category.as_str())
        .collect();
    assert_eq!(categories, vec!["household", "travel", "education"]);
    assert_eq!(summary.breakdown[0].amount, 73_000);

    let percent: f64 = summary.breakdown.iter().map(|s| s.percentage).sum();
    assert!((percent - 100.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_receipt_only_ledger_has_no_breakdown() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    store.attach_receipt(sample_receipt()).await;

    let summary = store.summary();

    assert_eq!(summary.total_spent, 0);
    assert_eq!(summary.remaining, store.budget());
    assert!(category_breakdown(store.expenses()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_export_expenses_csv() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    store.add_expense("Coffee", 4.5, "food_drink").await?;
    store.add_expense("Vet, annual", 120.0, "pets").await?;
    store.attach_receipt(sample_receipt()).await;

    let mut out = Vec::new();
    let count = Exporter::new(&store).export_expenses_csv(&mut out)?;
    let csv = String::from_utf8(out)?;
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(count, 2);
    assert_eq!(lines[0], "id,date,name,category,amount,has_receipt");
    assert!(lines[1].ends_with(",Coffee,food_drink,4.50,false"));
    assert!(lines[2].ends_with(",\"Vet, annual\",pets,120.00,true"));

    Ok(())
}

#[tokio::test]
async fn test_export_snapshot_json() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    store.add_expense("Coffee", 4.5, "food_drink").await?;
    store.set_budget(200.0).await?;

    let mut out = Vec::new();
    let snapshot = Exporter::new(&store).export_snapshot_json(&mut out)?;
    let parsed: LedgerSnapshot = serde_json::from_slice(&out)?;

    assert_eq!(snapshot.expenses.len(), 1);
    assert_eq!(parsed.budget, 200.0);
    assert!(!parsed.dark_mode);
    assert_eq!(parsed.expenses, store.expenses());

    Ok(())
}
