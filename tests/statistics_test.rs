use std::str::FromStr;

use debt_tracker_server::models::{Debt, DebtStatus};
use debt_tracker_server::month::YearMonth;
use debt_tracker_server::statistics::{compute_statistics, summarize};
use rust_decimal::Decimal;
use time::{Date, Duration, Month, macros::date};

const TODAY: Date = date!(2024 - 03 - 15);

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

fn debt(amount: &str, due_date: Date, status: DebtStatus) -> Debt {
    Debt {
        id: format!("{amount}-{due_date}"),
        owner_id: "user-1".to_string(),
        lender_name: "Lender".to_string(),
        amount: dec(amount),
        due_date,
        status,
        description: None,
        created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
    }
}

#[test]
fn empty_set_has_zero_totals_and_six_empty_buckets() {
    let stats = compute_statistics(&[], TODAY);
    assert_eq!(stats.total_unpaid, Decimal::ZERO);
    assert_eq!(stats.total_paid, Decimal::ZERO);
    assert_eq!(stats.total_count, 0);
    assert_eq!(stats.monthly.len(), 6);
    assert!(
        stats
            .monthly
            .iter()
            .all(|b| b.unpaid_amount.is_zero() && b.paid_amount.is_zero())
    );

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_unpaid"], "0.00");
}

#[test]
fn five_unpaid_and_three_paid_scenario() {
    let mut debts = Vec::new();
    for i in 0..5 {
        debts.push(debt("1000000.00", TODAY + Duration::days(20 + i), DebtStatus::Unpaid));
    }
    for i in 0..3 {
        debts.push(debt("500000.00", TODAY - Duration::days(i), DebtStatus::Paid));
    }

    let stats = compute_statistics(&debts, TODAY);
    assert_eq!(stats.total_unpaid, dec("5000000"));
    assert_eq!(stats.total_paid, dec("1500000"));
    assert_eq!(stats.unpaid_count, 5);
    assert_eq!(stats.paid_count, 3);
    assert_eq!(stats.total_count, 8);
}

#[test]
fn totals_are_exact_decimal_sums() {
    let debts: Vec<Debt> = (0..10)
        .map(|_| debt("0.10", TODAY + Duration::days(30), DebtStatus::Unpaid))
        .collect();
    let stats = compute_statistics(&debts, TODAY);
    assert_eq!(stats.total_unpaid, dec("1.00"));
    assert_eq!(stats.total_unpaid.to_string(), "1.00");
}

#[test]
fn paid_plus_unpaid_equals_sum_of_all_amounts() {
    let debts = vec![
        debt("120.55", date!(2023 - 01 - 10), DebtStatus::Paid),
        debt("99.45", date!(2024 - 02 - 29), DebtStatus::Unpaid),
        debt("1000.00", date!(2024 - 03 - 01), DebtStatus::Unpaid),
        debt("0.01", date!(2025 - 07 - 04), DebtStatus::Paid),
    ];
    let stats = compute_statistics(&debts, TODAY);
    let all: Decimal = debts.iter().map(|d| d.amount).sum();
    assert_eq!(stats.total_unpaid + stats.total_paid, all);
}

#[test]
fn counts_overdue_and_due_soon() {
    let debts = vec![
        debt("10.00", TODAY - Duration::days(1), DebtStatus::Unpaid),
        debt("10.00", TODAY - Duration::days(40), DebtStatus::Unpaid),
        debt("10.00", TODAY, DebtStatus::Unpaid),
        debt("10.00", TODAY + Duration::days(7), DebtStatus::Unpaid),
        debt("10.00", TODAY + Duration::days(8), DebtStatus::Unpaid),
        debt("10.00", TODAY - Duration::days(3), DebtStatus::Paid),
        debt("10.00", TODAY + Duration::days(2), DebtStatus::Paid),
    ];
    let stats = compute_statistics(&debts, TODAY);
    assert_eq!(stats.overdue_count, 2);
    assert_eq!(stats.due_soon_count, 2);
    assert_eq!(stats.unpaid_count, 5);
}

#[test]
fn buckets_cover_six_months_ending_at_reference_month_oldest_first() {
    let stats = compute_statistics(&[], TODAY);
    let months: Vec<String> = stats.monthly.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
    );
}

#[test]
fn buckets_partition_amounts_by_due_month_and_status() {
    let debts = vec![
        debt("100.00", date!(2024 - 03 - 31), DebtStatus::Unpaid),
        debt("50.00", date!(2024 - 03 - 01), DebtStatus::Paid),
        debt("25.00", date!(2023 - 10 - 01), DebtStatus::Unpaid),
        debt("10.00", date!(2023 - 12 - 24), DebtStatus::Paid),
        // Outside the window on both sides
        debt("999.00", date!(2023 - 09 - 30), DebtStatus::Unpaid),
        debt("888.00", date!(2024 - 04 - 01), DebtStatus::Paid),
    ];
    let stats = compute_statistics(&debts, TODAY);

    let bucket = |year: i32, month: Month| {
        stats
            .monthly
            .iter()
            .find(|b| b.month == YearMonth::new(year, month))
            .expect("bucket in window")
    };

    assert_eq!(bucket(2024, Month::March).unpaid_amount, dec("100.00"));
    assert_eq!(bucket(2024, Month::March).paid_amount, dec("50.00"));
    assert_eq!(bucket(2023, Month::October).unpaid_amount, dec("25.00"));
    assert_eq!(bucket(2023, Month::December).paid_amount, dec("10.00"));
    assert!(bucket(2024, Month::January).unpaid_amount.is_zero());

    let bucketed: Decimal = stats
        .monthly
        .iter()
        .map(|b| b.unpaid_amount + b.paid_amount)
        .sum();
    assert_eq!(bucketed, dec("185.00"));
    assert!(bucketed < stats.total_unpaid + stats.total_paid);
    assert_eq!(stats.total_count, 6);
}

#[test]
fn buckets_equal_totals_when_every_debt_is_in_window() {
    let debts = vec![
        debt("1.00", date!(2023 - 11 - 05), DebtStatus::Unpaid),
        debt("2.00", date!(2024 - 01 - 05), DebtStatus::Paid),
        debt("3.00", date!(2024 - 03 - 15), DebtStatus::Unpaid),
    ];
    let stats = compute_statistics(&debts, TODAY);
    let bucketed: Decimal = stats
        .monthly
        .iter()
        .map(|b| b.unpaid_amount + b.paid_amount)
        .sum();
    assert_eq!(bucketed, stats.total_unpaid + stats.total_paid);
}

#[test]
fn window_crosses_year_boundary_from_january() {
    let stats = compute_statistics(&[], date!(2024 - 01 - 31));
    assert_eq!(stats.monthly.first().unwrap().month.to_string(), "2023-08");
    assert_eq!(stats.monthly.last().unwrap().month.to_string(), "2024-01");
}

#[test]
fn summary_covers_only_the_given_debts() {
    let debts = vec![
        debt("10.50", TODAY, DebtStatus::Unpaid),
        debt("4.50", TODAY, DebtStatus::Paid),
    ];
    let summary = summarize(&debts);
    assert_eq!(summary.total_amount, dec("15.00"));
    assert_eq!(summary.total_unpaid, dec("10.50"));
    assert_eq!(summary.total_paid, dec("4.50"));
    assert_eq!(summary.unpaid_count, 1);
    assert_eq!(summary.paid_count, 1);
}
