//! Folding transactions into the summary figures shown on the dashboard.
//!
//! All sums accumulate in integer cents so that adding many two-decimal
//! dollar amounts cannot drift the displayed totals.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Duration};

use crate::transaction::{Transaction, TransactionKind};

/// The totals for one reporting period, already scoped to a month by the
/// caller's query.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    /// The sum of income amounts, in dollars.
    pub income: f64,
    /// The sum of expense amounts, in dollars.
    pub expense: f64,
    /// Income minus expenses, in dollars.
    pub balance: f64,
    /// The expense total per category, in dollars.
    pub expense_by_category: HashMap<String, f64>,
}

/// The income and expense totals for one calendar month, used by the cash
/// flow chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCashFlow {
    /// The first day of the month.
    pub month: Date,
    /// A short display label such as "Feb 2026".
    pub label: String,
    /// The sum of income amounts, in dollars.
    pub income: f64,
    /// The sum of expense amounts, in dollars.
    pub expense: f64,
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Reduce a period's transactions into income, expense, and balance totals
/// plus a per-category expense breakdown.
///
/// The transactions are assumed to already be scoped to the reporting
/// period; no date filtering happens here. An empty slice yields all-zero
/// totals and an empty category map.
pub fn summarize_period(transactions: &[Transaction]) -> PeriodSummary {
    let mut income_cents: i64 = 0;
    let mut expense_cents: i64 = 0;
    let mut category_cents: HashMap<&str, i64> = HashMap::new();

    for transaction in transactions {
        let cents = to_cents(transaction.amount);

        match transaction.kind {
            TransactionKind::Income => income_cents += cents,
            TransactionKind::Expense => {
                expense_cents += cents;
                *category_cents
                    .entry(transaction.category.as_str())
                    .or_insert(0) += cents;
            }
        }
    }

    PeriodSummary {
        income: to_dollars(income_cents),
        expense: to_dollars(expense_cents),
        balance: to_dollars(income_cents - expense_cents),
        expense_by_category: category_cents
            .into_iter()
            .map(|(category, cents)| (category.to_owned(), to_dollars(cents)))
            .collect(),
    }
}

/// The expense breakdown as (category, total) pairs, largest total first.
/// Ties break alphabetically so the chart ordering is stable.
pub fn expenses_by_category_sorted(summary: &PeriodSummary) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = summary
        .expense_by_category
        .iter()
        .map(|(category, total)| (category.clone(), *total))
        .collect();

    totals.sort_by(|(category_a, total_a), (category_b, total_b)| {
        to_cents(*total_b)
            .cmp(&to_cents(*total_a))
            .then_with(|| category_a.cmp(category_b))
    });

    totals
}

/// The per-month income and expense totals for the `months` calendar months
/// ending at `end_month`, oldest month first.
///
/// Months without transactions get zero totals so the chart always shows
/// the full window, and transactions outside the window are ignored.
pub fn monthly_cash_flow(
    transactions: &[Transaction],
    end_month: Date,
    months: usize,
) -> Vec<MonthCashFlow> {
    let mut totals: BTreeMap<Date, (i64, i64)> = BTreeMap::new();

    for transaction in transactions {
        let Ok(month) = transaction.date.replace_day(1) else {
            continue;
        };

        let (income_cents, expense_cents) = totals.entry(month).or_insert((0, 0));
        let cents = to_cents(transaction.amount);

        match transaction.kind {
            TransactionKind::Income => *income_cents += cents,
            TransactionKind::Expense => *expense_cents += cents,
        }
    }

    let mut window = Vec::with_capacity(months);
    let mut month = end_month.replace_day(1).unwrap_or(end_month);

    for _ in 0..months {
        window.push(month);
        month = previous_month(month);
    }

    window
        .into_iter()
        .rev()
        .map(|month| {
            let (income_cents, expense_cents) = totals.get(&month).copied().unwrap_or((0, 0));

            MonthCashFlow {
                month,
                label: month_label(month),
                income: to_dollars(income_cents),
                expense: to_dollars(expense_cents),
            }
        })
        .collect()
}

pub(super) fn previous_month(month: Date) -> Date {
    let last_of_previous = month - Duration::days(1);

    last_of_previous.replace_day(1).unwrap_or(last_of_previous)
}

fn month_label(month: Date) -> String {
    let name = month.month().to_string();
    let abbreviation = name.get(..3).unwrap_or(&name);

    format!("{abbreviation} {}", month.year())
}


#[cfg(test)]
mod expenses_by_category_sorted_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::{expenses_by_category_sorted, summarize_period};

    fn expense(amount: f64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            amount,
            date: date!(2026 - 02 - 15),
            description: String::new(),
            kind: TransactionKind::Expense,
            category: category.to_owned(),
            wallet_id: None,
            import_id: None,
        }
    }

    #[test]
    fn largest_total_comes_first() {
        let summary = summarize_period(&[
            expense(10.00, "Food"),
            expense(80.00, "Rent"),
            expense(25.00, "Transport"),
        ]);

        let sorted = expenses_by_category_sorted(&summary);

        assert_eq!(
            sorted,
            vec![
                ("Rent".to_owned(), 80.00),
                ("Transport".to_owned(), 25.00),
                ("Food".to_owned(), 10.00),
            ]
        );
    }

    #[test]
    fn equal_totals_sort_alphabetically() {
        let summary = summarize_period(&[expense(10.00, "Zoo"), expense(10.00, "Art")]);

        let sorted = expenses_by_category_sorted(&summary);

        assert_eq!(sorted[0].0, "Art");
        assert_eq!(sorted[1].0, "Zoo");
    }
}

#[cfg(test)]
mod monthly_cash_flow_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::monthly_cash_flow;

    fn transaction(amount: f64, kind: TransactionKind, date: time::Date) -> Transaction {
        Transaction {
            id: 0,
            amount,
            date,
            description: String::new(),
            kind,
            category: "Other".to_owned(),
            wallet_id: None,
            import_id: None,
        }
    }

    #[test]
    fn groups_by_month_oldest_first() {
        let transactions = [
            transaction(100.00, TransactionKind::Expense, date!(2026 - 02 - 10)),
            transaction(2500.00, TransactionKind::Income, date!(2025 - 12 - 20)),
            transaction(50.00, TransactionKind::Expense, date!(2026 - 02 - 25)),
        ];

        let months = monthly_cash_flow(&transactions, date!(2026 - 02 - 01), 3);

        assert_eq!(months.len(), 3);
        assert_eq!(months[0].month, date!(2025 - 12 - 01));
        assert_eq!(months[0].income, 2500.00);
        assert_eq!(months[0].label, "Dec 2025");
        assert_eq!(months[2].month, date!(2026 - 02 - 01));
        assert_eq!(months[2].expense, 150.00);
        assert_eq!(months[2].label, "Feb 2026");
    }

    #[test]
    fn months_without_transactions_are_zero_filled() {
        let transactions = [transaction(
            100.00,
            TransactionKind::Expense,
            date!(2026 - 02 - 10),
        )];

        let months = monthly_cash_flow(&transactions, date!(2026 - 02 - 15), 3);

        assert_eq!(months[0].month, date!(2025 - 12 - 01));
        assert_eq!(months[0].income, 0.0);
        assert_eq!(months[0].expense, 0.0);
        assert_eq!(months[1].month, date!(2026 - 01 - 01));
        assert_eq!(months[1].expense, 0.0);
        assert_eq!(months[2].expense, 100.00);
    }

    #[test]
    fn transactions_outside_the_window_are_ignored() {
        let transactions = [
            transaction(100.00, TransactionKind::Expense, date!(2025 - 06 - 10)),
            transaction(50.00, TransactionKind::Expense, date!(2026 - 02 - 10)),
        ];

        let months = monthly_cash_flow(&transactions, date!(2026 - 02 - 01), 2);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, date!(2026 - 01 - 01));
        assert_eq!(months[1].expense, 50.00);
    }

    #[test]
    fn empty_input_yields_zeroed_window() {
        let months = monthly_cash_flow(&[], date!(2026 - 02 - 01), 6);

        assert_eq!(months.len(), 6);
        assert_eq!(months[0].month, date!(2025 - 09 - 01));
        assert!(months.iter().all(|month| month.income == 0.0));
        assert!(months.iter().all(|month| month.expense == 0.0));
    }
}
