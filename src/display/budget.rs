//! Budget display formatting
//!
//! Bundle tables, monthly statistics and the spending trend.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::{format_bar, format_money_colored, format_percentage, separator};
use crate::ledger::LedgerSnapshot;
use crate::models::BudgetMonth;
use crate::services::{MonthlyStats, SpendingBreakdown};

#[derive(Tabled)]
struct BundleRow {
    #[tabled(rename = "Bundle")]
    bundle: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Format a month's bundles as a table with usage bars
pub fn format_budget(snapshot: &LedgerSnapshot, month: BudgetMonth, symbol: &str) -> String {
    let rows: Vec<BundleRow> = snapshot
        .bundles()
        .map(|b| {
            let lock = if b.protected { " (protected)" } else { "" };
            BundleRow {
                bundle: format!("{}{}", b.key.title(), lock),
                allocated: b.allocated.format_with_symbol(symbol),
                remaining: b.remaining.format_with_symbol(symbol),
                used: format_percentage(b.percent_used()),
                bar: format_bar(b.percent_used(), 100.0, 10),
            }
        })
        .collect();

    let mut output = String::new();
    output.push_str(&format!("Budget for {}\n", month.friendly()));
    output.push_str(&format!(
        "Income: {}   Allocated: {}   Remaining: {}\n\n",
        snapshot.income().format_with_symbol(symbol),
        snapshot.total_allocated().format_with_symbol(symbol),
        snapshot.total_remaining().format_with_symbol(symbol)
    ));

    if rows.is_empty() {
        output.push_str("No bundles.\n");
        return output;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    output.push_str(&table);
    output.push('\n');

    let unallocated = snapshot.budget().unallocated();
    if unallocated.is_positive() {
        output.push_str(&format!(
            "\nUnallocated income: {}\n",
            unallocated.format_with_symbol(symbol)
        ));
    }

    output
}

/// Format the totals for one month
pub fn format_monthly_stats(stats: &MonthlyStats, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Statistics for {}\n", stats.month.friendly()));
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!(
        "Income:            {}\n",
        stats.income.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Allocated:         {}\n",
        stats.total_allocated.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Spent:             {}\n",
        stats.total_spent.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Remaining:         {}\n",
        format_money_colored(stats.total_remaining, symbol)
    ));
    output.push_str(&format!("Transactions:      {}\n", stats.transaction_count));
    if stats.pending_count > 0 {
        output.push_str(&format!("  awaiting bundle: {}\n", stats.pending_count));
    }
    output.push_str(&format!("Bundles touched:   {}\n", stats.bundles_touched));

    output
}

#[derive(Tabled)]
struct SpendingRow {
    #[tabled(rename = "Bundle")]
    bundle: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Payments")]
    count: usize,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

/// Format per-bundle spending, with pending payments listed separately
pub fn format_spending_breakdown(breakdown: &SpendingBreakdown, symbol: &str) -> String {
    let rows: Vec<SpendingRow> = breakdown
        .bundles
        .iter()
        .map(|b| SpendingRow {
            bundle: b.bundle.title(),
            spent: b.spent.format_with_symbol(symbol),
            count: b.transaction_count,
            remaining: b.remaining.format_with_symbol(symbol),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');

    if breakdown.uncategorized.is_positive() {
        output.push_str(&format!(
            "Awaiting categorization: {}\n",
            breakdown.uncategorized.format_with_symbol(symbol)
        ));
    }

    output
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Payments")]
    count: usize,
}

/// Format a spending trend, oldest month first
pub fn format_trend(trend: &[MonthlyStats], symbol: &str) -> String {
    if trend.is_empty() {
        return "No budgets found for the requested months.\n".to_string();
    }

    let rows: Vec<TrendRow> = trend
        .iter()
        .map(|s| TrendRow {
            month: s.month.to_string(),
            income: s.income.format_with_symbol(symbol),
            spent: s.total_spent.format_with_symbol(symbol),
            remaining: s.total_remaining.format_with_symbol(symbol),
            count: s.transaction_count,
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}
