//! Report formatting for terminal output
//!
//! Renders chart aggregates as text bars, the recent-spending summary with
//! its tip, and budget status.

use crate::reports::{ChartData, Recommendation, SpendingSummary};
use crate::services::BudgetOverview;

const BAR_WIDTH: usize = 30;
const LABEL_WIDTH: usize = 18;

/// Format a percentage with precision suited to its size
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A horizontal bar scaled to `max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate to `max_chars` characters, marking the cut with "..."
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        ".".repeat(max_chars)
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

/// Spending by category and by month, as text bar charts
pub fn format_chart_data(data: &ChartData, symbol: &str) -> String {
    if data.is_empty() {
        return "No expenses to chart.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Spending by Category\n");
    output.push_str(&separator(72));
    output.push('\n');

    let max_category = data
        .by_category
        .iter()
        .map(|s| s.amount.as_f64())
        .fold(0.0, f64::max);
    for slice in &data.by_category {
        output.push_str(&format!(
            "{:<label$} {} {:>12} {:>6}\n",
            truncate(&slice.category, LABEL_WIDTH),
            format_bar(slice.amount.as_f64(), max_category, BAR_WIDTH),
            slice.amount.format_with_symbol(symbol),
            format_percentage(slice.percentage),
            label = LABEL_WIDTH
        ));
    }

    output.push_str("\nMonthly Spending\n");
    output.push_str(&separator(72));
    output.push('\n');

    let max_month = data
        .by_month
        .iter()
        .map(|m| m.amount.as_f64())
        .fold(0.0, f64::max);
    for bar in &data.by_month {
        output.push_str(&format!(
            "{:<label$} {} {:>12}\n",
            bar.month,
            format_bar(bar.amount.as_f64(), max_month, BAR_WIDTH),
            bar.amount.format_with_symbol(symbol),
            label = LABEL_WIDTH
        ));
    }

    output.push_str(&separator(72));
    output.push('\n');
    output.push_str(&format!("Total: {}\n", data.total.format_with_symbol(symbol)));
    output
}

/// Recent per-category totals followed by the tip
pub fn format_summary(summary: &SpendingSummary, tip: &Recommendation, symbol: &str) -> String {
    let mut output = format!("Spending from {} to {}\n", summary.start, summary.end);
    output.push_str(&separator(40));
    output.push('\n');

    for (category, amount) in &summary.by_category {
        output.push_str(&format!(
            "{:<24} {:>15}\n",
            truncate(category, 24),
            amount.format_with_symbol(symbol)
        ));
    }
    if !summary.by_category.is_empty() {
        output.push_str(&separator(40));
        output.push('\n');
    }
    output.push_str(&format!(
        "{:<24} {:>15}\n\nTip: {}\n",
        "Total",
        summary.total.format_with_symbol(symbol),
        tip
    ));
    output
}

/// Budgets of one month with spending, remaining amount and usage bar
pub fn format_budget_overview(overview: &BudgetOverview, symbol: &str) -> String {
    let mut output = format!("Budgets for {}\n", overview.period);

    if overview.statuses.is_empty() {
        output.push_str("No budgets set for this month.\n");
    } else {
        output.push_str(&format!(
            "{:<18} {:>12} {:>12} {:>12}  {:<22}\n",
            "Category", "Budget", "Spent", "Remaining", "Used"
        ));
        output.push_str(&separator(80));
        output.push('\n');

        for status in &overview.statuses {
            let marker = if status.is_overspent() { " OVER" } else { "" };
            output.push_str(&format!(
                "{:<18} {:>12} {:>12} {:>12}  {} {}{}\n",
                truncate(&status.budget.category, 18),
                status.budget.amount.format_with_symbol(symbol),
                status.spent.format_with_symbol(symbol),
                status.remaining.format_with_symbol(symbol),
                format_bar(status.percent_used().min(100.0), 100.0, 15),
                format_percentage(status.percent_used()),
                marker
            ));
        }
    }

    output.push_str(&format!(
        "\nTotal spent this month: {}\n",
        overview.total_spent.format_with_symbol(symbol)
    ));
    output
}
