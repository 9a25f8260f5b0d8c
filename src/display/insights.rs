//! Insights display formatting

use super::report::{format_bar, format_percentage};
use crate::services::{
    DailyBudget, Insight, InsightKind, LowBalanceWarning, Recommendation, SavingsPrediction,
    Tone, WarningSeverity,
};

/// Format the health score with a bar and a one-word rating
pub fn format_health_score(score: u8) -> String {
    let rating = match score {
        90..=100 => "excellent",
        75..=89 => "good",
        50..=74 => "fair",
        _ => "poor",
    };
    format!(
        "Budget health: {}/100 {} ({})\n",
        score,
        format_bar(f64::from(score), 100.0, 20),
        rating
    )
}

pub fn format_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "No insights yet. Record a few payments first.\n".to_string();
    }

    let mut output = String::new();
    for insight in insights {
        let icon = match insight.kind {
            InsightKind::Warning => "⚠",
            InsightKind::Success => "✓",
            InsightKind::Info => "ℹ",
        };
        output.push_str(&format!("{} {}\n", icon, insight.message));
        output.push_str(&format!("    → {}\n", insight.action));
    }
    output
}

pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    let mut output = String::new();
    for rec in recommendations {
        let icon = match rec.tone {
            Tone::Negative => "✗",
            Tone::Neutral => "•",
            Tone::Positive => "✓",
            Tone::Suggestion => "💡",
        };
        output.push_str(&format!("{} {}\n", icon, rec.message));
    }
    output
}

pub fn format_savings_prediction(prediction: &SavingsPrediction, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Left in meals, groceries and rent: {}\n",
        prediction.current_remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Could move to emergency fund:      {}\n",
        prediction.potential_emergency_fund.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Share of income:                   {}\n",
        format_percentage(prediction.savings_percentage)
    ));
    output
}

pub fn format_warnings(warnings: &[LowBalanceWarning], symbol: &str) -> String {
    if warnings.is_empty() {
        return "All bundles have at least 10% left.\n".to_string();
    }

    let mut output = String::new();
    for warning in warnings {
        let label = match warning.severity {
            WarningSeverity::Critical => "CRITICAL",
            WarningSeverity::Warning => "WARNING",
        };
        output.push_str(&format!(
            "{:8} {}: {} of {} left\n",
            label,
            warning.bundle.title(),
            warning.remaining.format_with_symbol(symbol),
            warning.allocated.format_with_symbol(symbol)
        ));
    }
    output
}

pub fn format_daily_budget(daily: &DailyBudget, symbol: &str) -> String {
    if daily.days_left <= 0 {
        return format!(
            "{}: the month is over ({} left)\n",
            daily.bundle.title(),
            daily.total_remaining.format_with_symbol(symbol)
        );
    }

    format!(
        "{}: {} per day for {} days ({} left)\n",
        daily.bundle.title(),
        daily.daily_budget.format_with_symbol(symbol),
        daily.days_left,
        daily.total_remaining.format_with_symbol(symbol)
    )
}
