//! Goal and emergency fund display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_bar, format_percentage};
use crate::models::{EmergencyFund, SavingsGoal};

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

pub fn format_goal_list(goals: &[SavingsGoal], symbol: &str) -> String {
    if goals.is_empty() {
        return "No savings goals. Create one with 'budgetwise goal create <name> <target>'.\n"
            .to_string();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.to_string(),
            name: if g.is_achieved() {
                format!("{} ✓", g.name)
            } else {
                g.name.clone()
            },
            saved: g.current_amount.format_with_symbol(symbol),
            target: g.target_amount.format_with_symbol(symbol),
            progress: format!(
                "{} {}",
                format_bar(g.progress_percent(), 100.0, 10),
                format_percentage(g.progress_percent())
            ),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

pub fn format_goal_details(goal: &SavingsGoal, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Goal: {} ({})\n", goal.name, goal.id));
    output.push_str(&format!(
        "  Saved:    {} of {}\n",
        goal.current_amount.format_with_symbol(symbol),
        goal.target_amount.format_with_symbol(symbol)
    ));
    if goal.is_achieved() {
        output.push_str("  Target reached!\n");
    } else {
        output.push_str(&format!(
            "  To go:    {}\n",
            goal.amount_to_go().format_with_symbol(symbol)
        ));
    }
    output
}

/// Balance plus how many months of expenses it covers
pub fn format_emergency_fund(fund: &EmergencyFund, months_of_buffer: f64, symbol: &str) -> String {
    format!(
        "Emergency fund: {} ({:.1} months of expenses)\n",
        fund.balance.format_with_symbol(symbol),
        months_of_buffer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_goal_list() {
        let mut goal = SavingsGoal::new("Vacation", Money::from_rupees(50000));
        goal.deposit(Money::from_rupees(15000));

        let output = format_goal_list(&[goal], "₹");
        assert!(output.contains("Vacation"));
        assert!(output.contains("₹15000.00"));
        assert!(output.contains("30%"));
    }

    #[test]
    fn test_goal_details_when_achieved() {
        let mut goal = SavingsGoal::new("Bike", Money::from_rupees(100));
        goal.deposit(Money::from_rupees(120));

        let output = format_goal_details(&goal, "₹");
        assert!(output.contains("Target reached!"));
        assert!(!output.contains("To go"));
    }

    #[test]
    fn test_emergency_fund() {
        let fund = EmergencyFund::with_balance(Money::from_rupees(2870));
        assert_eq!(
            format_emergency_fund(&fund, 0.287, "₹"),
            "Emergency fund: ₹2870.00 (0.3 months of expenses)\n"
        );
    }
}
