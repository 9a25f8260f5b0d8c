//! Budget insights
//!
//! Health score, spending insights, recommendations and a savings prediction,
//! all derived from one ledger snapshot and that month's transactions. Nothing
//! here mutates state: the inputs are taken once under the ledger lock and
//! every result is computed from that copy.

use serde::Serialize;

use crate::error::BudgetResult;
use crate::ledger::LedgerSnapshot;
use crate::models::{Bundle, BudgetMonth, BundleKey, Money, Transaction, UserId};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Average meal spend above which a suggestion is made
pub const DEFAULT_MEAL_COST_THRESHOLD: Money = Money::from_rupees(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleKey>,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Negative,
    Neutral,
    Positive,
    /// A targeted tip rather than an overall verdict
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tone: Tone,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPrediction {
    /// Remaining across meals, groceries and rent
    pub current_remaining: Money,
    /// What could move into the emergency fund at month end
    pub potential_emergency_fund: Money,
    /// `current_remaining` as a percentage of income; zero without income
    pub savings_percentage: f64,
}

/// Read-only analytics over one month
pub struct InsightsEngine {
    snapshot: LedgerSnapshot,
    transactions: Vec<Transaction>,
    meal_cost_threshold: Money,
}

impl InsightsEngine {
    pub fn new(snapshot: LedgerSnapshot, transactions: Vec<Transaction>) -> Self {
        Self {
            snapshot,
            transactions,
            meal_cost_threshold: DEFAULT_MEAL_COST_THRESHOLD,
        }
    }

    /// Take a consistent snapshot of a month's ledger and transactions
    pub fn load(storage: &Storage, user: &UserId, month: BudgetMonth) -> BudgetResult<Self> {
        storage.locks().with_lock(user, month, || {
            let snapshot = LedgerSnapshot::from(BudgetService::new(storage).budget(user, month)?);
            let transactions = storage.store().list_transactions(user, month)?;
            Ok(Self::new(snapshot, transactions))
        })
    }

    pub fn with_meal_cost_threshold(mut self, threshold: Money) -> Self {
        self.meal_cost_threshold = threshold;
        self
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    fn variable_bundles(&self) -> impl Iterator<Item = &Bundle> {
        BundleKey::VARIABLE
            .iter()
            .filter_map(|k| BundleKey::new(k).ok())
            .filter_map(move |k| self.snapshot.bundle(&k))
    }

    /// Savings bundle exists and nothing has left it
    fn savings_untouched(&self) -> bool {
        self.snapshot
            .bundle(&BundleKey::savings())
            .is_some_and(|b| b.is_untouched())
    }

    /// 0-100 composite score
    ///
    /// Starts at 100. Each variable bundle over 100% spent costs 10, one over
    /// 90% (but not over 100%) costs 5. An untouched savings bundle adds 10.
    pub fn health_score(&self) -> u8 {
        let mut score: i64 = 100;

        for bundle in self.variable_bundles() {
            if bundle.used_more_than(100) {
                score -= 10;
            } else if bundle.used_more_than(90) {
                score -= 5;
            }
        }

        if self.savings_untouched() {
            score += 10;
        }

        score.clamp(0, 100) as u8
    }

    pub fn spending_insights(&self) -> Vec<Insight> {
        let mut insights: Vec<Insight> = self
            .variable_bundles()
            .filter(|b| b.used_more_than(90))
            .map(|b| Insight {
                kind: InsightKind::Warning,
                bundle: Some(b.key.clone()),
                message: format!("{} is over 90% spent", b.key.title()),
                action: "Reduce spending or adjust budget".to_string(),
            })
            .collect();

        if self.savings_untouched() {
            insights.push(Insight {
                kind: InsightKind::Success,
                bundle: Some(BundleKey::savings()),
                message: "You haven't touched savings this month".to_string(),
                action: "Keep protecting your emergency fund".to_string(),
            });
        }

        if !self.transactions.is_empty() {
            let count = self.transactions.len();
            let total: Money = self.transactions.iter().map(|t| t.amount).sum();
            insights.push(Insight {
                kind: InsightKind::Info,
                bundle: None,
                message: format!("Average transaction: {}", total.split_evenly(count as i64)),
                action: format!("You made {} transactions this month", count),
            });
        }

        insights
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        let score = self.health_score();
        let mut recommendations = vec![if score < 50 {
            Recommendation {
                tone: Tone::Negative,
                message: "Your budget health is low. Consider reducing spending.".to_string(),
            }
        } else if score < 75 {
            Recommendation {
                tone: Tone::Neutral,
                message: "Your budget could be better. Focus on one category.".to_string(),
            }
        } else {
            Recommendation {
                tone: Tone::Positive,
                message: "Excellent budget management! Keep it up!".to_string(),
            }
        }];

        if let Some(average) = self.average_meal_cost() {
            if average > self.meal_cost_threshold {
                recommendations.push(Recommendation {
                    tone: Tone::Suggestion,
                    message: format!(
                        "Your average meal cost is {}. Try cooking at home?",
                        average
                    ),
                });
            }
        }

        recommendations
    }

    /// Meals spent divided by the number of payments charged to meals
    ///
    /// `None` when nothing was spent or no payment is charged to meals.
    pub fn average_meal_cost(&self) -> Option<Money> {
        let meals = BundleKey::meals();
        let spent = self.snapshot.bundle(&meals)?.spent();
        let count = self
            .transactions
            .iter()
            .filter(|t| t.is_categorized_to(&meals))
            .count();

        if !spent.is_positive() || count == 0 {
            return None;
        }
        Some(spent.split_evenly(count as i64))
    }

    pub fn predict_savings(&self) -> SavingsPrediction {
        let remaining = self.snapshot.variable_remaining();
        SavingsPrediction {
            current_remaining: remaining,
            potential_emergency_fund: remaining,
            savings_percentage: remaining.percent_of(self.snapshot.income()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Budget;

    fn rupees(r: i64) -> Money {
        Money::from_rupees(r)
    }

    fn bundle(k: &str, allocated: i64, remaining: i64) -> Bundle {
        let mut b = Bundle::new(BundleKey::new(k).unwrap(), rupees(allocated));
        b.remaining = rupees(remaining);
        b
    }

    fn engine(bundles: Vec<Bundle>, transactions: Vec<Transaction>) -> InsightsEngine {
        InsightsEngine::new(
            LedgerSnapshot::from(Budget::from_bundles(rupees(45000), bundles)),
            transactions,
        )
    }

    fn paid(k: &str, amount: i64) -> Transaction {
        Transaction::completed("Shop", rupees(amount), BundleKey::new(k).unwrap(), "")
    }

    fn sample_bundles() -> Vec<Bundle> {
        vec![
            bundle("meals", 8000, 7800),
            bundle("groceries", 6000, 5920),
            bundle("rent", 25000, 25000),
            bundle("savings", 6000, 6000),
        ]
    }

    #[test]
    fn test_health_score_on_sample_month() {
        // Nothing near its limit and savings untouched; clamps at 100
        assert_eq!(engine(sample_bundles(), Vec::new()).health_score(), 100);
    }

    #[test]
    fn test_health_score_penalties() {
        let engine = engine(
            vec![
                bundle("meals", 8000, 0),
                bundle("groceries", 6000, 500),
                bundle("rent", 25000, -100),
                bundle("savings", 6000, 5999),
            ],
            Vec::new(),
        );
        // meals at exactly 100% and groceries at 91.7% cost 5 each, rent
        // over 100% costs 10, savings was touched so no bonus
        assert_eq!(engine.health_score(), 80);
    }

    #[test]
    fn test_health_score_ignores_zero_allocation() {
        let engine = engine(vec![bundle("meals", 0, 0)], Vec::new());
        assert_eq!(engine.health_score(), 100);
    }

    #[test]
    fn test_health_score_always_in_range() {
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 40_000) as i64 - 10_000
        };

        for _ in 0..300 {
            let bundles = vec![
                bundle("meals", next().abs(), next()),
                bundle("groceries", next().abs(), next()),
                bundle("rent", next().abs(), next()),
                bundle("savings", next().abs(), next()),
            ];
            let score = engine(bundles, Vec::new()).health_score();
            assert!(score <= 100);
        }

        let worst = engine(
            vec![
                bundle("meals", 1, -10),
                bundle("groceries", 1, -10),
                bundle("rent", 1, -10),
            ],
            Vec::new(),
        );
        assert_eq!(worst.health_score(), 70);
    }

    #[test]
    fn test_spending_insights() {
        let engine = engine(
            vec![
                bundle("meals", 8000, 700),
                bundle("groceries", 6000, 5000),
                bundle("savings", 6000, 6000),
            ],
            vec![paid("meals", 7300), paid("groceries", 1000)],
        );

        let insights = engine.spending_insights();

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].bundle, Some(BundleKey::meals()));
        assert_eq!(insights[1].kind, InsightKind::Success);
        assert_eq!(insights[2].kind, InsightKind::Info);
        assert!(insights[2].message.contains("₹4150.00"));
        assert!(insights[2].action.contains("2 transactions"));
    }

    #[test]
    fn test_no_info_insight_without_transactions() {
        let insights = engine(vec![bundle("savings", 6000, 100)], Vec::new()).spending_insights();
        assert!(insights.is_empty());
    }

    #[test]
    fn test_recommendation_tiers() {
        let good = engine(sample_bundles(), Vec::new()).recommendations();
        assert_eq!(good[0].tone, Tone::Positive);

        // 100 - 10 - 10 - 10 = 70, no savings bonus
        let fair = engine(
            vec![
                bundle("meals", 100, -1),
                bundle("groceries", 100, -1),
                bundle("rent", 100, -1),
            ],
            Vec::new(),
        )
        .recommendations();
        assert_eq!(fair[0].tone, Tone::Neutral);
    }

    #[test]
    fn test_recommendation_tier_boundaries() {
        // exactly 75 is positive
        let at_75 = engine(
            vec![
                bundle("meals", 100, -1),
                bundle("groceries", 100, -1),
                bundle("rent", 100, 5),
            ],
            Vec::new(),
        );
        assert_eq!(at_75.health_score(), 75);
        assert_eq!(at_75.recommendations()[0].tone, Tone::Positive);
    }

    #[test]
    fn test_meal_cost_suggestion() {
        // 1000 spent over 2 meal payments: 500 average
        let expensive = engine(
            vec![bundle("meals", 8000, 7000)],
            vec![paid("meals", 600), paid("meals", 400), paid("groceries", 50)],
        );
        assert_eq!(expensive.average_meal_cost(), Some(rupees(500)));
        let recs = expensive.recommendations();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].tone, Tone::Suggestion);

        // Same spend under a higher threshold
        let relaxed = engine(
            vec![bundle("meals", 8000, 7000)],
            vec![paid("meals", 600), paid("meals", 400)],
        )
        .with_meal_cost_threshold(rupees(600));
        assert_eq!(relaxed.recommendations().len(), 1);
    }

    #[test]
    fn test_meal_average_without_meal_transactions() {
        let engine = engine(vec![bundle("meals", 8000, 7000)], vec![paid("rent", 100)]);
        assert_eq!(engine.average_meal_cost(), None);
        assert_eq!(engine.recommendations().len(), 1);
    }

    #[test]
    fn test_pending_payments_do_not_count_as_meals() {
        let pending = Transaction::pending("Cafe", rupees(900), "");
        let engine = engine(vec![bundle("meals", 8000, 7100)], vec![pending]);
        assert_eq!(engine.average_meal_cost(), None);
    }

    #[test]
    fn test_predict_savings() {
        let prediction = engine(sample_bundles(), Vec::new()).predict_savings();

        assert_eq!(prediction.current_remaining, rupees(38720));
        assert_eq!(prediction.potential_emergency_fund, rupees(38720));
        assert!((prediction.savings_percentage - 86.044).abs() < 0.01);
    }

    #[test]
    fn test_predict_savings_without_income() {
        let engine = InsightsEngine::new(
            LedgerSnapshot::from(Budget::from_bundles(
                Money::zero(),
                vec![bundle("meals", 0, 0)],
            )),
            Vec::new(),
        );
        assert_eq!(engine.predict_savings().savings_percentage, 0.0);
    }
}
