use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::calc::{cost_per_use, daily_holding_cost, days_since, usage_counts};
use crate::model::{CostMethod, Item, SortDirection, SortOption, UsageLog};

/// Orders items by the chosen metric.
///
/// Items whose cost method makes the metric inapplicable (use-based metrics
/// for daily-holding items, daily cost for per-use items) form a mismatched
/// group that is always ranked after the primary group, in either direction.
/// The sort is stable: equal-value items keep their input order.
pub fn sort_items(
    items: &[Item],
    logs: &[UsageLog],
    option: SortOption,
    direction: SortDirection,
    now: DateTime<Utc>,
) -> Vec<Item> {
    let counts = usage_counts(logs);

    let sort_key = |item: &Item| -> f64 {
        let usage_count = counts.get(item.id.as_str()).copied().unwrap_or(0);
        match option {
            SortOption::DaysHeld => days_since(item.purchase_date, now) as f64,
            SortOption::TotalUses => usage_count as f64,
            SortOption::PurchaseCost => item.purchase_price,
            SortOption::DailyCost => daily_holding_cost(item, now),
            SortOption::CostPerUse => match cost_per_use(item, usage_count) {
                Some(value) => value,
                // Undefined cost sorts to the end in either direction.
                None => match direction {
                    SortDirection::Asc => f64::INFINITY,
                    SortDirection::Desc => -1.0,
                },
            },
        }
    };

    let mismatched = |item: &Item| {
        matches!(
            (option, item.cost_method),
            (SortOption::TotalUses, CostMethod::DailyHolding)
                | (SortOption::CostPerUse, CostMethod::DailyHolding)
                | (SortOption::DailyCost, CostMethod::PerUse)
        )
    };

    let mut primary: Vec<(f64, &Item)> = Vec::new();
    let mut closed: Vec<(f64, &Item)> = Vec::new();
    for item in items {
        let decorated = (sort_key(item), item);
        if mismatched(item) {
            closed.push(decorated);
        } else {
            primary.push(decorated);
        }
    }

    let compare = |a: &(f64, &Item), b: &(f64, &Item)| -> Ordering {
        let ordering = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    };
    primary.sort_by(compare);
    closed.sort_by(compare);

    primary
        .into_iter()
        .chain(closed)
        .map(|(_, item)| item.clone())
        .collect()
}
