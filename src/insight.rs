use chrono::{DateTime, Utc};

use crate::calc::{cost_per_use, daily_holding_cost, MS_PER_DAY};
use crate::model::{CostMethod, Item, ItemStatus, UsageLog};

/// One item's attributed cost within a queried period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodContributor {
    pub item: Item,
    pub cost: f64,
    /// Usage events that fell inside the period.
    pub uses_in_period: usize,
}

/// Per-period cost attribution, split by cost method.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodBreakdown {
    /// Per-use items, sorted descending by attributed cost.
    pub usage: Vec<PeriodContributor>,
    /// Daily-holding items, sorted descending by attributed cost.
    pub holding: Vec<PeriodContributor>,
    pub usage_total: f64,
    pub holding_total: f64,
}

/// Attributes cost to each item active during `[start, end]`.
///
/// Daily-holding items contribute their holding rate times the overlap of
/// their ownership span with the period; per-use items contribute their
/// lifetime cost-per-use times the uses logged inside the period. Each item
/// lands in exactly one bucket, and items contributing nothing are omitted.
pub fn attribute_period(
    items: &[Item],
    logs: &[UsageLog],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> PeriodBreakdown {
    let mut breakdown = PeriodBreakdown::default();

    for item in items {
        let overlaps_period = item.purchase_date <= end
            && match item.status {
                ItemStatus::Active => true,
                ItemStatus::Retired => item.retired_at.is_some_and(|at| at >= start),
            };

        let mut holding_cost = 0.0;
        if overlaps_period {
            let item_end = item.retired_at.unwrap_or(end);
            let actual_start = start.max(item.purchase_date);
            let actual_end = end.min(item_end);
            if actual_start < actual_end {
                let ms = (actual_end - actual_start).num_milliseconds();
                let overlap_days = ((ms + MS_PER_DAY - 1) / MS_PER_DAY).max(1);
                holding_cost = daily_holding_cost(item, now) * overlap_days as f64;
            }
        }

        let uses_in_period = logs
            .iter()
            .filter(|log| log.item_id == item.id && log.date >= start && log.date <= end)
            .count();

        match item.cost_method {
            CostMethod::DailyHolding => {
                if holding_cost > 0.0 {
                    breakdown.holding_total += holding_cost;
                    breakdown.holding.push(PeriodContributor {
                        item: item.clone(),
                        cost: holding_cost,
                        uses_in_period,
                    });
                }
            }
            CostMethod::PerUse => {
                if uses_in_period > 0 {
                    let lifetime_uses = logs.iter().filter(|log| log.item_id == item.id).count();
                    let cost =
                        cost_per_use(item, lifetime_uses).unwrap_or(0.0) * uses_in_period as f64;
                    if cost > 0.0 {
                        breakdown.usage_total += cost;
                        breakdown.usage.push(PeriodContributor {
                            item: item.clone(),
                            cost,
                            uses_in_period,
                        });
                    }
                }
            }
        }
    }

    let by_cost_desc = |a: &PeriodContributor, b: &PeriodContributor| {
        b.cost
            .partial_cmp(&a.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    breakdown.usage.sort_by(by_cost_desc);
    breakdown.holding.sort_by(by_cost_desc);

    breakdown
}
