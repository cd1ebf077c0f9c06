use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{CostMethod, Item, UsageLog};

pub(crate) const MS_PER_DAY: i64 = 86_400_000;

/// Whole days from `from` to `to`, rounded toward negative infinity.
pub(crate) fn floor_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.signed_duration_since(from)
        .num_milliseconds()
        .div_euclid(MS_PER_DAY)
}

/// Days an item has been held as of `now`, clamped to a minimum of 1.
///
/// An item held for less than a day (including a same-day or future purchase
/// date) still counts as one day. The clamp is a permanent policy, not a
/// workaround.
pub fn days_since(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    floor_days(date, now).max(1)
}

/// Purchase price minus any resale price, floored at zero.
pub fn net_cost(item: &Item) -> f64 {
    (item.purchase_price - item.sale_price.unwrap_or(0.0)).max(0.0)
}

/// Net cost per recorded use. Undefined (`None`) at zero uses, never zero or
/// infinite.
pub fn cost_per_use(item: &Item, usage_count: usize) -> Option<f64> {
    if usage_count == 0 {
        return None;
    }
    Some(net_cost(item) / usage_count as f64)
}

/// Net cost spread over days owned, to retirement or to `now`.
///
/// Not gated by the item's cost method; callers decide when a per-day figure
/// is meaningful.
pub fn daily_holding_cost(item: &Item, now: DateTime<Utc>) -> f64 {
    let end = item.retired_at.unwrap_or(now);
    let days = floor_days(item.purchase_date, end).max(1);
    net_cost(item) / days as f64
}

/// Sale price as a percentage of purchase price. Zero when the item was not
/// sold (or sold for nothing); unclamped above 100 for a profitable sale.
pub fn recovery_rate(item: &Item) -> f64 {
    match item.sale_price {
        Some(sale) if sale > 0.0 && item.purchase_price > 0.0 => {
            sale / item.purchase_price * 100.0
        }
        _ => 0.0,
    }
}

/// Usage-event count per item id, computed in one pass over the logs.
pub fn usage_counts(logs: &[UsageLog]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for log in logs {
        *counts.entry(log.item_id.as_str()).or_insert(0) += 1;
    }
    counts
}

pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        _ => return format!("{currency} {amount:.2}"),
    };
    format!("{symbol}{amount:.2}")
}

/// Display text for an item's headline cost figure, chosen by cost method.
pub fn cost_label(item: &Item, usage_count: usize, now: DateTime<Utc>) -> String {
    match item.cost_method {
        CostMethod::PerUse => match cost_per_use(item, usage_count) {
            None => "No uses yet".to_string(),
            Some(cost) => format!("{} / use", format_currency(cost, item.currency_code())),
        },
        CostMethod::DailyHolding => format!(
            "{} / day",
            format_currency(daily_holding_cost(item, now), item.currency_code())
        ),
    }
}
