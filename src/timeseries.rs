use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::calc::floor_days;
use crate::model::{Item, ItemStatus};

/// Lookback window selector for the holding-cost-rate chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1W")]
    Week,
    #[serde(rename = "1M")]
    Month,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    Year,
    All,
}

impl TimeRange {
    // `All` is capped at the same 365-day lookback as `Year`; preserved
    // as-is pending product clarification.
    fn lookback_days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::Year | TimeRange::All => 365,
        }
    }

    fn bin_count(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 15,
            TimeRange::ThreeMonths | TimeRange::Year | TimeRange::All => 12,
        }
    }
}

/// One fixed-width interval of the aggregated series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBin {
    pub label: String,
    /// Portfolio-wide average daily holding cost as of the bin's end.
    pub value: f64,
    /// Start of day, inclusive.
    pub start: DateTime<Utc>,
    /// End of day, inclusive.
    pub end: DateTime<Utc>,
    /// Purchase annotation when items were bought within the bin.
    pub event: Option<String>,
}

fn start_of_day(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .expect("midnight is always representable")
}

fn end_of_day(t: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(t) + Duration::days(1) - Duration::milliseconds(1)
}

/// Buckets the portfolio into `bin_count` bins walking back from `now` and
/// computes the average daily cost rate per bin, oldest bin first.
///
/// The rate is total purchase cost of every item owned by the bin's end,
/// divided by their accumulated held days (to the bin end, or to retirement
/// if earlier). This is a portfolio-wide average, not a per-item series.
pub fn holding_rate_series(items: &[Item], range: TimeRange, now: DateTime<Utc>) -> Vec<ChartBin> {
    let bin_count = range.bin_count();
    let interval_days = (range.lookback_days() + bin_count - 1) / bin_count;
    let interval_days = interval_days.max(1);
    let today_end = end_of_day(now);

    let mut bins = Vec::with_capacity(bin_count as usize);
    for i in (0..bin_count).rev() {
        let end = today_end - Duration::days(i * interval_days);
        let start = start_of_day(end - Duration::days(interval_days - 1));

        let mut total_cost = 0.0;
        let mut total_days = 0i64;
        for item in items {
            if item.purchase_date > end {
                continue;
            }
            let mut effective_end = end;
            if item.status == ItemStatus::Retired {
                if let Some(retired_at) = item.retired_at {
                    if retired_at < end {
                        effective_end = retired_at;
                    }
                }
            }
            total_cost += item.purchase_price;
            total_days += floor_days(item.purchase_date, effective_end).max(1);
        }
        let value = if total_days > 0 {
            total_cost / total_days as f64
        } else {
            0.0
        };

        let label = if interval_days == 1 {
            end.format("%a").to_string()
        } else {
            end.format("%b %-d").to_string()
        };

        let purchased: Vec<&Item> = items
            .iter()
            .filter(|item| item.purchase_date >= start && item.purchase_date <= end)
            .collect();
        let event = purchased.first().map(|first| {
            if purchased.len() > 1 {
                format!(
                    "Purchased {} {} +{} more",
                    first.emoji,
                    first.name,
                    purchased.len() - 1
                )
            } else {
                format!("Purchased {} {}", first.emoji, first.name)
            }
        });

        bins.push(ChartBin {
            label,
            value,
            start,
            end,
            event,
        });
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CostMethod;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // A Sunday.
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn item(id: &str, price: f64, purchase: DateTime<Utc>) -> Item {
        Item {
            id: id.into(),
            name: id.into(),
            category: String::new(),
            purchase_price: price,
            purchase_date: purchase,
            cost_method: CostMethod::DailyHolding,
            emoji: "📦".into(),
            image_uri: None,
            notes: None,
            expiration_date: None,
            status: ItemStatus::Active,
            retired_at: None,
            retirement_reason: None,
            sale_price: None,
            currency: None,
            created_at: purchase,
        }
    }

    #[test]
    fn week_window_produces_seven_single_day_bins_ending_today() {
        let bins = holding_rate_series(&[], TimeRange::Week, now());
        assert_eq!(bins.len(), 7);

        let last = bins.last().expect("seven bins");
        assert_eq!(last.end, Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap() + Duration::milliseconds(999));
        assert_eq!(bins[0].start, Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap());

        for window in bins.windows(2) {
            assert_eq!(
                window[1].start - window[0].start,
                Duration::days(1),
                "bins are contiguous single days"
            );
        }
        for bin in &bins {
            assert_eq!(bin.end - bin.start, Duration::days(1) - Duration::milliseconds(1));
        }
    }

    #[test]
    fn single_day_bins_use_weekday_labels() {
        let bins = holding_rate_series(&[], TimeRange::Week, now());
        assert_eq!(bins.last().expect("bins").label, "Sun");
        assert_eq!(bins[0].label, "Mon");
    }

    #[test]
    fn all_window_matches_year_lookback() {
        let year = holding_rate_series(&[], TimeRange::Year, now());
        let all = holding_rate_series(&[], TimeRange::All, now());
        assert_eq!(year.len(), 12);
        assert_eq!(all.len(), 12);
        assert_eq!(year[0].start, all[0].start);
        assert_eq!(year.last().map(|b| b.end), all.last().map(|b| b.end));
    }

    #[test]
    fn bin_value_is_total_cost_over_total_days() {
        // Purchased 10 days before the final bin's end; held 10 full days by
        // then, so the last bin's rate is 100 / 10.
        let purchase = start_of_day(now()) - Duration::days(10) + Duration::hours(23) + Duration::minutes(59);
        let items = vec![item("a", 100.0, purchase)];
        let bins = holding_rate_series(&items, TimeRange::Week, now());

        let last = bins.last().expect("bins");
        assert_eq!(last.value, 10.0);
    }

    #[test]
    fn items_purchased_after_a_bin_are_excluded_from_it() {
        let items = vec![item("a", 100.0, now())];
        let bins = holding_rate_series(&items, TimeRange::Week, now());

        assert_eq!(bins[0].value, 0.0, "first bin predates the purchase");
        let last = bins.last().expect("bins");
        assert!(last.value > 0.0, "purchase day contributes one held day");
        assert_eq!(last.value, 100.0);
    }

    #[test]
    fn retirement_freezes_held_days_for_later_bins() {
        let mut retired = item("a", 100.0, now() - Duration::days(30));
        retired.status = ItemStatus::Retired;
        retired.retired_at = Some(now() - Duration::days(20));

        let bins = holding_rate_series(&[retired], TimeRange::Week, now());
        // Held days are frozen at retirement, so every bin in the window sees
        // the same 10-day span.
        for bin in &bins {
            assert_eq!(bin.value, 10.0);
        }
    }

    #[test]
    fn purchase_events_are_annotated_with_overflow_count() {
        let items = vec![
            item("Kettle", 40.0, now() - Duration::hours(1)),
            item("Mug", 10.0, now() - Duration::hours(2)),
            item("Older", 10.0, now() - Duration::days(30)),
        ];
        let bins = holding_rate_series(&items, TimeRange::Week, now());

        let last = bins.last().expect("bins");
        assert_eq!(last.event.as_deref(), Some("Purchased 📦 Kettle +1 more"));
        assert!(bins[0].event.is_none());
    }
}
