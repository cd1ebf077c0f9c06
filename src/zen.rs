use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::calc::{floor_days, usage_counts, MS_PER_DAY};
use crate::model::{Item, UsageLog};

/// Strategy behind a dashboard hero pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroKind {
    LongHeld,
    RecentlyUsed,
    MostUsed,
}

/// A single celebrated item for the dashboard header.
#[derive(Debug, Clone, PartialEq)]
pub struct ZenHero<'a> {
    pub id: String,
    pub kind: HeroKind,
    pub title: &'static str,
    pub subtitle: String,
    pub emoji: String,
    pub item: &'a Item,
    pub metric_value: String,
    pub metric_label: &'static str,
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZenStats {
    pub active_items: usize,
    pub retired_items: usize,
    pub total_uses: usize,
    /// Average days held across active items, floored; zero with no items.
    pub avg_days_held: i64,
}

/// Picks index `floor(r^bias * len)`: higher bias skews toward the front of
/// the slice.
fn weighted_pick<'a, T>(slice: &'a [T], bias: f64, rng: &mut impl Rng) -> Option<&'a T> {
    if slice.is_empty() {
        return None;
    }
    let roll: f64 = rng.gen();
    let index = (roll.powf(bias) * slice.len() as f64).floor() as usize;
    slice.get(index.min(slice.len() - 1))
}

/// Selects one active item to celebrate, or `None` when there is nothing to
/// show. The strategy is chosen uniformly; long-held and recently-used picks
/// fall through to most-used when they produce nothing.
pub fn zen_hero<'a>(
    items: &'a [Item],
    logs: &[UsageLog],
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Option<ZenHero<'a>> {
    let active: Vec<&Item> = items.iter().filter(|item| item.is_active()).collect();
    if active.is_empty() {
        return None;
    }

    let strategy = rng.gen_range(0..3u8);

    if strategy == 0 {
        let mut oldest_first = active.clone();
        oldest_first.sort_by_key(|item| item.purchase_date);
        if let Some(item) = weighted_pick(&oldest_first, 1.5, rng) {
            let days_held = floor_days(item.purchase_date, now);
            return Some(ZenHero {
                id: format!("held-{}", item.id),
                kind: HeroKind::LongHeld,
                title: "Longevity Master",
                subtitle: format!("Held for {days_held} days"),
                emoji: item.emoji.clone(),
                item,
                metric_value: days_held.to_string(),
                metric_label: "Days Held",
            });
        }
    }

    if strategy == 1 {
        let mut recent: Vec<&UsageLog> = logs
            .iter()
            .filter(|log| (now - log.date) < Duration::days(7))
            .collect();
        recent.sort_by_key(|log| std::cmp::Reverse(log.date));
        if let Some(log) = weighted_pick(&recent, 1.5, rng) {
            // Skip orphaned logs whose item is gone.
            if let Some(item) = items.iter().find(|item| item.id == log.item_id) {
                let value = if log.date.date_naive() == now.date_naive() {
                    "Today".to_string()
                } else {
                    log.date.format("%b %-d").to_string()
                };
                return Some(ZenHero {
                    id: format!("recent-{}", item.id),
                    kind: HeroKind::RecentlyUsed,
                    title: "Recently Enjoyed",
                    subtitle: "Used recently".to_string(),
                    emoji: item.emoji.clone(),
                    item,
                    metric_value: value,
                    metric_label: "Last Used",
                });
            }
        }
    }

    // Most-used, also the fallback for the other strategies.
    let counts = usage_counts(logs);
    let mut by_usage = active;
    by_usage.sort_by_key(|item| std::cmp::Reverse(counts.get(item.id.as_str()).copied().unwrap_or(0)));
    let item = weighted_pick(&by_usage, 1.5, rng)?;
    let count = counts.get(item.id.as_str()).copied().unwrap_or(0);
    Some(ZenHero {
        id: format!("popular-{}", item.id),
        kind: HeroKind::MostUsed,
        title: "Utility Champion",
        subtitle: format!("Used {count} times"),
        emoji: item.emoji.clone(),
        item,
        metric_value: count.to_string(),
        metric_label: "Total Uses",
    })
}

pub fn zen_stats(items: &[Item], logs: &[UsageLog], now: DateTime<Utc>) -> ZenStats {
    let active_items = items.iter().filter(|item| item.is_active()).count();
    let retired_items = items.len() - active_items;

    let total_ms: i64 = items
        .iter()
        .filter(|item| item.is_active())
        .map(|item| (now - item.purchase_date).num_milliseconds())
        .sum();
    let avg_days_held = if active_items > 0 {
        (total_ms / active_items as i64).div_euclid(MS_PER_DAY)
    } else {
        0
    };

    ZenStats {
        active_items,
        retired_items,
        total_uses: logs.len(),
        avg_days_held,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostMethod, ItemStatus};
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn item(id: &str, purchased_days_ago: i64, status: ItemStatus) -> Item {
        Item {
            id: id.into(),
            name: id.into(),
            category: String::new(),
            purchase_price: 100.0,
            purchase_date: now() - Duration::days(purchased_days_ago),
            cost_method: CostMethod::PerUse,
            emoji: "📦".into(),
            image_uri: None,
            notes: None,
            expiration_date: None,
            status,
            retired_at: None,
            retirement_reason: None,
            sale_price: None,
            currency: None,
            created_at: now(),
        }
    }

    #[test]
    fn no_active_items_yields_no_hero() {
        let items = vec![item("r", 100, ItemStatus::Retired)];
        let mut rng = StepRng::new(0, 0);
        assert!(zen_hero(&items, &[], now(), &mut rng).is_none());
    }

    #[test]
    fn zeroed_rng_picks_the_longest_held_item() {
        // StepRng at zero selects strategy 0 and index 0, so the pick is the
        // oldest active item.
        let items = vec![
            item("young", 10, ItemStatus::Active),
            item("old", 300, ItemStatus::Active),
        ];
        let mut rng = StepRng::new(0, 0);
        let hero = zen_hero(&items, &[], now(), &mut rng).expect("hero");
        assert_eq!(hero.kind, HeroKind::LongHeld);
        assert_eq!(hero.item.id, "old");
        assert_eq!(hero.metric_value, "300");
        assert_eq!(hero.subtitle, "Held for 300 days");
    }

    #[test]
    fn hero_is_always_an_active_item() {
        let items = vec![
            item("a", 5, ItemStatus::Active),
            item("r", 500, ItemStatus::Retired),
        ];
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let hero = zen_hero(&items, &[], now(), &mut rng).expect("hero");
            assert!(hero.item.is_active());
        }
    }

    #[test]
    fn weighted_pick_stays_in_bounds() {
        let values = [1, 2, 3];
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let picked = weighted_pick(&values, 1.5, &mut rng).expect("non-empty");
            assert!(values.contains(picked));
        }
        assert!(weighted_pick::<i32>(&[], 1.5, &mut rng).is_none());
    }

    #[test]
    fn stats_average_covers_active_items_only() {
        let items = vec![
            item("a", 10, ItemStatus::Active),
            item("b", 20, ItemStatus::Active),
            item("r", 500, ItemStatus::Retired),
        ];
        let logs = vec![UsageLog {
            id: "1".into(),
            item_id: "a".into(),
            date: now(),
            notes: None,
        }];

        let stats = zen_stats(&items, &logs, now());
        assert_eq!(stats.active_items, 2);
        assert_eq!(stats.retired_items, 1);
        assert_eq!(stats.total_uses, 1);
        assert_eq!(stats.avg_days_held, 15);
    }

    #[test]
    fn stats_are_zero_for_an_empty_vault() {
        let stats = zen_stats(&[], &[], now());
        assert_eq!(stats.active_items, 0);
        assert_eq!(stats.avg_days_held, 0);
    }
}
