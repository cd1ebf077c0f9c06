use chrono::{DateTime, Utc};

use crate::calc::floor_days;
use crate::model::{Item, UsageLog};

/// An achievement badge with unlock state and progress toward it.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
    /// Fraction of the threshold reached, capped at 1.
    pub progress: f64,
    pub display_progress: String,
}

/// Computes the badge set from the current vault. Day counts come from the
/// oldest active item; use counts from all logs.
pub fn badges(items: &[Item], logs: &[UsageLog], now: DateTime<Utc>) -> Vec<Badge> {
    let active: Vec<&Item> = items.iter().filter(|item| item.is_active()).collect();
    let item_count = active.len();

    let max_days_held = active
        .iter()
        .map(|item| floor_days(item.purchase_date, now))
        .max()
        .unwrap_or(0);
    let total_uses = logs.len();

    vec![
        Badge {
            id: "commitment",
            title: "Commitment",
            description: "Hold an item for 1 month",
            icon: "🌱",
            unlocked: max_days_held >= 30,
            progress: (max_days_held as f64 / 30.0).min(1.0),
            display_progress: format!("{max_days_held}/30 days"),
        },
        Badge {
            id: "longevity",
            title: "Longevity",
            description: "Hold an item for 1 year",
            icon: "🌳",
            unlocked: max_days_held >= 365,
            progress: (max_days_held as f64 / 365.0).min(1.0),
            display_progress: format!("{max_days_held}/365 days"),
        },
        Badge {
            id: "collector",
            title: "Collector",
            description: "Own 10+ items",
            icon: "🎒",
            unlocked: item_count >= 10,
            progress: (item_count as f64 / 10.0).min(1.0),
            display_progress: format!("{item_count}/10 items"),
        },
        Badge {
            id: "power_user",
            title: "Power User",
            description: "Log 100+ uses",
            icon: "⚡",
            unlocked: total_uses >= 100,
            progress: (total_uses as f64 / 100.0).min(1.0),
            display_progress: format!("{total_uses}/100 uses"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostMethod, ItemStatus};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn item(id: &str, purchased_days_ago: i64, status: ItemStatus) -> Item {
        Item {
            id: id.into(),
            name: id.into(),
            category: String::new(),
            purchase_price: 10.0,
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

    fn find<'a>(badges: &'a [Badge], id: &str) -> &'a Badge {
        badges.iter().find(|b| b.id == id).expect("badge present")
    }

    #[test]
    fn holding_badges_track_the_oldest_active_item() {
        let items = vec![
            item("young", 15, ItemStatus::Active),
            item("old", 400, ItemStatus::Retired),
        ];
        let all = badges(&items, &[], now());

        let commitment = find(&all, "commitment");
        assert!(!commitment.unlocked, "retired items do not count");
        assert_eq!(commitment.progress, 0.5);
        assert_eq!(commitment.display_progress, "15/30 days");

        let longevity = find(&all, "longevity");
        assert!(!longevity.unlocked);
    }

    #[test]
    fn longevity_unlocks_at_a_year() {
        let items = vec![item("old", 365, ItemStatus::Active)];
        let all = badges(&items, &[], now());
        assert!(find(&all, "longevity").unlocked);
        assert_eq!(find(&all, "longevity").progress, 1.0);
        assert!(find(&all, "commitment").unlocked);
    }

    #[test]
    fn collector_counts_active_items() {
        let items: Vec<Item> = (0..10)
            .map(|i| item(&format!("i{i}"), 1, ItemStatus::Active))
            .collect();
        let all = badges(&items, &[], now());
        assert!(find(&all, "collector").unlocked);
    }

    #[test]
    fn power_user_counts_all_logs() {
        let logs: Vec<UsageLog> = (0..40)
            .map(|i| UsageLog {
                id: i.to_string(),
                item_id: "a".into(),
                date: now(),
                notes: None,
            })
            .collect();
        let all = badges(&[item("a", 1, ItemStatus::Active)], &logs, now());
        let power = find(&all, "power_user");
        assert!(!power.unlocked);
        assert_eq!(power.progress, 0.4);
        assert_eq!(power.display_progress, "40/100 uses");
    }

    #[test]
    fn empty_vault_produces_locked_badges() {
        let all = badges(&[], &[], now());
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|badge| !badge.unlocked));
    }
}
