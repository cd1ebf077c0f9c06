use chrono::{DateTime, Utc};

use crate::calc::days_since;
use crate::model::{Item, Milestone, MilestoneRecord};

/// Display configuration for a milestone celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneDisplay {
    pub label: &'static str,
    pub emoji: &'static str,
    pub message: &'static str,
    pub color: &'static str,
}

impl Milestone {
    pub fn display(self) -> MilestoneDisplay {
        match self {
            Milestone::OneMonth => MilestoneDisplay {
                label: "1 Month",
                emoji: "🌱",
                message: "One month in — you're building a great habit!",
                color: "#4CAF50",
            },
            Milestone::ThreeMonths => MilestoneDisplay {
                label: "3 Months",
                emoji: "🌿",
                message: "3 months strong. You're using it well!",
                color: "#2196F3",
            },
            Milestone::SixMonths => MilestoneDisplay {
                label: "6 Months",
                emoji: "🌳",
                message: "Half a year! This item has truly earned its place.",
                color: "#9C27B0",
            },
            Milestone::OneYear => MilestoneDisplay {
                label: "1 Year",
                emoji: "🏆",
                message: "One whole year — a true keeper. Less is more!",
                color: "#FF9800",
            },
        }
    }
}

/// A reached-but-unacknowledged milestone selected for celebration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMilestone<'a> {
    pub item: &'a Item,
    pub milestone: Milestone,
}

/// Picks the single milestone to surface, or `None` when nothing is pending.
///
/// Per item, only the highest tier reached is considered: once that tier is
/// acknowledged the item contributes nothing, and lower tiers are never
/// retroactively surfaced. Across items the highest-tier candidate wins,
/// first-seen on ties. The caller acknowledges the result and re-runs to
/// advance through the remaining stack.
pub fn pending_milestone<'a>(
    items: &'a [Item],
    acknowledged: &[MilestoneRecord],
    now: DateTime<Utc>,
) -> Option<PendingMilestone<'a>> {
    let mut best: Option<PendingMilestone<'a>> = None;

    for item in items.iter().filter(|item| item.is_active()) {
        let days = days_since(item.purchase_date, now);

        let Some(highest) = Milestone::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| days >= tier.threshold_days())
        else {
            continue;
        };

        let already_acknowledged = acknowledged
            .iter()
            .any(|record| record.item_id == item.id && record.milestone == highest);
        if already_acknowledged {
            continue;
        }

        let outranks = best
            .as_ref()
            .map_or(true, |current| highest > current.milestone);
        if outranks {
            best = Some(PendingMilestone {
                item,
                milestone: highest,
            });
        }
    }

    best
}
