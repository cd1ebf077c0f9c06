use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an item's cost efficiency is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostMethod {
    PerUse,
    DailyHolding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetirementReason {
    Broken,
    Sold,
    Gifted,
    Lost,
    Stolen,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    DaysHeld,
    TotalUses,
    PurchaseCost,
    DailyCost,
    CostPerUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ownership-duration tiers. Variant order doubles as significance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Milestone {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1yr")]
    OneYear,
}

impl Milestone {
    pub const ALL: [Milestone; 4] = [
        Milestone::OneMonth,
        Milestone::ThreeMonths,
        Milestone::SixMonths,
        Milestone::OneYear,
    ];

    pub fn threshold_days(self) -> i64 {
        match self {
            Milestone::OneMonth => 30,
            Milestone::ThreeMonths => 90,
            Milestone::SixMonths => 180,
            Milestone::OneYear => 365,
        }
    }
}

/// A possession record. Dates round-trip as ISO-8601 strings.
///
/// `category` is a denormalized name string, not a foreign key; category
/// renames and deletes cascade over items by exact name match (see
/// `AppStore::rename_category` / `AppStore::delete_category`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub cost_method: CostMethod,
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retired_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_reason: Option<RetirementReason>,
    /// Only meaningful when `retirement_reason` is `Sold`; cleared otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    /// ISO currency code, informational only. Amounts are never converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn currency_code(&self) -> &str {
        self.currency.as_deref().unwrap_or("USD")
    }
}

/// One usage event. `item_id` is not enforced referentially; readers skip
/// logs whose item no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLog {
    pub id: String,
    pub item_id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A user-defined label. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Acknowledgement that a duration milestone was celebrated. At most one
/// record exists per (item, milestone) pair; readers tolerate duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRecord {
    pub item_id: String,
    pub milestone: Milestone,
    pub acknowledged_at: DateTime<Utc>,
}

/// Payload for creating an item; id, status, and creation timestamp are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub cost_method: CostMethod,
    pub emoji: String,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub currency: Option<String>,
}

/// Partial field merge for item updates. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub cost_method: Option<CostMethod>,
    pub emoji: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub currency: Option<String>,
}

impl ItemPatch {
    pub(crate) fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(price) = self.purchase_price {
            item.purchase_price = price;
        }
        if let Some(date) = self.purchase_date {
            item.purchase_date = date;
        }
        if let Some(method) = self.cost_method {
            item.cost_method = method;
        }
        if let Some(emoji) = self.emoji {
            item.emoji = emoji;
        }
        if let Some(uri) = self.image_uri {
            item.image_uri = Some(uri);
        }
        if let Some(notes) = self.notes {
            item.notes = Some(notes);
        }
        if let Some(date) = self.expiration_date {
            item.expiration_date = Some(date);
        }
        if let Some(currency) = self.currency {
            item.currency = Some(currency);
        }
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
