use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::model::{
    new_id, Category, Item, ItemPatch, ItemStatus, Milestone, MilestoneRecord, NewItem,
    RetirementReason, UsageLog,
};
use crate::storage::Storage;

/// Owns the in-memory application state and applies every mutation.
///
/// Mutations update memory first and then trigger a persistence write.
/// In-memory state is the source of truth for the session: a failed save is
/// logged and never rolls the mutation back.
#[derive(Debug)]
pub struct AppStore {
    storage: Storage,
    items: Vec<Item>,
    usage_logs: Vec<UsageLog>,
    categories: Vec<Category>,
    milestone_records: Vec<MilestoneRecord>,
}

impl AppStore {
    /// Loads all four collections from storage.
    pub async fn load(storage: Storage) -> Self {
        let (items, usage_logs, categories, milestone_records) = tokio::join!(
            storage.load_items(),
            storage.load_usage_logs(),
            storage.load_categories(),
            storage.load_milestones(),
        );
        Self {
            storage,
            items,
            usage_logs,
            categories,
            milestone_records,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn usage_logs(&self) -> &[UsageLog] {
        &self.usage_logs
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn milestone_records(&self) -> &[MilestoneRecord] {
        &self.milestone_records
    }

    async fn persist_items(&self) {
        if let Err(err) = self.storage.save_items(&self.items).await {
            warn!(error = %err, "failed to persist items");
        }
    }

    async fn persist_usage_logs(&self) {
        if let Err(err) = self.storage.save_usage_logs(&self.usage_logs).await {
            warn!(error = %err, "failed to persist usage logs");
        }
    }

    async fn persist_categories(&self) {
        if let Err(err) = self.storage.save_categories(&self.categories).await {
            warn!(error = %err, "failed to persist categories");
        }
    }

    async fn persist_milestones(&self) {
        if let Err(err) = self.storage.save_milestones(&self.milestone_records).await {
            warn!(error = %err, "failed to persist milestone records");
        }
    }

    fn item_mut(&mut self, id: &str) -> AppResult<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::new("ITEM/NOT_FOUND", "Item not found").with_context("id", id))
    }

    /// Creates an item, assigning id, active status, and creation timestamp.
    pub async fn add_item(&mut self, new: NewItem) -> Item {
        let item = Item {
            id: new_id(),
            name: new.name,
            category: new.category,
            purchase_price: new.purchase_price,
            purchase_date: new.purchase_date,
            cost_method: new.cost_method,
            emoji: new.emoji,
            image_uri: new.image_uri,
            notes: new.notes,
            expiration_date: new.expiration_date,
            status: ItemStatus::Active,
            retired_at: None,
            retirement_reason: None,
            sale_price: None,
            currency: new.currency,
            created_at: Utc::now(),
        };
        self.items.push(item.clone());
        self.persist_items().await;
        item
    }

    /// Applies a partial field merge to an existing item.
    pub async fn update_item(&mut self, id: &str, patch: ItemPatch) -> AppResult<Item> {
        let updated = {
            let item = self.item_mut(id)?;
            patch.apply(item);
            item.clone()
        };
        self.persist_items().await;
        Ok(updated)
    }

    /// Transitions an item to retired. The sale price is only kept when the
    /// reason is `Sold`.
    pub async fn retire_item(
        &mut self,
        id: &str,
        reason: RetirementReason,
        sale_price: Option<f64>,
    ) -> AppResult<Item> {
        let retired = {
            let item = self.item_mut(id)?;
            item.status = ItemStatus::Retired;
            item.retired_at = Some(Utc::now());
            item.retirement_reason = Some(reason);
            item.sale_price = if reason == RetirementReason::Sold {
                sale_price
            } else {
                None
            };
            item.clone()
        };
        self.persist_items().await;
        Ok(retired)
    }

    /// Deletes an item and cascades to its usage logs.
    pub async fn delete_item(&mut self, id: &str) -> AppResult<()> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Err(AppError::new("ITEM/NOT_FOUND", "Item not found").with_context("id", id));
        }
        self.usage_logs.retain(|log| log.item_id != id);
        self.persist_items().await;
        self.persist_usage_logs().await;
        Ok(())
    }

    /// Appends externally produced records (demo data, restores) verbatim.
    pub async fn import_data(&mut self, items: Vec<Item>, logs: Vec<UsageLog>) {
        self.items.extend(items);
        self.usage_logs.extend(logs);
        self.persist_items().await;
        self.persist_usage_logs().await;
    }

    /// Records a usage event, defaulting to the current instant when no
    /// explicit (possibly backdated) date is given.
    pub async fn add_usage_log(
        &mut self,
        item_id: &str,
        notes: Option<String>,
        date: Option<DateTime<Utc>>,
    ) -> UsageLog {
        let log = UsageLog {
            id: new_id(),
            item_id: item_id.to_string(),
            date: date.unwrap_or_else(Utc::now),
            notes,
        };
        self.usage_logs.push(log.clone());
        self.persist_usage_logs().await;
        log
    }

    pub async fn delete_usage_log(&mut self, log_id: &str) {
        self.usage_logs.retain(|log| log.id != log_id);
        self.persist_usage_logs().await;
    }

    pub fn usage_logs_for_item(&self, item_id: &str) -> Vec<&UsageLog> {
        self.usage_logs
            .iter()
            .filter(|log| log.item_id == item_id)
            .collect()
    }

    fn duplicate_name(&self, name: &str, exclude_id: Option<&str>) -> bool {
        self.categories.iter().any(|category| {
            Some(category.id.as_str()) != exclude_id && category.name.eq_ignore_ascii_case(name)
        })
    }

    pub async fn add_category(&mut self, name: &str) -> AppResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::new("CATEGORY/EMPTY", "Category name cannot be empty"));
        }
        if self.duplicate_name(name, None) {
            return Err(AppError::new("CATEGORY/DUPLICATE", "Category already exists")
                .with_context("name", name));
        }
        let category = Category {
            id: new_id(),
            name: name.to_string(),
            is_default: false,
        };
        self.categories.push(category.clone());
        self.persist_categories().await;
        Ok(category)
    }

    /// Renames a category and cascades the new name onto every item that
    /// referenced the old one by exact name match.
    pub async fn rename_category(&mut self, id: &str, new_name: &str) -> AppResult<Category> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::new("CATEGORY/EMPTY", "Category name cannot be empty"));
        }
        if self.duplicate_name(new_name, Some(id)) {
            return Err(AppError::new("CATEGORY/DUPLICATE", "Category already exists")
                .with_context("name", new_name));
        }
        let (old_name, renamed) = {
            let category = self
                .categories
                .iter_mut()
                .find(|category| category.id == id)
                .ok_or_else(|| {
                    AppError::new("CATEGORY/NOT_FOUND", "Category not found").with_context("id", id)
                })?;
            let old_name = std::mem::replace(&mut category.name, new_name.to_string());
            (old_name, category.clone())
        };

        for item in self.items.iter_mut().filter(|item| item.category == old_name) {
            item.category = renamed.name.clone();
        }

        self.persist_categories().await;
        self.persist_items().await;
        Ok(renamed)
    }

    /// Deletes a category and clears the name from items that referenced it.
    /// Items themselves are kept; default categories cannot be deleted.
    pub async fn delete_category(&mut self, id: &str) -> AppResult<()> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| {
                AppError::new("CATEGORY/NOT_FOUND", "Category not found").with_context("id", id)
            })?;
        if self.categories[index].is_default {
            return Err(
                AppError::new("CATEGORY/DEFAULT", "Default categories cannot be deleted")
                    .with_context("id", id),
            );
        }
        let removed = self.categories.remove(index);

        for item in self
            .items
            .iter_mut()
            .filter(|item| item.category == removed.name)
        {
            item.category = String::new();
        }

        self.persist_categories().await;
        self.persist_items().await;
        Ok(())
    }

    /// Records a milestone acknowledgement. A repeat acknowledgement of the
    /// same (item, tier) pair returns the existing record unchanged.
    pub async fn acknowledge_milestone(
        &mut self,
        item_id: &str,
        milestone: Milestone,
    ) -> MilestoneRecord {
        if let Some(existing) = self
            .milestone_records
            .iter()
            .find(|record| record.item_id == item_id && record.milestone == milestone)
        {
            return existing.clone();
        }
        let record = MilestoneRecord {
            item_id: item_id.to_string(),
            milestone,
            acknowledged_at: Utc::now(),
        };
        self.milestone_records.push(record.clone());
        self.persist_milestones().await;
        record
    }

    /// Drops every record, in memory and on disk.
    pub async fn clear_all(&mut self) {
        self.items.clear();
        self.usage_logs.clear();
        self.categories.clear();
        self.milestone_records.clear();
        if let Err(err) = self.storage.clear_all().await {
            warn!(error = %err, "failed to clear persisted collections");
        }
    }

    /// Seeds categories that ship with the app; used on first launch.
    pub async fn seed_default_categories(&mut self, names: &[&str]) {
        if !self.categories.is_empty() {
            return;
        }
        for name in names {
            self.categories.push(Category {
                id: new_id(),
                name: (*name).to_string(),
                is_default: true,
            });
        }
        self.persist_categories().await;
    }
}
