//! Possession-tracking core: domain model, derived cost metrics, sorting,
//! milestone detection, time-bucketed aggregation, and the persisted state
//! store. Screens call the pure functions here with snapshots taken from
//! [`AppStore`]; all "now"-dependent functions take the current instant as
//! an argument so callers (and tests) control the clock.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod badges;
pub mod calc;
pub mod error;
pub mod insight;
pub mod milestones;
pub mod model;
pub mod sorting;
pub mod storage;
pub mod store;
pub mod timeseries;
pub mod zen;

pub use error::{AppError, AppResult};
pub use model::{
    Category, CostMethod, Item, ItemPatch, ItemStatus, Milestone, MilestoneRecord, NewItem,
    RetirementReason, SortDirection, SortOption, UsageLog,
};
pub use storage::Storage;
pub use store::AppStore;

/// Installs the global tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "useitwell=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
