//! # Lot Core
//!
//! 批次計劃核心資料模型與類型定義

pub mod calendar;
pub mod clock;
pub mod config;
pub mod diagnostic;
pub mod month;
pub mod record;
pub mod snapshot;

// Re-export 主要類型
pub use calendar::{CalendarDay, ViewMode, VisibleWindow};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PlanningConfig;
pub use diagnostic::{Diagnosed, Diagnostic, Severity};
pub use month::PlannedMonth;
pub use record::{CalendarEvent, LotPriority, LotRecord, LotStatus, Schedulable};
pub use snapshot::{normalize_snapshot, parse_snapshot, SnapshotRecord};

/// 批次計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum LotError {
    #[error("JSON 格式錯誤: {0}")]
    Json(#[from] serde_json::Error),

    #[error("找不到批次記錄: {0}")]
    RecordNotFound(uuid::Uuid),

    #[error("批次記錄重複: {0}")]
    DuplicateRecord(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, LotError>;
