//! # Lot Draft
//!
//! 未確認的計劃指派與送往後端的更新內容

pub mod draft;
pub mod update;

// Re-export 主要類型
pub use draft::{CorrelativeSource, DraftAssignment, PlanningDraft};
pub use update::{to_json, LotUpdate};
