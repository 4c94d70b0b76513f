//! # Lot Calculation Engine
//!
//! 批號產生、日曆格放置與看板彙總

pub mod aggregation;
pub mod correlative;
pub mod lot_code;
pub mod placement;

// Re-export 主要類型
pub use aggregation::{DashboardAggregator, DashboardSummary, GroupBucket, GroupCounts};
pub use correlative::CorrelativeRegistry;
pub use lot_code::{year_digit, LotCode, LotCodeGenerator};
pub use placement::{
    DayCell, DayGrid, DaySpan, GridPlacement, MonthCell, StationCell, StationGrid, StationRow,
};
