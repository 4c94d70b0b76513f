//! # Lotplan
//!
//! 批次計劃核心：批號產生、日曆格放置、看板彙總與計劃草稿
//!
//! ```
//! use lotplan::{LotCodeGenerator, PlannedMonth};
//!
//! let code = LotCodeGenerator::generate_for_month(PlannedMonth::May, 7, 2025);
//! assert_eq!(code.value.to_string(), "5075");
//! ```

pub use lot_calc::{
    year_digit, CorrelativeRegistry, DashboardAggregator, DashboardSummary, DayCell, DayGrid,
    GridPlacement, GroupBucket, GroupCounts, LotCode, LotCodeGenerator, MonthCell, StationCell,
    StationGrid, StationRow,
};
pub use lot_core::{
    normalize_snapshot, parse_snapshot, CalendarDay, CalendarEvent, Clock, Diagnosed, Diagnostic,
    FixedClock, LotError, LotPriority, LotRecord, LotStatus, PlannedMonth, PlanningConfig,
    Schedulable, Severity, SnapshotRecord, SystemClock, ViewMode, VisibleWindow,
};
pub use lot_draft::{to_json as updates_to_json, CorrelativeSource, DraftAssignment, LotUpdate, PlanningDraft};
