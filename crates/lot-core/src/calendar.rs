//! 日曆可視窗口
//!
//! 週從週一開始；月檢視固定顯示 6 週（42 天），不足的部分以前後月份補齊。

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// 月檢視固定格數（6 週）
pub const MONTH_GRID_DAYS: usize = 42;

/// 週檢視天數
pub const WEEK_DAYS: usize = 7;

/// 檢視模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

/// 日曆中的一天
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,

    /// 是否屬於目前顯示的月份（月檢視以外一律為 true）
    pub in_current_month: bool,

    /// 是否為今天
    pub is_today: bool,
}

/// 可視窗口
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub mode: ViewMode,

    /// 定位日期
    pub anchor: NaiveDate,

    /// 今天（由呼叫端注入）
    pub today: NaiveDate,

    pub days: Vec<CalendarDay>,
}

/// 取得日期所在週的週一
///
/// 週日往前推 6 天，其他日子往前推到週一。
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// 取得月份第一天
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl VisibleWindow {
    /// 依檢視模式建立窗口
    pub fn new(mode: ViewMode, anchor: NaiveDate, today: NaiveDate) -> Self {
        match mode {
            ViewMode::Day => Self::day(anchor, today),
            ViewMode::Week => Self::week(anchor, today),
            ViewMode::Month => Self::month(anchor, today),
        }
    }

    /// 單日窗口
    pub fn day(anchor: NaiveDate, today: NaiveDate) -> Self {
        Self {
            mode: ViewMode::Day,
            anchor,
            today,
            days: vec![CalendarDay {
                date: anchor,
                in_current_month: true,
                is_today: anchor == today,
            }],
        }
    }

    /// 週窗口（週一開始，連續 7 天）
    pub fn week(anchor: NaiveDate, today: NaiveDate) -> Self {
        let days = week_start(anchor)
            .iter_days()
            .take(WEEK_DAYS)
            .map(|date| CalendarDay {
                date,
                in_current_month: true,
                is_today: date == today,
            })
            .collect();

        Self {
            mode: ViewMode::Week,
            anchor,
            today,
            days,
        }
    }

    /// 月窗口（從月初所在週的週一開始，固定 42 天）
    pub fn month(anchor: NaiveDate, today: NaiveDate) -> Self {
        let month = anchor.month();
        let year = anchor.year();

        let days = week_start(first_of_month(anchor))
            .iter_days()
            .take(MONTH_GRID_DAYS)
            .map(|date| CalendarDay {
                date,
                in_current_month: date.month() == month && date.year() == year,
                is_today: date == today,
            })
            .collect();

        Self {
            mode: ViewMode::Month,
            anchor,
            today,
            days,
        }
    }

    /// 窗口第一天
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    /// 窗口最後一天
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// 日期是否在窗口內
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => first <= date && date <= last,
            _ => false,
        }
    }

    /// 下一個窗口（依模式前進一天、一週或一個月）
    pub fn next(&self) -> Self {
        let anchor = match self.mode {
            ViewMode::Day => self.anchor.checked_add_days(Days::new(1)),
            ViewMode::Week => self.anchor.checked_add_days(Days::new(WEEK_DAYS as u64)),
            ViewMode::Month => first_of_month(self.anchor).checked_add_months(Months::new(1)),
        };
        Self::new(self.mode, anchor.unwrap_or(self.anchor), self.today)
    }

    /// 上一個窗口
    pub fn previous(&self) -> Self {
        let anchor = match self.mode {
            ViewMode::Day => self.anchor.checked_sub_days(Days::new(1)),
            ViewMode::Week => self.anchor.checked_sub_days(Days::new(WEEK_DAYS as u64)),
            ViewMode::Month => first_of_month(self.anchor).checked_sub_months(Months::new(1)),
        };
        Self::new(self.mode, anchor.unwrap_or(self.anchor), self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_for_each_weekday() {
        // 2025-10-06 是週一
        for offset in 0..7 {
            let anchor = date(2025, 10, 6 + offset);
            assert_eq!(week_start(anchor), date(2025, 10, 6));
        }
    }

    #[test]
    fn test_sunday_belongs_to_previous_week() {
        // 2025-10-12 是週日
        assert_eq!(week_start(date(2025, 10, 12)), date(2025, 10, 6));
        assert_eq!(week_start(date(2025, 10, 13)), date(2025, 10, 13));
    }

    #[test]
    fn test_month_window_pads_to_42_days() {
        // 2025-02-01 是週六
        let window = VisibleWindow::month(date(2025, 2, 14), date(2025, 2, 14));

        assert_eq!(window.days.len(), MONTH_GRID_DAYS);
        assert_eq!(window.first_day(), Some(date(2025, 1, 27)));
        assert_eq!(window.last_day(), Some(date(2025, 3, 9)));
        assert!(!window.days[0].in_current_month);
        assert!(window.days[5].in_current_month);
        assert_eq!(window.days.iter().filter(|d| d.in_current_month).count(), 28);
        assert_eq!(window.days.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_day_window() {
        let window = VisibleWindow::day(date(2025, 10, 8), date(2025, 10, 9));
        assert_eq!(window.days.len(), 1);
        assert!(!window.days[0].is_today);
        assert!(window.contains(date(2025, 10, 8)));
        assert!(!window.contains(date(2025, 10, 9)));
    }

    #[test]
    fn test_navigation() {
        let today = date(2025, 1, 31);

        let month = VisibleWindow::month(date(2025, 1, 31), today);
        assert_eq!(month.next().anchor, date(2025, 2, 1));
        assert_eq!(month.previous().anchor, date(2024, 12, 1));

        let week = VisibleWindow::week(date(2025, 1, 29), today);
        assert_eq!(week.next().first_day(), Some(date(2025, 2, 3)));
        assert_eq!(week.previous().first_day(), Some(date(2025, 1, 20)));

        let day = VisibleWindow::day(date(2025, 1, 31), today);
        assert_eq!(day.next().anchor, date(2025, 2, 1));
    }

    proptest! {
        #[test]
        fn prop_week_starts_on_monday(days in 0i64..20_000) {
            let anchor = date(2000, 1, 1) + chrono::Duration::days(days);
            let window = VisibleWindow::week(anchor, anchor);

            prop_assert_eq!(window.days.len(), WEEK_DAYS);
            prop_assert_eq!(window.days[0].date.weekday(), Weekday::Mon);
            prop_assert!(window.contains(anchor));
            for pair in window.days.windows(2) {
                prop_assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
            }
        }

        #[test]
        fn prop_month_grid_is_six_weeks(year in 1990i32..2100, month in 1u32..=12) {
            let anchor = date(year, month, 15);
            let window = VisibleWindow::month(anchor, anchor);

            prop_assert_eq!(window.days.len(), MONTH_GRID_DAYS);
            prop_assert_eq!(window.days[0].date.weekday(), Weekday::Mon);
            prop_assert!(window.contains(date(year, month, 1)));
            for pair in window.days.windows(2) {
                prop_assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
            }
        }
    }
}
