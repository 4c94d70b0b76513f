//! 日曆格放置
//!
//! 有開始與結束時間的項目會出現在跨越的每一天；只有開始時間的項目放在開始當天；
//! 結束早於開始的項目不佔任何格子。格內順序與來源清單相同。

use chrono::NaiveDate;
use lot_core::{CalendarDay, Diagnosed, Diagnostic, Schedulable, VisibleWindow};

/// 單日格
#[derive(Debug)]
pub struct DayCell<'a, T> {
    pub day: CalendarDay,
    pub entries: Vec<&'a T>,
}

/// 日／週／月檢視的放置結果
#[derive(Debug)]
pub struct DayGrid<'a, T> {
    pub cells: Vec<DayCell<'a, T>>,

    /// 沒有開始時間的項目
    pub unscheduled: Vec<&'a T>,
}

impl<'a, T> DayGrid<'a, T> {
    /// 取得某日的格子
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell<'a, T>> {
        self.cells.iter().find(|c| c.day.date == date)
    }
}

/// 生產站格
#[derive(Debug)]
pub enum StationCell<'a, T> {
    /// 無排程（顯示占位）
    NoSchedule,
    Scheduled(Vec<&'a T>),
}

impl<'a, T> StationCell<'a, T> {
    pub fn entries(&self) -> &[&'a T] {
        match self {
            StationCell::NoSchedule => &[],
            StationCell::Scheduled(entries) => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StationCell::NoSchedule)
    }
}

/// 生產站列
#[derive(Debug)]
pub struct StationRow<'a, T> {
    pub station: String,

    /// 與窗口天數一一對應
    pub cells: Vec<StationCell<'a, T>>,
}

/// 週檢視（生產站 × 日期）
#[derive(Debug)]
pub struct StationGrid<'a, T> {
    pub days: Vec<CalendarDay>,
    pub rows: Vec<StationRow<'a, T>>,

    /// 落在窗口內但生產站不在列清單中的項目
    pub unassigned: Vec<&'a T>,
}

/// 月檢視格
#[derive(Debug)]
pub struct MonthCell<'a, T> {
    pub day: CalendarDay,

    /// 實際顯示的項目
    pub visible: Vec<&'a T>,

    /// 收合的項目數
    pub overflow: usize,
}

impl<'a, T> MonthCell<'a, T> {
    /// 收合提示文字
    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }

    /// 格內項目總數
    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }
}

/// 日期區間（含頭尾）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DaySpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

/// 日曆格放置計算器
pub struct GridPlacement;

impl GridPlacement {
    /// 計算項目佔用的日期區間
    ///
    /// 沒有開始時間回傳 `None`；結束早於開始回傳 `None` 並附上錯誤診斷。
    pub fn span_of<T: Schedulable>(item: &T) -> Diagnosed<Option<DaySpan>> {
        let Some(start) = item.scheduled_start() else {
            return Diagnosed::clean(None);
        };

        match item.scheduled_end() {
            Some(end) if end < start => Diagnosed::with_diagnostics(
                None,
                vec![Diagnostic::error(format!(
                    "排程結束 {} 早於開始 {}，不放入任何日期",
                    end, start
                ))
                .for_record(item.item_id())],
            ),
            Some(end) => Diagnosed::clean(Some(DaySpan {
                first: start.date(),
                last: end.date(),
            })),
            None => Diagnosed::clean(Some(DaySpan {
                first: start.date(),
                last: start.date(),
            })),
        }
    }

    /// 項目是否佔用某日
    pub fn occupies<T: Schedulable>(item: &T, date: NaiveDate) -> bool {
        Self::span_of(item)
            .value
            .is_some_and(|span| span.contains(date))
    }

    /// 將項目放入窗口的每一天
    pub fn place<'a, T: Schedulable>(
        window: &VisibleWindow,
        items: &'a [T],
    ) -> Diagnosed<DayGrid<'a, T>> {
        let mut cells: Vec<DayCell<'a, T>> = window
            .days
            .iter()
            .map(|day| DayCell {
                day: *day,
                entries: Vec::new(),
            })
            .collect();
        let mut unscheduled = Vec::new();
        let mut diagnostics = Vec::new();

        for item in items {
            if item.scheduled_start().is_none() {
                unscheduled.push(item);
                continue;
            }

            let (span, mut item_diagnostics) = Self::span_of(item).into_parts();
            diagnostics.append(&mut item_diagnostics);

            if let Some(span) = span {
                for cell in cells.iter_mut().filter(|c| span.contains(c.day.date)) {
                    cell.entries.push(item);
                }
            }
        }

        tracing::debug!(
            "日曆放置：{:?} 檢視 {} 天，{} 個項目，未排程 {} 個",
            window.mode,
            cells.len(),
            items.len(),
            unscheduled.len()
        );

        Diagnosed::with_diagnostics(DayGrid { cells, unscheduled }, diagnostics)
    }

    /// 生產站 × 日期放置（週檢視）
    ///
    /// 某生產站某日沒有項目時為 [`StationCell::NoSchedule`]。
    pub fn place_by_station<'a, T: Schedulable>(
        window: &VisibleWindow,
        stations: &[String],
        items: &'a [T],
    ) -> Diagnosed<StationGrid<'a, T>> {
        let (grid, diagnostics) = Self::place(window, items).into_parts();

        let rows = stations
            .iter()
            .map(|station| StationRow {
                station: station.clone(),
                cells: grid
                    .cells
                    .iter()
                    .map(|cell| {
                        let entries: Vec<&'a T> = cell
                            .entries
                            .iter()
                            .copied()
                            .filter(|item| item.station() == Some(station.as_str()))
                            .collect();
                        if entries.is_empty() {
                            StationCell::NoSchedule
                        } else {
                            StationCell::Scheduled(entries)
                        }
                    })
                    .collect(),
            })
            .collect();

        let mut unassigned: Vec<&'a T> = Vec::new();
        for cell in &grid.cells {
            for &item in &cell.entries {
                let known = item
                    .station()
                    .is_some_and(|s| stations.iter().any(|station| station == s));
                if !known && !unassigned.iter().any(|u| u.item_id() == item.item_id()) {
                    unassigned.push(item);
                }
            }
        }

        if !unassigned.is_empty() {
            tracing::debug!("{} 個項目的生產站不在列清單中", unassigned.len());
        }

        Diagnosed::with_diagnostics(
            StationGrid {
                days: window.days.clone(),
                rows,
                unassigned,
            },
            diagnostics,
        )
    }

    /// 月檢視放置，每格最多顯示 `limit` 筆，其餘收合
    pub fn place_month<'a, T: Schedulable>(
        window: &VisibleWindow,
        items: &'a [T],
        limit: usize,
    ) -> Diagnosed<Vec<MonthCell<'a, T>>> {
        Self::place(window, items).map(|grid| {
            grid.cells
                .into_iter()
                .map(|cell| {
                    let overflow = cell.entries.len().saturating_sub(limit);
                    let mut visible = cell.entries;
                    visible.truncate(limit);
                    MonthCell {
                        day: cell.day,
                        visible,
                        overflow,
                    }
                })
                .collect()
        })
    }
}
