//! 計劃月份

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 無法辨識月份標籤時使用的月份代碼
pub const FALLBACK_MONTH_CODE: char = '1';

/// 計劃月份（批號月份代碼的來源）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlannedMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl PlannedMonth {
    /// 依月份順序排列的所有月份
    pub const ALL: [PlannedMonth; 12] = [
        PlannedMonth::January,
        PlannedMonth::February,
        PlannedMonth::March,
        PlannedMonth::April,
        PlannedMonth::May,
        PlannedMonth::June,
        PlannedMonth::July,
        PlannedMonth::August,
        PlannedMonth::September,
        PlannedMonth::October,
        PlannedMonth::November,
        PlannedMonth::December,
    ];

    /// 月份序號（1-12）
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// 由月份序號建立（1-12）
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// 由日期取得月份
    pub fn of_date(date: NaiveDate) -> Self {
        // month() 保證介於 1-12
        Self::ALL[date.month0() as usize]
    }

    /// 完整英文標籤
    pub fn label(self) -> &'static str {
        match self {
            PlannedMonth::January => "January",
            PlannedMonth::February => "February",
            PlannedMonth::March => "March",
            PlannedMonth::April => "April",
            PlannedMonth::May => "May",
            PlannedMonth::June => "June",
            PlannedMonth::July => "July",
            PlannedMonth::August => "August",
            PlannedMonth::September => "September",
            PlannedMonth::October => "October",
            PlannedMonth::November => "November",
            PlannedMonth::December => "December",
        }
    }

    /// 解析月份標籤
    ///
    /// 接受完整名稱、三字母縮寫或月份序號，不分大小寫，忽略前後空白。
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        if let Ok(number) = label.parse::<u32>() {
            return Self::from_number(number);
        }

        let lower = label.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|month| {
            let full = month.label().to_ascii_lowercase();
            full == lower || (lower.len() == 3 && full.starts_with(&lower))
        })
    }

    /// 批號月份代碼
    pub fn month_code(self) -> char {
        match self {
            PlannedMonth::January => 'A',
            PlannedMonth::February => '2',
            PlannedMonth::March => '3',
            PlannedMonth::April => '4',
            PlannedMonth::May => '5',
            PlannedMonth::June => '6',
            PlannedMonth::July => '7',
            PlannedMonth::August => '8',
            PlannedMonth::September => '9',
            PlannedMonth::October => 'D',
            PlannedMonth::November => 'E',
            PlannedMonth::December => '1',
        }
    }

    /// 流水號位數（A/D/E 月份為三位，其餘兩位）
    pub fn correlative_width(self) -> usize {
        correlative_width_for_code(self.month_code())
    }
}

/// 依月份代碼取得流水號位數
pub fn correlative_width_for_code(code: char) -> usize {
    match code {
        'A' | 'D' | 'E' => 3,
        _ => 2,
    }
}

impl std::fmt::Display for PlannedMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
