//! 看板彙總
//!
//! 每次呼叫都從頭計算，不保留任何快取。

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use lot_core::{LotRecord, LotStatus, PlanningConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分組計數的單一分組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBucket {
    /// 分組鍵；`None` 為缺值分組
    pub key: Option<String>,
    pub count: usize,
}

/// 分組計數（依鍵首次出現的順序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub buckets: Vec<GroupBucket>,
}

impl GroupCounts {
    /// 所有分組的總數
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// 取得某分組的計數（`None` 為缺值分組）
    pub fn get(&self, key: Option<&str>) -> usize {
        self.buckets
            .iter()
            .find(|b| b.key.as_deref() == key)
            .map(|b| b.count)
            .unwrap_or(0)
    }

    /// 缺值分組的計數
    pub fn missing(&self) -> usize {
        self.get(None)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// 看板摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_plant: GroupCounts,
    pub by_area: GroupCounts,
    pub by_month: GroupCounts,
    pub by_status: BTreeMap<LotStatus, usize>,
    pub near_expiry: usize,
    pub expired: usize,
    pub average_lot_size: Decimal,
}

impl DashboardSummary {
    /// 計算整份快照的看板摘要
    pub fn compute(records: &[LotRecord], today: NaiveDate, config: &PlanningConfig) -> Self {
        let summary = Self {
            total: records.len(),
            by_plant: DashboardAggregator::count_by_plant(records),
            by_area: DashboardAggregator::count_by_area(records),
            by_month: DashboardAggregator::count_by_month(records),
            by_status: DashboardAggregator::count_by_status(records),
            near_expiry: DashboardAggregator::near_expiry_count(
                records,
                today,
                config.near_expiry_days,
            ),
            expired: DashboardAggregator::expired_count(records, today),
            average_lot_size: DashboardAggregator::average_lot_size(records),
        };

        tracing::debug!(
            "看板彙總：{} 筆記錄，即將到期 {} 筆，已過期 {} 筆",
            summary.total,
            summary.near_expiry,
            summary.expired
        );

        summary
    }
}

/// 看板彙總計算器
pub struct DashboardAggregator;

impl DashboardAggregator {
    /// 依鍵分組計數，缺值自成一組
    pub fn group_by<F>(records: &[LotRecord], key: F) -> GroupCounts
    where
        F: Fn(&LotRecord) -> Option<String>,
    {
        let mut index: HashMap<Option<String>, usize> = HashMap::new();
        let mut buckets: Vec<GroupBucket> = Vec::new();

        for record in records {
            let key = key(record);
            match index.get(&key) {
                Some(&i) => buckets[i].count += 1,
                None => {
                    index.insert(key.clone(), buckets.len());
                    buckets.push(GroupBucket { key, count: 1 });
                }
            }
        }

        GroupCounts { buckets }
    }

    /// 依工廠計數
    pub fn count_by_plant(records: &[LotRecord]) -> GroupCounts {
        Self::group_by(records, |r| r.plant.clone())
    }

    /// 依製造區域計數
    pub fn count_by_area(records: &[LotRecord]) -> GroupCounts {
        Self::group_by(records, |r| r.manufacturing_area.clone())
    }

    /// 依計劃月份計數
    pub fn count_by_month(records: &[LotRecord]) -> GroupCounts {
        Self::group_by(records, |r| r.planned_month.map(|m| m.label().to_string()))
    }

    /// 依狀態計數
    pub fn count_by_status(records: &[LotRecord]) -> BTreeMap<LotStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in records {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }

    /// 即將到期筆數：`0 < 剩餘天數 <= window_days`
    pub fn near_expiry_count(records: &[LotRecord], today: NaiveDate, window_days: i64) -> usize {
        records
            .iter()
            .filter_map(|r| r.days_until_expiry(today))
            .filter(|&days| days > 0 && days <= window_days)
            .count()
    }

    /// 已過期筆數
    pub fn expired_count(records: &[LotRecord], today: NaiveDate) -> usize {
        records
            .iter()
            .filter_map(|r| r.days_until_expiry(today))
            .filter(|&days| days < 0)
            .count()
    }

    /// 平均批量（只計入有批量的記錄；沒有資料時為 0）
    ///
    /// 總和溢位時改為逐筆先除再加。
    pub fn average_lot_size(records: &[LotRecord]) -> Decimal {
        let sizes: Vec<Decimal> = records.iter().filter_map(|r| r.lot_size).collect();
        if sizes.is_empty() {
            return Decimal::ZERO;
        }
        let count = Decimal::from(sizes.len());

        let exact = sizes
            .iter()
            .try_fold(Decimal::ZERO, |sum, size| sum.checked_add(*size))
            .and_then(|sum| sum.checked_div(count));
        if let Some(average) = exact {
            return average;
        }

        tracing::warn!("批量總和溢位，改以分段平均計算（{} 筆）", sizes.len());
        sizes
            .iter()
            .try_fold(Decimal::ZERO, |sum, size| {
                size.checked_div(count).and_then(|part| sum.checked_add(part))
            })
            .unwrap_or(Decimal::ZERO)
    }
}
