//! 計劃草稿
//!
//! 草稿是尚未確認的批號／月份指派，只存在於呼叫端持有的值中。
//! 由 [`PlanningDraft::preview`] 建立，以 [`PlanningDraft::commit`] 產生更新內容，
//! 或以 [`PlanningDraft::cancel`] 丟棄。

use std::collections::HashMap;

use lot_calc::{CorrelativeRegistry, LotCodeGenerator};
use lot_core::{Diagnosed, LotError, LotRecord, PlannedMonth};
use uuid::Uuid;

use crate::update::LotUpdate;

/// 流水號來源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrelativeSource {
    /// 延續快照中既有批號的最大流水號
    #[default]
    Registry,
    /// 依選取清單中的位置（位置 + 1）
    Position,
}

/// 單筆草稿指派
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAssignment {
    pub planned_month: Option<PlannedMonth>,
    pub lot_code: Option<String>,
}

impl DraftAssignment {
    pub fn new(planned_month: PlannedMonth, lot_code: impl Into<String>) -> Self {
        Self {
            planned_month: Some(planned_month),
            lot_code: Some(lot_code.into()),
        }
    }

    /// 只指派月份
    pub fn month_only(planned_month: PlannedMonth) -> Self {
        Self {
            planned_month: Some(planned_month),
            lot_code: None,
        }
    }
}

/// 計劃草稿
#[derive(Debug, Clone, Default)]
pub struct PlanningDraft {
    assignments: HashMap<Uuid, DraftAssignment>,

    /// 指派順序（提交時依此順序輸出）
    order: Vec<Uuid>,
}

impl PlanningDraft {
    /// 創建空的草稿
    pub fn new() -> Self {
        Self::default()
    }

    /// 產生批號預覽
    ///
    /// 為 `ids` 中的每筆記錄指派 `month` 與新批號。`ids` 必須都在快照中。
    pub fn preview(
        snapshot: &[LotRecord],
        ids: &[Uuid],
        month: PlannedMonth,
        year: i32,
        source: CorrelativeSource,
    ) -> lot_core::Result<Diagnosed<Self>> {
        let mut selected: Vec<&LotRecord> = Vec::with_capacity(ids.len());
        for id in ids {
            let record = snapshot
                .iter()
                .find(|r| r.id == *id)
                .ok_or(LotError::RecordNotFound(*id))?;
            if selected.iter().any(|r| r.id == *id) {
                return Err(LotError::DuplicateRecord(*id));
            }
            selected.push(record);
        }

        let mut draft = Self::new();
        let mut diagnostics = Vec::new();

        match source {
            CorrelativeSource::Registry => {
                let mut registry = CorrelativeRegistry::from_records(snapshot);
                for record in &selected {
                    let (code, record_diagnostics) = registry.next_code(month, year).into_parts();
                    diagnostics.extend(record_diagnostics.into_iter().map(|d| d.for_record(record.id)));
                    draft.insert(record.id, DraftAssignment::new(month, code.to_string()));
                }
            }
            CorrelativeSource::Position => {
                let owned: Vec<LotRecord> = selected.iter().map(|r| (*r).clone()).collect();
                for (id, result) in LotCodeGenerator::generate_batch(month, &owned, year) {
                    let (code, mut record_diagnostics) = result.into_parts();
                    diagnostics.append(&mut record_diagnostics);
                    draft.insert(id, DraftAssignment::new(month, code.to_string()));
                }
            }
        }

        tracing::info!(
            "批號預覽：{} 月，{} 筆記錄，來源 {:?}",
            month,
            draft.len(),
            source
        );

        Ok(Diagnosed::with_diagnostics(draft, diagnostics))
    }

    /// 手動指派（覆蓋既有草稿）
    pub fn assign(
        &mut self,
        snapshot: &[LotRecord],
        id: Uuid,
        assignment: DraftAssignment,
    ) -> lot_core::Result<()> {
        if !snapshot.iter().any(|r| r.id == id) {
            return Err(LotError::RecordNotFound(id));
        }
        self.insert(id, assignment);
        Ok(())
    }

    /// 丟棄單筆草稿
    pub fn discard(&mut self, id: Uuid) -> bool {
        if self.assignments.remove(&id).is_some() {
            self.order.retain(|o| *o != id);
            true
        } else {
            false
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&DraftAssignment> {
        self.assignments.get(&id)
    }

    /// 記錄是否有未確認的指派
    pub fn is_dirty(&self, id: Uuid) -> bool {
        self.assignments.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// 套用草稿後的快照（不修改原快照）
    pub fn apply_to(&self, snapshot: &[LotRecord]) -> Vec<LotRecord> {
        snapshot
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Some(assignment) = self.assignments.get(&record.id) {
                    if let Some(month) = assignment.planned_month {
                        record.planned_month = Some(month);
                    }
                    if let Some(code) = &assignment.lot_code {
                        record.lot_code = Some(code.clone());
                    }
                }
                record
            })
            .collect()
    }

    /// 確認草稿，產生更新內容
    pub fn commit(self) -> Vec<LotUpdate> {
        let Self {
            mut assignments,
            order,
        } = self;

        let updates: Vec<LotUpdate> = order
            .into_iter()
            .filter_map(|id| {
                let assignment = assignments.remove(&id)?;
                Some(LotUpdate {
                    id,
                    planned_month: assignment.planned_month,
                    lot_code: assignment.lot_code,
                })
            })
            .filter(|update| !update.is_empty())
            .collect();

        tracing::info!("草稿確認：{} 筆更新", updates.len());
        updates
    }

    /// 取消草稿
    pub fn cancel(self) {
        tracing::debug!("草稿取消：丟棄 {} 筆指派", self.len());
    }

    fn insert(&mut self, id: Uuid, assignment: DraftAssignment) {
        if self.assignments.insert(id, assignment).is_none() {
            self.order.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot() -> Vec<LotRecord> {
        vec![
            LotRecord::new("Paracetamol".to_string()).with_lot_code("5035"),
            LotRecord::new("Ibuprofen".to_string()),
            LotRecord::new("Loratadine".to_string()),
        ]
    }

    #[rstest]
    #[case::registry_continues_snapshot(CorrelativeSource::Registry, PlannedMonth::May, 2025, "5045", "5055")]
    #[case::registry_empty_scope(CorrelativeSource::Registry, PlannedMonth::January, 2026, "A0016", "A0026")]
    #[case::positions_ignore_snapshot(CorrelativeSource::Position, PlannedMonth::May, 2025, "5015", "5025")]
    #[case::positions_wide_month(CorrelativeSource::Position, PlannedMonth::January, 2026, "A0016", "A0026")]
    fn test_preview(
        #[case] source: CorrelativeSource,
        #[case] month: PlannedMonth,
        #[case] year: i32,
        #[case] first: &str,
        #[case] second: &str,
    ) {
        let records = snapshot();
        let ids = [records[1].id, records[2].id];

        let draft = PlanningDraft::preview(&records, &ids, month, year, source)
            .unwrap()
            .value;

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.get(records[1].id).unwrap().lot_code.as_deref(), Some(first));
        assert_eq!(draft.get(records[2].id).unwrap().lot_code.as_deref(), Some(second));
        assert_eq!(draft.get(records[1].id).unwrap().planned_month, Some(month));
        assert!(!draft.is_dirty(records[0].id));
    }

    #[test]
    fn test_preview_rejects_unknown_and_duplicate_ids() {
        let records = snapshot();

        let unknown = PlanningDraft::preview(&records, &[Uuid::new_v4()], PlannedMonth::May, 2025, CorrelativeSource::Registry);
        assert!(matches!(unknown, Err(LotError::RecordNotFound(_))));

        let twice = [records[1].id, records[1].id];
        let duplicate = PlanningDraft::preview(&records, &twice, PlannedMonth::May, 2025, CorrelativeSource::Registry);
        assert!(matches!(duplicate, Err(LotError::DuplicateRecord(_))));
    }

    #[test]
    fn test_apply_does_not_touch_snapshot() {
        let records = snapshot();
        let mut draft = PlanningDraft::new();
        draft
            .assign(&records, records[1].id, DraftAssignment::month_only(PlannedMonth::June))
            .unwrap();

        let applied = draft.apply_to(&records);

        assert_eq!(applied[1].planned_month, Some(PlannedMonth::June));
        assert_eq!(records[1].planned_month, None);
        assert_eq!(applied[0], records[0]);
    }

    #[test]
    fn test_commit_in_assignment_order() {
        let records = snapshot();
        let mut draft = PlanningDraft::new();
        draft.assign(&records, records[2].id, DraftAssignment::new(PlannedMonth::May, "5045")).unwrap();
        draft.assign(&records, records[1].id, DraftAssignment::new(PlannedMonth::May, "5055")).unwrap();
        draft.assign(&records, records[2].id, DraftAssignment::new(PlannedMonth::May, "5065")).unwrap();

        let updates = draft.commit();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, records[2].id);
        assert_eq!(updates[0].lot_code.as_deref(), Some("5065"));
        assert_eq!(updates[1].id, records[1].id);
    }

    #[test]
    fn test_discard() {
        let records = snapshot();
        let mut draft = PlanningDraft::new();
        draft.assign(&records, records[1].id, DraftAssignment::month_only(PlannedMonth::May)).unwrap();

        assert!(draft.discard(records[1].id));
        assert!(!draft.discard(records[1].id));
        assert!(draft.is_empty());
        assert!(draft.commit().is_empty());
    }

    #[test]
    fn test_assign_unknown_record() {
        let records = snapshot();
        let mut draft = PlanningDraft::new();
        let result = draft.assign(&records, Uuid::new_v4(), DraftAssignment::month_only(PlannedMonth::May));
        assert!(matches!(result, Err(LotError::RecordNotFound(_))));
    }
}
