//! 計劃看板示例
//!
//! 執行：`RUST_LOG=debug cargo run --example planning_board`

use chrono::NaiveDate;
use lotplan::{
    parse_snapshot, Clock, CorrelativeRegistry, CorrelativeSource, DashboardSummary,
    FixedClock, GridPlacement, LotStatus, PlannedMonth, PlanningConfig, PlanningDraft,
    StationCell, VisibleWindow,
};

const SNAPSHOT: &str = r#"[
    { "id": "2f6f5a10-8a41-4c1b-9d61-7c1b0f0a0001", "product": "Paracetamol 500mg",
      "plant": "PLANT-01", "manufacturingArea": "Solids", "plannedMonth": "May",
      "lotCode": "5015", "scheduledStart": "2025-05-05T08:00", "scheduledEnd": "2025-05-07T17:00",
      "expiry": "2025-07-31", "productionStation": "Granulation", "status": "in_production", "lotSize": 1200 },
    { "id": "2f6f5a10-8a41-4c1b-9d61-7c1b0f0a0002", "product": "Ibuprofen 400mg",
      "plant": "PLANT-01", "manufacturingArea": "Solids", "plannedMonth": "May",
      "lotCode": "5025", "scheduledStart": "2025-05-06T06:00", "scheduledEnd": "2025-05-06T14:00",
      "expiry": "2026-05-31", "productionStation": "Compression", "lotSize": 900 },
    { "id": "2f6f5a10-8a41-4c1b-9d61-7c1b0f0a0003", "product": "Cetirizine 10mg",
      "plant": "PLANT-02", "manufacturingArea": "Solids",
      "scheduledStart": "2025-05-08T07:00", "scheduledEnd": "2025-05-09T19:00",
      "productionStation": "Coating" }
]"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== 批次計劃看板示例 ===\n");

    let date = NaiveDate::from_ymd_opt(2025, 5, 6).ok_or_else(|| anyhow::anyhow!("無效的日期"))?;
    let clock = FixedClock::on(date);
    let today = clock.today();
    let config = PlanningConfig::default().with_stations(["Granulation", "Compression", "Coating"]);

    let snapshot = parse_snapshot(SNAPSHOT)?;
    for diagnostic in &snapshot.diagnostics {
        println!("  ! {:?}: {}", diagnostic.severity, diagnostic.message);
    }
    let records = snapshot.value;

    // 看板摘要
    let summary = DashboardSummary::compute(&records, today, &config);
    println!("批次總數: {}", summary.total);
    for bucket in &summary.by_plant.buckets {
        println!(
            "  - 工廠 {}: {}",
            bucket.key.as_deref().unwrap_or("(未指定)"),
            bucket.count
        );
    }
    println!("即將到期: {}，已過期: {}", summary.near_expiry, summary.expired);
    println!("平均批量: {}", summary.average_lot_size);
    println!(
        "生產中: {}",
        summary.by_status.get(&LotStatus::InProduction).copied().unwrap_or(0)
    );

    // 週排程
    println!("\n週排程:");
    let window = VisibleWindow::week(today, today);
    let grid = GridPlacement::place_by_station(&window, &config.stations, &records).value;
    for row in &grid.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match cell {
                StationCell::NoSchedule => "-".to_string(),
                StationCell::Scheduled(lots) => lots
                    .iter()
                    .map(|l| l.product.split_whitespace().next().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("/"),
            })
            .collect();
        println!("  {:<12} {}", row.station, cells.join(" | "));
    }

    // 為未編號的批次產生批號
    let unplanned: Vec<_> = records
        .iter()
        .filter(|r| r.lot_code.is_none())
        .map(|r| r.id)
        .collect();
    let preview = PlanningDraft::preview(
        &records,
        &unplanned,
        PlannedMonth::May,
        clock.year(),
        CorrelativeSource::Registry,
    )?;

    let planned = preview.value.apply_to(&records);
    println!("\n批號預覽:");
    for record in &planned {
        println!(
            "  - {}: {}",
            record.product,
            record.lot_code.as_deref().unwrap_or("(無)")
        );
    }
    let duplicates = CorrelativeRegistry::find_duplicates(&planned);
    println!("重複批號: {}", duplicates.len());

    let updates = preview.value.commit();
    println!("\n更新內容: {}", lotplan::updates_to_json(&updates)?);

    Ok(())
}
