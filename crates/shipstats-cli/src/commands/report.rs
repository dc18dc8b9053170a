use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use shipstats_core::aggregates::{
    self, KpiSummary, MonthlyTrendRow, QcBreakdown, RouteStats, SegmentCount, TransitStats,
};
use shipstats_core::cache::TableCache;
use shipstats_core::{ingest_bytes, PipelineConfig};

#[derive(Serialize)]
struct Report {
    kpis: KpiSummary,
    routes: Vec<RouteStats>,
    monthly: Vec<MonthlyTrendRow>,
    transit: Option<TransitStats>,
    costs: Vec<SegmentCount>,
    weights: Vec<SegmentCount>,
    qc: Option<QcBreakdown>,
}

pub fn handle_report(file: &Path, json: bool) -> Result<()> {
    let contents =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;

    let config = PipelineConfig::default();
    let mut cache = TableCache::new();
    let outcome = ingest_bytes(&mut cache, &contents, &config)?;

    let report = Report {
        kpis: aggregates::kpi_summary(&outcome.table, &config)?,
        routes: aggregates::route_stats(&outcome.table)?,
        monthly: aggregates::monthly_trend(&outcome.table, &config)?,
        transit: aggregates::transit_stats(&outcome.table, &config)?,
        costs: aggregates::cost_segments(&outcome.table)?,
        weights: aggregates::weight_segments(&outcome.table)?,
        qc: aggregates::qc_breakdown(&outcome.table, &config)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_kpis(&report.kpis);
    print_routes(&report.routes);
    print_monthly(&report.monthly);
    if let Some(transit) = &report.transit {
        print_transit(transit);
    }
    print_segments("Cost ranges", &report.costs);
    print_segments("Weight categories", &report.weights);
    if let Some(qc) = &report.qc {
        print_qc(qc);
    }

    Ok(())
}

fn print_kpis(kpis: &KpiSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Shipments",
        "Total Cost (EUR)",
        "Avg Cost (EUR)",
        "Gross OTP %",
        "Net OTP %",
        "Improvement %",
    ]);
    table.add_row(vec![
        kpis.shipments.to_string(),
        format!("{:.0}", kpis.total_cost_eur),
        format!("{:.2}", kpis.avg_cost_eur),
        format!("{:.1}", kpis.otp.gross_pct),
        format!("{:.1}", kpis.otp.net_pct),
        format!("{:.1}", kpis.otp.improvement_pct()),
    ]);
    println!("\nKey performance indicators");
    println!("{table}");
}

fn print_routes(routes: &[RouteStats]) {
    if routes.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Route",
        "Shipments",
        "Avg Cost (EUR)",
        "Total Cost (EUR)",
    ]);
    for row in routes.iter().take(10) {
        table.add_row(vec![
            row.route.clone(),
            row.shipments.to_string(),
            format!("{:.2}", row.avg_cost_eur),
            format!("{:.0}", row.total_cost_eur),
        ]);
    }
    println!("\nTop routes by volume");
    println!("{table}");
}

fn print_monthly(monthly: &[MonthlyTrendRow]) {
    if monthly.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Month", "Orders", "Cost (EUR)", "Net OTP %"]);
    for row in monthly {
        table.add_row(vec![
            row.month.clone(),
            row.orders.to_string(),
            format!("{:.0}", row.total_cost_eur),
            format!("{:.1}", row.net_otp_pct),
        ]);
    }
    println!("\nMonthly trend");
    println!("{table}");
}

fn print_transit(transit: &TransitStats) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Shipments", "Avg (h)", "Median (h)", "P95 (h)"]);
    table.add_row(vec![
        transit.shipments.to_string(),
        format!("{:.1}", transit.avg_hours),
        format!("{:.1}", transit.median_hours),
        format!("{:.1}", transit.p95_hours),
    ]);
    println!("\nTransit times");
    println!("{table}");
}

fn print_segments(title: &str, segments: &[SegmentCount]) {
    if segments.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Segment", "Shipments"]);
    for segment in segments {
        table.add_row(vec![segment.label.to_string(), segment.shipments.to_string()]);
    }
    println!("\n{title}");
    println!("{table}");
}

fn print_qc(qc: &QcBreakdown) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Issue", "Type", "Count"]);
    for issue in qc.top_issues.iter().take(10) {
        table.add_row(vec![
            issue.name.clone(),
            if issue.controllable {
                "Controllable".to_string()
            } else {
                "Non-controllable".to_string()
            },
            issue.count.to_string(),
        ]);
    }
    println!(
        "\nQuality issues ({} recorded, {:.1}% controllable)",
        qc.recorded_issues,
        qc.controllable_pct()
    );
    println!("{table}");
}
