//! Kiosk dashboard walkthrough
//!
//! Usage: cargo run --example kiosk_dashboard -- [shipment-file] [exchange-file] [search]
//!
//! Without file arguments the demo applies small built-in CSV batches.

use claw_inventory::utils::{MemorySource, PathSource};
use claw_inventory::{Dashboard, ExportFormat, FileSource, UploadKind, UploadOutcome};

fn source(arg: Option<&String>, fallback_name: &str, fallback: &str) -> Box<dyn FileSource> {
    match arg {
        Some(path) => Box::new(PathSource::new(path)),
        None => Box::new(MemorySource::new(fallback_name, fallback.as_bytes().to_vec())),
    }
}

fn print_inventory(dashboard: &Dashboard) {
    println!("  {:<6} {:<16} {:>6} {:>6}", "機台", "品名", "成本", "庫存");
    for item in dashboard.filtered() {
        println!(
            "  {:<6} {:<16} {:>6} {:>6}",
            item.machine, item.item, item.cost, item.stock
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    println!("📦 目前庫存狀況\n");
    let mut dashboard = Dashboard::default();
    print_inventory(&dashboard);

    dashboard.select_file(
        UploadKind::Shipment,
        source(
            args.first(),
            "出貨.csv",
            "品名,出貨數量\n鯊魚手偶,5\n滿天星洋芋片,4\n",
        ),
    );
    dashboard.select_file(
        UploadKind::Exchange,
        source(args.get(1), "夾換利潤表.csv", "品項,回收數量\n鯊魚手偶,3\n"),
    );

    for kind in [UploadKind::Shipment, UploadKind::Exchange] {
        match dashboard.upload(kind).await? {
            UploadOutcome::Applied(receipt) => println!(
                "  ✓ {} ({} rows, {} matched)",
                receipt.message,
                receipt.rows_applied(),
                receipt.rows_matched()
            ),
            UploadOutcome::Skipped(reason) => {
                println!("  - {:?} upload skipped: {:?}", kind, reason)
            }
        }
    }
    println!();

    if let Some(query) = args.get(2) {
        dashboard.set_search(query.as_str());
        println!("🔍 搜尋: {}\n", query);
    }
    print_inventory(&dashboard);

    let summary = dashboard.inventory().summary();
    println!(
        "📊 {} items, {} units, stock value {}\n",
        summary.item_count, summary.total_units, summary.total_value
    );

    let export = dashboard.export_log(ExportFormat::Csv)?;
    let path = export.write_to(&std::env::temp_dir())?;
    println!("📝 {} log entries exported to {}", dashboard.log().len(), path.display());

    Ok(())
}
