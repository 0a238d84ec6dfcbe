mod bootstrap;
mod report;

use anyhow::Result;
use insight_core::settings::Settings;
use insight_runtime::data_manager::DataManager;
use serde::Serialize;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Morsel Insight v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Product: {}, View: {}, Region: {}",
        settings.product,
        settings.view,
        settings.region
    );

    let cutoff = settings.cutoff_date()?;
    let policy = settings.zero_baseline_policy()?;
    let region = settings.region_filter();
    let inputs = bootstrap::resolve_inputs(&settings);

    let mut manager = DataManager::new(&settings.output, cutoff)
        .with_inputs(inputs, settings.product.clone())
        .with_policy(policy);

    match settings.view.as_str() {
        "consolidate" => {
            tracing::info!("Consolidating {} transactions...", settings.product);
            let summary = manager.rebuild()?;
            if settings.wants_json() {
                print_json(&summary)?;
            } else {
                print!(
                    "{}",
                    report::render_consolidation(&summary, &settings.product, manager.table_path())
                );
            }
        }

        "stats" => {
            let ctx = manager.get_context(false)?;
            let period = ctx.report(&region)?;
            if settings.wants_json() {
                print_json(&period)?;
            } else {
                print!("{}", report::render_stats(&period, &settings.product));
            }
        }

        "series" => {
            let ctx = manager.get_context(false)?;
            let series = ctx.daily_series(&region);
            if settings.wants_json() {
                print_json(&series)?;
            } else {
                print!("{}", report::render_series(&series));
            }
        }

        "regions" => {
            let ctx = manager.get_context(false)?;
            let distribution = ctx.region_distribution();
            if settings.wants_json() {
                print_json(&distribution)?;
            } else {
                print!("{}", report::render_regions(&distribution));
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
