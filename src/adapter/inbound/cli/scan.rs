//! `arbscan scan`: one pass over a snapshot file.

use tracing::info;

use super::command::ScanArgs;
use super::output;
use crate::adapter::outbound::snapshot::FileSnapshotSource;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{build_pipeline, build_solver};

/// Load config and snapshot, run the pipeline, print the report.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the snapshot file
/// cannot be read or parsed. Skipped records are reported, not errors.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(limit) = args.limit {
        config.ranking.limit = limit;
    }
    if args.no_refine {
        config.projection.enabled = false;
    }
    config.validate()?;
    config.init_logging();

    let source = FileSnapshotSource::new(&args.snapshot);
    let pipeline = build_pipeline(&config, build_solver(&config));
    let report = pipeline.scan_source(&source).await?;
    info!(
        path = %args.snapshot.display(),
        opportunities = report.opportunities.len(),
        "scan finished"
    );

    if output::is_json() {
        output::json_document(&report)
    } else {
        output::report(&report);
        Ok(())
    }
}
