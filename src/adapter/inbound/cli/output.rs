//! CLI output formatting.
//!
//! Human output goes through the helpers here, styled with colored symbols
//! when the terminal supports it. In JSON mode the helpers stay silent and
//! each command prints exactly one JSON document on stdout.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream};
use parking_lot::{const_rwlock, RwLock};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::application::scan::{RankedOpportunity, ScanReport};
use crate::domain::book::Side;
use crate::domain::diagnostic::Diagnostic;
use crate::domain::opportunity::{Direction, OpportunityKind};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: RwLock<OutputConfig> = const_rwlock(OutputConfig {
    json: false,
    quiet: false,
});

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT_CONFIG.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    OUTPUT_CONFIG.read().json
}

fn suppressed() -> bool {
    let config = *OUTPUT_CONFIG.read();
    config.json || config.quiet
}

/// Print a section header.
pub fn section(title: &str) {
    if suppressed() {
        return;
    }
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    if suppressed() {
        return;
    }
    println!(
        "  {:<14} {}",
        label.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        value
    );
}

/// Print a success line.
pub fn success(message: &str) {
    if suppressed() {
        return;
    }
    println!("  {} {}", "✓".if_supports_color(Stream::Stdout, |t| t.green()), message);
}

/// Print a warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    if is_json() {
        return;
    }
    println!("  {} {}", "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()), message);
}

/// Print an error line on stderr, as JSON in JSON mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", serde_json::json!({ "error": message }));
        return;
    }
    eprintln!("  {} {}", "×".if_supports_color(Stream::Stderr, |t| t.red()), message);
}

/// Print `value` as a single pretty JSON document.
pub fn json_document<T: Serialize>(value: &T) -> crate::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Conditions")]
    conditions: String,
    #[tabled(rename = "Legs")]
    legs: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Best-level profit")]
    profit: String,
    #[tabled(rename = "Sized")]
    sized: String,
}

impl OpportunityRow {
    fn new(rank: usize, ranked: &RankedOpportunity) -> Self {
        let opp = &ranked.opportunity;
        let kind = match (opp.kind(), opp.direction()) {
            (OpportunityKind::SingleCondition, Direction::BuyAll) => "buy both",
            (OpportunityKind::SingleCondition, Direction::SellAll) => "sell both",
            (OpportunityKind::Combinatorial, Direction::BuyAll) => "basket",
            (OpportunityKind::Combinatorial, Direction::SellAll) => "basket (sell)",
        };
        let legs = opp
            .legs()
            .iter()
            .map(|l| format!("{} {}@{}", side_label(l.side()), l.outcome(), l.price()))
            .collect::<Vec<_>>()
            .join("\n");
        let conditions = opp
            .conditions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let sized = ranked.sizing.as_ref().map_or_else(
            || "-".to_string(),
            |s| format!("{} ({:?}, {} it)", s.realized_profit.round_dp(4), s.status, s.iterations),
        );

        Self {
            rank,
            kind,
            conditions,
            legs,
            cost: opp.cost().round_dp(4).to_string(),
            margin: opp.margin().round_dp(4).to_string(),
            volume: opp.volume().round_dp(2).to_string(),
            profit: opp.expected_profit().round_dp(4).to_string(),
            sized,
        }
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    }
}

/// Human rendering of a scan report.
pub fn report(report: &ScanReport) {
    if is_json() {
        return;
    }

    section(&format!("Snapshot v{}", report.snapshot_version));
    if report.opportunities.is_empty() {
        field("Opportunities", "none");
    } else {
        let rows: Vec<OpportunityRow> = report
            .opportunities
            .iter()
            .enumerate()
            .map(|(i, o)| OpportunityRow::new(i + 1, o))
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if !report.diagnostics.is_empty() {
        section("Diagnostics");
        for d in &report.diagnostics {
            diagnostic(d);
        }
    }
}

fn diagnostic(d: &Diagnostic) {
    if suppressed() {
        return;
    }
    println!(
        "  {} {} {}",
        d.kind.if_supports_color(Stream::Stdout, |t| t.yellow()),
        d.scope.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        d.message
    );
}
