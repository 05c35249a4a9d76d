//! Chart output for spreadsheets (CSV) and terminals (tab-separated table).

use std::fmt::Write as _;

use super::{Chart, StepKind};

#[derive(serde::Serialize)]
struct CsvRow<'a> {
    position: u32,
    kind: &'static str,
    label: &'a str,
    track_id: &'a str,
    outcome: &'a str,
}

fn kind_str(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Target => "target",
        StepKind::Discard => "discard",
    }
}

/// One row per step: `position,kind,label,track_id,outcome`.
pub fn chart_to_csv(chart: &Chart) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if chart.steps.is_empty() {
        writer.write_record(["position", "kind", "label", "track_id", "outcome"])?;
    }
    for step in &chart.steps {
        writer.serialize(CsvRow {
            position: step.position,
            kind: kind_str(step.kind),
            label: &step.label,
            track_id: step.track_id.as_deref().unwrap_or(""),
            outcome: step.outcome.as_deref().unwrap_or(""),
        })?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn chart_to_table(chart: &Chart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "position\tkind\tlabel\toutcome");
    for step in &chart.steps {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            step.position,
            kind_str(step.kind),
            step.label,
            step.outcome.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "total actions: {}", chart.max_index);
    for conflict in &chart.conflicts {
        let claimants: Vec<String> = conflict
            .entries
            .iter()
            .map(|e| format!("{} ({})", e.outcome, e.label))
            .collect();
        let _ = writeln!(
            out,
            "conflict at #{}: {}",
            conflict.position,
            claimants.join(", ")
        );
    }
    out
}
