//! Rendering validation reports.

use std::io::Write;

use dataentry_core::ValidationReport;
use serde::Serialize;

use crate::config::OutputFormat;

#[derive(Serialize)]
struct RecordOutcome<'a> {
    record: usize,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Write one entry per report. Records are numbered from 1.
pub fn render<W: Write>(
    format: OutputFormat,
    reports: &[ValidationReport],
    out: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => render_text(reports, out),
        OutputFormat::Json => {
            let outcomes: Vec<RecordOutcome<'_>> = reports
                .iter()
                .enumerate()
                .map(|(index, report)| RecordOutcome {
                    record: index + 1,
                    report,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &outcomes)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn render_text<W: Write>(reports: &[ValidationReport], out: &mut W) -> anyhow::Result<()> {
    for (index, report) in reports.iter().enumerate() {
        let record = index + 1;
        if report.is_valid {
            writeln!(out, "record {record}: OK")?;
            continue;
        }
        writeln!(out, "record {record}: {} error(s)", report.errors.len())?;
        for error in &report.errors {
            writeln!(out, "  {}: {}", error.field, error.message)?;
        }
    }
    Ok(())
}
