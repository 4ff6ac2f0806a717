//! Writing a result to an output directory.

use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use super::text::format_summary_report;
use crate::error::{ReportError, SurveyorResult};
use crate::extraction::{BbsItem, BoqItem, ExtractionResult};

/// Full result, pretty-printed.
pub const RESULT_JSON: &str = "result.json";
/// Plain-text report.
pub const SUMMARY_TXT: &str = "summary.txt";
/// Bill of quantities.
pub const BOQ_CSV: &str = "boq.csv";
/// Bar bending schedule.
pub const BBS_CSV: &str = "bbs.csv";
/// Unparsed model reply.
pub const RAW_RESPONSE_TXT: &str = "raw_response.txt";

const BOQ_HEADERS: [&str; 9] = [
    "Component", "Type", "Length(m)", "Breadth(m)", "Depth(m)",
    "Quantity", "Unit", "Confidence", "Source",
];

const BBS_HEADERS: [&str; 8] = [
    "Mark", "Member", "Diameter(mm)", "Count", "Length(m)",
    "Total_Length(m)", "Weight(kg)", "Notes",
];

fn io_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|e| io_error(path, e))
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// The bill of quantities as CSV, header row first.
pub fn boq_csv(items: &[BoqItem]) -> SurveyorResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(BOQ_HEADERS)?;

    for item in items {
        writer.write_record(&[
            item.component.clone(),
            item.kind.clone(),
            item.length.to_string(),
            item.breadth.to_string(),
            item.depth.to_string(),
            item.quantity.to_string(),
            item.unit.clone(),
            item.confidence.clone(),
            item.source.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Csv { message: e.to_string() }.into())
}

/// The bar bending schedule as CSV; missing numbers are empty cells.
pub fn bbs_csv(items: &[BbsItem]) -> SurveyorResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(BBS_HEADERS)?;

    for item in items {
        writer.write_record(&[
            item.mark.clone(),
            item.member.clone(),
            optional_cell(item.dia_mm),
            optional_cell(item.count),
            optional_cell(item.length),
            optional_cell(item.total_length),
            optional_cell(item.weight_kg),
            item.notes.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Csv { message: e.to_string() }.into())
}

/// Writes the report files for `result` into `output_dir`, creating it if
/// needed, and returns the paths written.
///
/// `result.json` and `summary.txt` are always written. The CSV files only
/// when their list has entries, and `raw_response.txt` only when `raw_text`
/// is given.
pub fn save_results(
    result: &ExtractionResult,
    raw_text: Option<&str>,
    output_dir: &Path,
) -> SurveyorResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;
    let mut written = Vec::new();

    let json_path = output_dir.join(RESULT_JSON);
    let json = serde_json::to_string_pretty(result)?;
    write_file(&json_path, json.as_bytes())?;
    written.push(json_path);

    let summary_path = output_dir.join(SUMMARY_TXT);
    write_file(&summary_path, format_summary_report(result).as_bytes())?;
    written.push(summary_path);

    if !result.boq.is_empty() {
        let path = output_dir.join(BOQ_CSV);
        write_file(&path, &boq_csv(&result.boq)?)?;
        written.push(path);
    }

    if !result.bbs.is_empty() {
        let path = output_dir.join(BBS_CSV);
        write_file(&path, &bbs_csv(&result.bbs)?)?;
        written.push(path);
    }

    if let Some(raw) = raw_text {
        let path = output_dir.join(RAW_RESPONSE_TXT);
        write_file(&path, raw.as_bytes())?;
        written.push(path);
    }

    for path in &written {
        tracing::info!(path = %path.display(), "Saved report file");
    }

    Ok(written)
}
