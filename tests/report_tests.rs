//! Tests for writing results to an output directory.

use pretty_assertions::assert_eq;
use quantity_surveyor::extraction::{analyze_response, ExtractionResult, NormalizeOptions};
use quantity_surveyor::fixtures::load_fixture;
use quantity_surveyor::report::{
    save_results, BBS_CSV, BOQ_CSV, RAW_RESPONSE_TXT, RESULT_JSON, SUMMARY_TXT,
};
use quantity_surveyor::{ReportError, SurveyorError};
use std::fs;

fn fenced_result() -> ExtractionResult {
    analyze_response(&load_fixture("responses/fenced.txt"), &NormalizeOptions::default()).result
}

#[test]
fn test_save_results_writes_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let result = fenced_result();

    let written = save_results(&result, None, dir.path()).unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![RESULT_JSON, SUMMARY_TXT, BOQ_CSV, BBS_CSV]);
    assert!(!dir.path().join(RAW_RESPONSE_TXT).exists());

    let json = fs::read_to_string(dir.path().join(RESULT_JSON)).unwrap();
    let reloaded: ExtractionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, result);
    assert!(json.contains("\"type\": \"PCC Bed\""));
}

#[test]
fn test_csv_fields_with_commas_are_quoted() {
    let dir = tempfile::tempdir().unwrap();

    save_results(&fenced_result(), None, dir.path()).unwrap();

    let bbs = fs::read_to_string(dir.path().join(BBS_CSV)).unwrap();
    let lines: Vec<_> = bbs.lines().collect();
    assert_eq!(
        lines[0],
        "Mark,Member,Diameter(mm),Count,Length(m),Total_Length(m),Weight(kg),Notes"
    );
    assert_eq!(
        lines[2],
        "S1-D1,Slab distribution,8,15,2.2,33,13.3,\"8mm @ 300mm c/c, both ways\""
    );

    let boq = fs::read_to_string(dir.path().join(BOQ_CSV)).unwrap();
    assert!(boq.contains("\"Section A-A, plan\""));

    let mut reader = csv::Reader::from_path(dir.path().join(BBS_CSV)).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][7], "8mm @ 300mm c/c, both ways");
}

#[test]
fn test_summary_report_contents() {
    let dir = tempfile::tempdir().unwrap();

    save_results(&fenced_result(), None, dir.path()).unwrap();

    let summary = fs::read_to_string(dir.path().join(SUMMARY_TXT)).unwrap();
    assert!(summary.contains("CONSTRUCTION QUANTITY SURVEYOR - REPORT"));
    assert!(summary.contains("Scale: 1:100"));
    assert!(summary.contains("BILL OF QUANTITIES"));
    assert!(summary.contains("BAR BENDING SCHEDULE"));
    assert!(summary.contains("29.26 kg"));
    assert!(summary.contains("• Slab thickness 150mm assumed where not specified"));
}

#[test]
fn test_failed_parse_saves_raw_response() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("output");
    let text = load_fixture("responses/no_json.txt");
    let extraction = analyze_response(&text, &NormalizeOptions::default());

    let written = save_results(&extraction.result, extraction.raw_text.as_deref(), &output).unwrap();

    assert_eq!(written.len(), 3);
    assert!(!output.join(BOQ_CSV).exists());
    assert!(!output.join(BBS_CSV).exists());
    assert_eq!(fs::read_to_string(output.join(RAW_RESPONSE_TXT)).unwrap(), text);

    let summary = fs::read_to_string(output.join(SUMMARY_TXT)).unwrap();
    assert!(summary.contains("No BOQ items found."));
    assert!(summary.contains("No BBS items found."));
}

#[test]
fn test_unwritable_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "occupied").unwrap();

    let result = save_results(&fenced_result(), None, &blocker);

    assert!(matches!(
        result,
        Err(SurveyorError::Report(ReportError::Io { .. }))
    ));
}
