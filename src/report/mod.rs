//! Rendering and saving extraction results.

mod files;
mod table;
mod text;

pub use files::{
    bbs_csv, boq_csv, save_results, BBS_CSV, BOQ_CSV, RAW_RESPONSE_TXT, RESULT_JSON, SUMMARY_TXT,
};
pub use table::{Align, Table};
pub use text::{
    format_bbs_table, format_boq_table, format_bullets, format_statistics,
    format_summary_report, NO_BBS_ITEMS, NO_BOQ_ITEMS, RULE_WIDTH,
};
