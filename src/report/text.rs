//! Text renderings of a result: tables, statistics and the summary report.

use std::fmt::Write as _;

use super::table::{Align, Table};
use crate::extraction::{BbsItem, BoqItem, ExtractionResult, Summary};

/// Width of banner and section rules.
pub const RULE_WIDTH: usize = 80;

/// Shown instead of an empty BOQ table.
pub const NO_BOQ_ITEMS: &str = "No BOQ items found.";

/// Shown instead of an empty BBS table.
pub const NO_BBS_ITEMS: &str = "No BBS items found.";

/// Formats an optional BBS number; whole values print without decimals.
fn bare_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn two_decimals(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// The bill of quantities as a grid table.
pub fn format_boq_table(items: &[BoqItem]) -> String {
    if items.is_empty() {
        return NO_BOQ_ITEMS.to_string();
    }

    let mut table = Table::new(&[
        ("Component", Align::Left),
        ("Type", Align::Left),
        ("L(m)", Align::Right),
        ("B(m)", Align::Right),
        ("D(m)", Align::Right),
        ("Qty", Align::Right),
        ("Unit", Align::Left),
        ("Conf.", Align::Left),
        ("Source", Align::Left),
    ]);

    for item in items {
        table.push_row(vec![
            item.component.clone(),
            item.kind.clone(),
            format!("{:.2}", item.length),
            format!("{:.2}", item.breadth),
            format!("{:.2}", item.depth),
            format!("{:.2}", item.quantity),
            item.unit.clone(),
            item.confidence.clone(),
            item.source.clone(),
        ]);
    }

    table.render()
}

/// The bar bending schedule as a grid table followed by the total weight.
pub fn format_bbs_table(items: &[BbsItem]) -> String {
    if items.is_empty() {
        return NO_BBS_ITEMS.to_string();
    }

    let mut table = Table::new(&[
        ("Mark", Align::Left),
        ("Member", Align::Left),
        ("Dia(mm)", Align::Right),
        ("Count", Align::Right),
        ("Length(m)", Align::Right),
        ("Total(m)", Align::Right),
        ("Weight(kg)", Align::Right),
        ("Notes", Align::Left),
    ]);

    for item in items {
        table.push_row(vec![
            item.mark.clone(),
            item.member.clone(),
            bare_number(item.dia_mm),
            item.count.map_or_else(|| "-".to_string(), |c| c.to_string()),
            two_decimals(item.length),
            two_decimals(item.total_length),
            two_decimals(item.weight_kg),
            item.notes.clone(),
        ]);
    }

    let total: f64 = items.iter().filter_map(|item| item.weight_kg).sum();
    format!("{}\n\n{:<60} {:.2} kg", table.render(), "TOTAL STEEL:", total)
}

/// The summary statistics block. Sections for empty lists are left out.
pub fn format_statistics(summary: &Summary) -> String {
    let mut out = String::new();

    if summary.boq_items > 0 {
        let _ = writeln!(out, "Total Concrete Volume: {:.2} m³", summary.total_concrete_m3);
        let _ = writeln!(out, "Total Floor Area: {:.2} m²", summary.total_area_m2);
        let _ = writeln!(out, "Total BOQ Items: {}", summary.boq_items);
    }
    if summary.bbs_items > 0 {
        let _ = writeln!(out, "Total Steel Weight: {:.2} kg", summary.total_steel_kg);
        let _ = writeln!(out, "Total Steel Length: {:.2} m", summary.total_steel_length_m);
        let _ = writeln!(out, "Total BBS Items: {}", summary.bbs_items);
    }

    out
}

/// Bulleted list, one `• item` per line.
pub fn format_bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("• {}\n", item)).collect()
}

/// The full plain-text report written to `summary.txt`.
pub fn format_summary_report(result: &ExtractionResult) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "CONSTRUCTION QUANTITY SURVEYOR - REPORT");
    let _ = writeln!(out, "Generated with Google Gemini AI");
    let _ = writeln!(out, "{heavy}\n");
    let _ = writeln!(out, "Scale: {}\n", result.scale);

    let _ = writeln!(out, "BILL OF QUANTITIES");
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "{}\n", format_boq_table(&result.boq));

    let _ = writeln!(out, "BAR BENDING SCHEDULE");
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "{}\n", format_bbs_table(&result.bbs));

    if !result.notes.is_empty() {
        let _ = writeln!(out, "NOTES:");
        out.push_str(&format_bullets(&result.notes));
    }
    if !result.assumptions.is_empty() {
        let _ = writeln!(out, "\nASSUMPTIONS:");
        out.push_str(&format_bullets(&result.assumptions));
    }

    out
}
