//! Summary statistics over a normalized result.

use serde::Serialize;

use super::model::ExtractionResult;

/// Totals printed after the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of BOQ quantities in `m3`.
    pub total_concrete_m3: f64,
    /// Sum of BOQ quantities in `m2`.
    pub total_area_m2: f64,
    /// Number of BOQ lines.
    pub boq_items: usize,
    /// Sum of BBS weights; missing weights count as zero.
    pub total_steel_kg: f64,
    /// Sum of BBS total lengths; missing lengths count as zero.
    pub total_steel_length_m: f64,
    /// Number of BBS lines.
    pub bbs_items: usize,
}

impl Summary {
    /// Computes the totals for `result`.
    pub fn from_result(result: &ExtractionResult) -> Self {
        let quantity_in = |unit: &str| -> f64 {
            result
                .boq
                .iter()
                .filter(|item| item.unit.trim() == unit)
                .map(|item| item.quantity)
                .sum()
        };

        Self {
            total_concrete_m3: quantity_in("m3"),
            total_area_m2: quantity_in("m2"),
            boq_items: result.boq.len(),
            total_steel_kg: result.bbs.iter().filter_map(|b| b.weight_kg).sum(),
            total_steel_length_m: result.bbs.iter().filter_map(|b| b.total_length).sum(),
            bbs_items: result.bbs.len(),
        }
    }
}
