//! Quantity normalizer: recomputes BBS steel weights.
//!
//! `weight_kg = round((dia_mm² / 162) × total_length × 1.02, 2)`. `dia² / 162`
//! is the unit weight of a bar in kg/m and `1.02` adds 2 % wastage. No other
//! field is touched.

use super::error::NormalizationError;
use super::model::{BbsItem, ExtractionResult};

/// Divisor giving kg/m from the squared bar diameter in mm.
pub const UNIT_WEIGHT_DIVISOR: f64 = 162.0;

/// Wastage allowance applied to every bar.
pub const WASTAGE_FACTOR: f64 = 1.02;

/// Default relative tolerance for the length-consistency check.
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.01;

/// Steel weight in kg for `total_length_m` metres of `dia_mm` bar, wastage
/// included, rounded to two decimals.
///
/// Rounding works on the exact binary value with ties going to the even
/// digit, so a product landing on `x.xx5` may round either way.
///
/// ```
/// use quantity_surveyor::extraction::steel_weight_kg;
///
/// assert_eq!(steel_weight_kg(12.0, 17.6), 15.96);
/// assert_eq!(steel_weight_kg(10.0, 12.0), 7.56);
/// ```
pub fn steel_weight_kg(dia_mm: f64, total_length_m: f64) -> f64 {
    round2(dia_mm * dia_mm / UNIT_WEIGHT_DIVISOR * total_length_m * WASTAGE_FACTOR)
}

fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Normalizer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Compare `total_length` with `count × length` and note mismatches.
    pub check_lengths: bool,
    /// Relative difference allowed by the length check.
    pub length_tolerance: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            check_lengths: false,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
        }
    }
}

/// What a normalization pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    /// Number of BBS items whose weight was recomputed.
    pub recomputed: usize,
    /// Per-item problems, in BBS order.
    pub diagnostics: Vec<NormalizationError>,
}

impl NormalizationReport {
    /// True when every item was recomputed without remarks.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Recomputes `weight_kg` for every BBS item in place.
///
/// An item lacking a numeric `dia_mm` or `total_length` keeps its original
/// weight; the problem is recorded in the report and appended to `notes`.
/// Running the normalizer again only re-adds notes that are not already there.
pub fn normalize(result: &mut ExtractionResult, options: &NormalizeOptions) -> NormalizationReport {
    let mut report = NormalizationReport::default();

    for item in result.bbs.iter_mut() {
        match recompute(item) {
            Ok(()) => report.recomputed += 1,
            Err(e) => {
                tracing::warn!(error = %e, "BBS item skipped");
                report.diagnostics.push(e);
                continue;
            }
        }

        if options.check_lengths {
            if let Some(mismatch) = check_length(item, options.length_tolerance) {
                tracing::warn!(error = %mismatch, "BBS length inconsistency");
                report.diagnostics.push(mismatch);
            }
        }
    }

    for diagnostic in &report.diagnostics {
        let note = diagnostic.to_string();
        if !result.notes.contains(&note) {
            result.notes.push(note);
        }
    }

    tracing::debug!(
        recomputed = report.recomputed,
        diagnostics = report.diagnostics.len(),
        "BBS weights normalized"
    );

    report
}

fn recompute(item: &mut BbsItem) -> Result<(), NormalizationError> {
    let dia_mm = item.dia_mm.ok_or_else(|| NormalizationError::MissingField {
        mark: item.mark.clone(),
        field: "dia_mm",
    })?;
    let total_length = item.total_length.ok_or_else(|| NormalizationError::MissingField {
        mark: item.mark.clone(),
        field: "total_length",
    })?;

    item.weight_kg = Some(steel_weight_kg(dia_mm, total_length));
    Ok(())
}

fn check_length(item: &BbsItem, tolerance: f64) -> Option<NormalizationError> {
    let count = item.count?;
    let length = item.length?;
    let total_length = item.total_length?;

    let expected = round2(count as f64 * length);
    let reference = expected.abs().max(f64::EPSILON);
    if (total_length - expected).abs() / reference > tolerance {
        Some(NormalizationError::LengthMismatch {
            mark: item.mark.clone(),
            total_length,
            expected,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bar(mark: &str, dia_mm: Option<f64>, count: u64, length: f64, total_length: Option<f64>) -> BbsItem {
        BbsItem {
            mark: mark.to_string(),
            member: "Footing main".to_string(),
            dia_mm,
            count: Some(count),
            length: Some(length),
            total_length,
            weight_kg: Some(1.32),
            notes: "12mm @ 200mm c/c".to_string(),
        }
    }

    #[test]
    fn test_weight_formula() {
        assert_eq!(steel_weight_kg(12.0, 17.6), 15.96);
        assert_eq!(steel_weight_kg(8.0, 33.0), 13.3);
        assert_eq!(steel_weight_kg(16.0, 9.6), 15.47);
        assert_eq!(steel_weight_kg(10.0, 0.0), 0.0);
        // raw 2.125 rounds to even
        assert_eq!(steel_weight_kg(25.0, 0.54), 2.12);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(15.957), 15.96);
    }

    #[test]
    fn test_only_weight_changes() {
        let mut result = ExtractionResult {
            scale: "1:100".to_string(),
            bbs: vec![
                bar("B1", Some(12.0), 8, 2.2, Some(17.6)),
                bar("B2", None, 3, 1.0, Some(3.0)),
                bar("B3", Some(8.0), 15, 2.2, Some(33.0)),
            ],
            ..Default::default()
        };
        let before = result.clone();

        normalize(&mut result, &NormalizeOptions::default());

        assert_eq!(result.scale, before.scale);
        let masked = |items: &[BbsItem]| -> Vec<BbsItem> {
            items
                .iter()
                .cloned()
                .map(|item| BbsItem { weight_kg: None, ..item })
                .collect()
        };
        assert_eq!(masked(&result.bbs), masked(&before.bbs));
    }

    #[test]
    fn test_overwrites_model_weight() {
        let mut result = ExtractionResult {
            bbs: vec![bar("F1-M1", Some(12.0), 8, 2.2, Some(17.6))],
            ..Default::default()
        };

        let report = normalize(&mut result, &NormalizeOptions::default());

        assert_eq!(result.bbs[0].weight_kg, Some(15.96));
        assert_eq!(report.recomputed, 1);
        assert!(report.is_clean());
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_missing_dia_skips_item() {
        let mut result = ExtractionResult {
            bbs: vec![
                bar("B1", None, 8, 2.2, Some(17.6)),
                bar("B2", Some(10.0), 10, 1.2, Some(12.0)),
            ],
            ..Default::default()
        };

        let report = normalize(&mut result, &NormalizeOptions::default());

        assert_eq!(result.bbs[0].weight_kg, Some(1.32));
        assert_eq!(result.bbs[1].weight_kg, Some(7.56));
        assert_eq!(report.recomputed, 1);
        assert_eq!(
            report.diagnostics,
            vec![NormalizationError::MissingField {
                mark: "B1".to_string(),
                field: "dia_mm",
            }]
        );
        assert_eq!(result.notes, vec!["BBS item 'B1' is missing a numeric dia_mm".to_string()]);
    }

    #[test]
    fn test_idempotent() {
        let mut result = ExtractionResult {
            bbs: vec![
                bar("B1", Some(12.0), 8, 2.2, Some(17.6)),
                bar("B2", Some(8.0), 3, 1.0, None),
            ],
            ..Default::default()
        };

        normalize(&mut result, &NormalizeOptions::default());
        let once = result.clone();
        normalize(&mut result, &NormalizeOptions::default());

        assert_eq!(result, once);
    }

    #[test]
    fn test_length_check_off_by_default() {
        let mut result = ExtractionResult {
            bbs: vec![bar("B1", Some(12.0), 8, 2.2, Some(20.0))],
            ..Default::default()
        };

        let report = normalize(&mut result, &NormalizeOptions::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_length_check_notes_mismatch() {
        let mut result = ExtractionResult {
            bbs: vec![
                bar("B1", Some(12.0), 8, 2.2, Some(20.0)),
                bar("B2", Some(12.0), 8, 2.2, Some(17.65)),
            ],
            ..Default::default()
        };
        let options = NormalizeOptions {
            check_lengths: true,
            ..Default::default()
        };

        let report = normalize(&mut result, &options);

        assert_eq!(report.recomputed, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            &report.diagnostics[0],
            NormalizationError::LengthMismatch { mark, expected, .. } if mark == "B1" && *expected == 17.6
        ));
        // weight still follows the stated total length
        assert_eq!(result.bbs[0].total_length, Some(20.0));
        assert_eq!(result.bbs[0].weight_kg, Some(steel_weight_kg(12.0, 20.0)));
    }
}
