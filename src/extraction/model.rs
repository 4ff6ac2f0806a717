//! Extraction result types.
//!
//! The model writes these by hand, so deserialization is forgiving: missing
//! keys and `null` take defaults, numbers may arrive as strings, and a bad BBS
//! number becomes `None` for the normalizer to report instead of failing the
//! whole document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Scale reported when the drawing's scale is unknown.
pub const UNKNOWN_SCALE: &str = "Unknown";

/// The structured output of one drawing analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Drawing scale as written on the drawing, e.g. `1:100`.
    #[serde(default = "unknown_scale", deserialize_with = "scale_or_unknown")]
    pub scale: String,
    /// Bill of quantities.
    #[serde(default, deserialize_with = "null_as_default")]
    pub boq: Vec<BoqItem>,
    /// Bar bending schedule.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bbs: Vec<BbsItem>,
    /// Free-form notes, including pipeline diagnostics.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub notes: Vec<String>,
    /// Assumptions the model made for missing dimensions.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub assumptions: Vec<String>,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            scale: unknown_scale(),
            boq: Vec::new(),
            bbs: Vec::new(),
            notes: Vec::new(),
            assumptions: Vec::new(),
        }
    }
}

impl ExtractionResult {
    /// The result returned when a response could not be parsed.
    pub fn placeholder(diagnostic: impl Into<String>) -> Self {
        Self {
            notes: vec![diagnostic.into()],
            ..Self::default()
        }
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.boq.is_empty() && self.bbs.is_empty()
    }
}

/// One bill-of-quantities line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoqItem {
    /// Element name, e.g. `Foundation F1`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub component: String,
    /// Category, e.g. `PCC Bed`, `Room Area`.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// Length in metres.
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub length: f64,
    /// Breadth in metres.
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub breadth: f64,
    /// Depth in metres; `0` for areas.
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub depth: f64,
    /// Computed quantity in `unit`.
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub quantity: f64,
    /// `m3` or `m2`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,
    /// Drawing view the value came from.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    /// `High`, `Medium` or `Low`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub confidence: String,
}

/// One bar-bending-schedule line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BbsItem {
    /// Bar mark, e.g. `F1-M1`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub mark: String,
    /// Structural member the bars belong to.
    #[serde(default, deserialize_with = "lenient_string")]
    pub member: String,
    /// Bar diameter in millimetres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dia_mm: Option<f64>,
    /// Number of bars.
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u64>,
    /// Length of one bar in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: Option<f64>,
    /// Total bar length in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_length: Option<f64>,
    /// Steel weight in kilograms. Overwritten by the normalizer.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight_kg: Option<f64>,
    /// Spacing or other remarks, e.g. `12mm @ 200mm c/c`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
}

fn unknown_scale() -> String {
    UNKNOWN_SCALE.to_string()
}

/// Reads a JSON number, or a string holding one.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn string_from_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scale_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let scale = lenient_string(deserializer)?;
    if scale.trim().is_empty() {
        Ok(unknown_scale())
    } else {
        Ok(scale)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_from_value(Value::deserialize(deserializer)?))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(string_from_value)
            .collect(),
        Value::Null => Vec::new(),
        single => vec![string_from_value(single)],
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v < u64::MAX as f64)
        .map(|v| v as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_top_level_keys_default() {
        let result: ExtractionResult = serde_json::from_str(r#"{"boq": []}"#).unwrap();
        assert_eq!(result, ExtractionResult::default());
        assert_eq!(result.scale, "Unknown");
    }

    #[test]
    fn test_nulls_take_defaults() {
        let result: ExtractionResult = serde_json::from_str(
            r#"{"scale": null, "boq": null, "bbs": null, "notes": null, "assumptions": ["a", null]}"#,
        )
        .unwrap();
        assert_eq!(result.scale, "Unknown");
        assert!(result.boq.is_empty());
        assert_eq!(result.assumptions, vec!["a".to_string()]);
    }

    #[test]
    fn test_boq_type_key_and_numeric_strings() {
        let item: BoqItem = serde_json::from_str(
            r#"{"component": "Slab S1", "type": "RCC Slab", "length": "4.5", "breadth": 3,
                "quantity": 2.03, "unit": "m3"}"#,
        )
        .unwrap();

        assert_eq!(item.kind, "RCC Slab");
        assert_eq!(item.length, 4.5);
        assert_eq!(item.breadth, 3.0);
        assert_eq!(item.depth, 0.0);
        assert_eq!(item.source, "");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "RCC Slab");
    }

    #[test]
    fn test_count_beyond_u64_becomes_none() {
        let item: BbsItem =
            serde_json::from_str(r#"{"mark": "B1", "count": 1e30, "length": 2.2}"#).unwrap();
        assert_eq!(item.count, None);

        let item: BbsItem = serde_json::from_str(r#"{"mark": "B2", "count": "12"}"#).unwrap();
        assert_eq!(item.count, Some(12));
    }

    #[test]
    fn test_bbs_bad_numbers_become_none() {
        let item: BbsItem = serde_json::from_str(
            r#"{"mark": "B1", "dia_mm": "n/a", "count": 8.5, "total_length": "17.6"}"#,
        )
        .unwrap();

        assert_eq!(item.dia_mm, None);
        assert_eq!(item.count, None);
        assert_eq!(item.total_length, Some(17.6));
        assert_eq!(item.weight_kg, None);
    }

    #[test]
    fn test_count_accepts_whole_floats() {
        let item: BbsItem = serde_json::from_str(r#"{"count": 8.0}"#).unwrap();
        assert_eq!(item.count, Some(8));
        let item: BbsItem = serde_json::from_str(r#"{"count": -2}"#).unwrap();
        assert_eq!(item.count, None);
    }

    #[test]
    fn test_placeholder() {
        let result = ExtractionResult::placeholder("Parsing failed");
        assert_eq!(result.scale, "Unknown");
        assert!(result.is_empty());
        assert!(result.assumptions.is_empty());
        assert_eq!(result.notes, vec!["Parsing failed".to_string()]);
    }
}
