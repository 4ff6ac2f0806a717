//! The instruction sent with every drawing.

/// Asks the model to act as a quantity surveyor and reply with one fenced
/// JSON object shaped like [`ExtractionResult`](super::ExtractionResult).
pub const EXTRACTION_PROMPT: &str = r#"You are an expert Construction Quantity Surveyor analyzing this PDF drawing.

EXTRACT ALL QUANTITIES FOR:

A. FOUNDATION
   - PCC bed: length × breadth × thickness → volume (m³)
   - RCC footing: length × breadth × depth → volume (m³)
   - Reinforcement bars: diameter (mm), spacing, count

B. SLAB
   - RCC slab: length × breadth × thickness → volume (m³)
   - Reinforcement: main & distribution bars

C. STAIRCASE
   - Dimensions: tread, riser, width
   - Number of steps
   - Concrete volume (m³)

D. ROOM AREAS
   - Each room: length × breadth → area (m²)

E. STEEL (BBS)
   For each member:
   - Bar diameter (mm)
   - Number of bars
   - Total length (m)
   - Weight (kg) = (diameter²/162) × total_length

RULES:
1. Detect scale (e.g., "1:100", "1\" = 8'0\"")
2. Convert ALL to METERS (1 ft = 0.3048 m, 1 in = 0.0254 m)
3. Extract from ALL views (plan, section, elevation, details)
4. State assumptions if dimensions missing

OUTPUT ONLY THIS JSON (no other text):

```json
{
  "scale": "1:100",
  "boq": [
    {
      "component": "Foundation F1",
      "type": "PCC Bed",
      "length": 2.0,
      "breadth": 2.0,
      "depth": 0.15,
      "quantity": 0.6,
      "unit": "m3",
      "source": "Foundation detail",
      "confidence": "High"
    },
    {
      "component": "Bedroom 1",
      "type": "Room Area",
      "length": 2.52,
      "breadth": 3.13,
      "depth": 0.0,
      "quantity": 7.89,
      "unit": "m2",
      "source": "Plan view",
      "confidence": "High"
    }
  ],
  "bbs": [
    {
      "mark": "F1-M1",
      "member": "Footing main",
      "dia_mm": 12,
      "count": 8,
      "length": 2.2,
      "total_length": 17.6,
      "weight_kg": 1.32,
      "notes": "12mm @ 200mm c/c"
    }
  ],
  "notes": [
    "Scale: 1:100",
    "All units in meters"
  ],
  "assumptions": [
    "Slab thickness 150mm assumed where not specified"
  ]
}
```

Extract NOW. Output ONLY valid JSON."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::parse_response;

    #[test]
    fn test_prompt_example_parses() {
        let example = parse_response(EXTRACTION_PROMPT).unwrap();
        assert_eq!(example.scale, "1:100");
        assert_eq!(example.boq.len(), 2);
        assert_eq!(example.bbs[0].mark, "F1-M1");
    }

    #[test]
    fn test_prompt_ends_with_instruction() {
        assert!(EXTRACTION_PROMPT.ends_with("Output ONLY valid JSON."));
    }
}
