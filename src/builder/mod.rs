//! Builder operations over the ordered field sequence.
//!
//! Every operation leaves its input untouched and returns the new sequence, or `None`
//! when the request is a no-op so callers can keep the previous sequence as-is.

use serde::{Deserialize, Serialize};

use crate::models::{create_field, Field, FieldPatch, FieldType};

/// One draggable palette entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaletteEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: &'static str,
}

/// Components that can be dropped onto the canvas.
pub const PALETTE: [PaletteEntry; 8] = [
    PaletteEntry { kind: "text", label: "Text" },
    PaletteEntry { kind: "email", label: "Email" },
    PaletteEntry { kind: "textarea", label: "Textarea" },
    PaletteEntry { kind: "checkbox", label: "Checkbox" },
    PaletteEntry { kind: "select", label: "Dropdown" },
    PaletteEntry { kind: "radio", label: "Radio" },
    PaletteEntry { kind: "date", label: "Date" },
    PaletteEntry { kind: "number", label: "Number" },
];

/// Resolve a drop payload against the palette.
pub fn palette_kind(payload: Option<&str>) -> Option<FieldType> {
    let payload = payload?.trim();
    PALETTE
        .iter()
        .find(|entry| entry.kind == payload)
        .map(|entry| FieldType::from(entry.kind))
}

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i8")]
pub enum Direction {
    Up,
    Down,
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(format!("direction must be -1 or 1, got {}", other)),
        }
    }
}

/// Append a new field of `kind`.
pub fn add_field(fields: &[Field], kind: impl Into<FieldType>) -> Vec<Field> {
    let mut next = fields.to_vec();
    next.push(create_field(kind));
    next
}

/// Append a field for a palette drop. Missing or unknown payloads are ignored.
pub fn drop_field(fields: &[Field], payload: Option<&str>) -> Option<Vec<Field>> {
    palette_kind(payload).map(|kind| add_field(fields, kind))
}

/// Swap the field at `index` with its neighbour in `direction`.
pub fn move_field(fields: &[Field], index: usize, direction: Direction) -> Option<Vec<Field>> {
    if index >= fields.len() {
        return None;
    }
    let target = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    if target >= fields.len() {
        return None;
    }

    let mut next = fields.to_vec();
    next.swap(index, target);
    Some(next)
}

/// Remove the field at `index`, keeping the order of the rest.
pub fn remove_field(fields: &[Field], index: usize) -> Option<Vec<Field>> {
    if index >= fields.len() {
        return None;
    }
    let mut next = fields.to_vec();
    next.remove(index);
    Some(next)
}

/// Merge `patch` into the field with `id`. Unknown ids are ignored.
pub fn update_field(fields: &[Field], id: &str, patch: &FieldPatch) -> Option<Vec<Field>> {
    if !fields.iter().any(|f| f.id == id) {
        return None;
    }
    Some(
        fields
            .iter()
            .map(|f| if f.id == id { patch.apply(f) } else { f.clone() })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.label.as_str()).collect()
    }

    fn abc() -> Vec<Field> {
        let mut fields = Vec::new();
        for label in ["A", "B", "C"] {
            fields = add_field(&fields, "text");
            fields.last_mut().unwrap().label = label.to_string();
        }
        fields
    }

    #[test]
    fn test_move_up_swaps_with_previous() {
        let fields = abc();
        let moved = move_field(&fields, 1, Direction::Up).unwrap();
        assert_eq!(labels(&moved), ["B", "A", "C"]);
        assert_eq!(labels(&fields), ["A", "B", "C"]);
    }

    #[test]
    fn test_move_out_of_bounds_is_noop() {
        let fields = abc();
        assert!(move_field(&fields, 0, Direction::Up).is_none());
        assert!(move_field(&fields, 2, Direction::Down).is_none());
        assert!(move_field(&fields, 7, Direction::Up).is_none());
    }

    #[test]
    fn test_remove_preserves_order() {
        let fields = abc();
        let next = remove_field(&fields, 1).unwrap();
        assert_eq!(labels(&next), ["A", "C"]);
        assert!(remove_field(&next, 2).is_none());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let fields = abc();
        let patch = FieldPatch {
            label: Some("Z".into()),
            ..Default::default()
        };
        assert!(update_field(&fields, "nope", &patch).is_none());

        let id = fields[2].id.clone();
        let next = update_field(&fields, &id, &patch).unwrap();
        assert_eq!(labels(&next), ["A", "B", "Z"]);
    }

    #[test]
    fn test_drop_payload_must_name_palette_entry() {
        assert!(drop_field(&[], None).is_none());
        assert!(drop_field(&[], Some("")).is_none());
        assert!(drop_field(&[], Some("signature")).is_none());

        let next = drop_field(&[], Some("select")).unwrap();
        assert_eq!(next[0].kind, FieldType::Select);
        assert_eq!(next[0].label, "Select field");
    }

    #[test]
    fn test_mixed_sequence_keeps_ids_unique() {
        let mut fields = Vec::new();
        let mut expected = HashSet::new();
        for (step, entry) in PALETTE.iter().cycle().take(20).enumerate() {
            fields = add_field(&fields, entry.kind);
            expected.insert(fields.last().unwrap().id.clone());
            if step % 3 == 2 {
                let gone = fields[0].id.clone();
                fields = remove_field(&fields, 0).unwrap();
                expected.remove(&gone);
            }
            if step % 4 == 1 {
                if let Some(next) = move_field(&fields, fields.len() - 1, Direction::Up) {
                    fields = next;
                }
            }
        }

        let ids: HashSet<_> = fields.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids.len(), fields.len());
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_direction_from_wire() {
        let up: Direction = serde_json::from_str("-1").unwrap();
        assert_eq!(up, Direction::Up);
        assert!(serde_json::from_str::<Direction>("2").is_err());
    }
}
