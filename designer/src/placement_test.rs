use super::*;
use crate::consts::DEFAULT_SECTION_ID;
use crate::doc::FormElement;

fn end_zone(doc: &FormDefinition) -> DropZone {
    DropZone::new(DEFAULT_SECTION_ID, doc.data.sections[0].rows.len())
}

// =============================================================
// TransferData
// =============================================================

#[test]
fn transfer_carries_tag_in_both_slots() {
    let data = TransferData::for_type(ElementType::MapLocationPicker);
    assert_eq!(data.get(DRAG_TYPE_KEY), Some("map_location_picker"));
    assert_eq!(data.get(DRAG_TEXT_KEY), Some("map_location_picker"));
    assert_eq!(data.element_tag(), Some("map_location_picker"));
}

#[test]
fn transfer_falls_back_to_text_slot() {
    let mut data = TransferData::default();
    data.set(DRAG_TYPE_KEY, "  ");
    data.set(DRAG_TEXT_KEY, "email");
    assert_eq!(data.element_tag(), Some("email"));
}

#[test]
fn transfer_empty_has_no_tag() {
    assert_eq!(TransferData::default().element_tag(), None);
}

// =============================================================
// State machine
// =============================================================

#[test]
fn starts_idle() {
    let engine = PlacementEngine::new();
    assert_eq!(engine.state(), &DragState::Idle);
    assert!(engine.hovered().is_none());
}

#[test]
fn drag_start_enters_dragging() {
    let mut engine = PlacementEngine::new();
    engine.drag_start(ElementType::Text);
    assert_eq!(engine.state(), &DragState::Dragging { element_type: ElementType::Text });
}

#[test]
fn hover_marks_and_leave_clears_zone() {
    let mut engine = PlacementEngine::new();
    engine.drag_start(ElementType::Text);
    let zone = DropZone::new("s", 0);
    engine.drag_over(zone.clone());
    assert!(engine.is_active(&zone));
    engine.drag_leave(&DropZone::new("s", 1));
    assert!(engine.is_active(&zone));
    engine.drag_leave(&zone);
    assert!(!engine.is_active(&zone));
}

#[test]
fn hover_while_idle_is_ignored() {
    let mut engine = PlacementEngine::new();
    engine.drag_over(DropZone::new("s", 0));
    assert!(engine.hovered().is_none());
}

#[test]
fn drag_end_always_clears_state() {
    let mut engine = PlacementEngine::new();
    engine.drag_start(ElementType::Rating);
    engine.drag_over(DropZone::new("s", 2));
    engine.drag_end();
    assert_eq!(engine.state(), &DragState::Idle);
    assert!(engine.hovered().is_none());
}

// =============================================================
// Drop
// =============================================================

#[test]
fn drop_text_at_end_of_empty_section() {
    let mut doc = FormDefinition::default();
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Text);
    let zone = end_zone(&doc);
    engine.drag_over(zone.clone());
    let outcome = engine.drop(&zone, &data, &mut doc).unwrap();

    let DropOutcome::Placed { element_id, row_index, .. } = outcome else {
        panic!("expected placement");
    };
    assert_eq!(row_index, 0);
    let section = &doc.data.sections[0];
    assert_eq!(section.rows.len(), 1);
    assert_eq!(section.rows[0].columns.len(), 1);
    let FormElement::Field(field) = &section.rows[0].columns[0].element else {
        panic!("expected field");
    };
    assert_eq!(field.base.id, element_id);
    assert_eq!(field.element_type, ElementType::Text);
    assert_eq!(field.label, "Text Field");
    assert_eq!(engine.state(), &DragState::Idle);
    assert!(engine.hovered().is_none());
}

#[test]
fn drop_before_existing_row() {
    let mut doc = FormDefinition::default();
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Text);
    engine.drop(&end_zone(&doc), &data, &mut doc).unwrap();
    let data = engine.drag_start(ElementType::Title);
    engine.drop(&DropZone::new(DEFAULT_SECTION_ID, 0), &data, &mut doc).unwrap();
    let rows = &doc.data.sections[0].rows;
    assert_eq!(rows[0].columns[0].element.element_type(), ElementType::Title);
    assert_eq!(rows[1].columns[0].element.element_type(), ElementType::Text);
}

#[test]
fn drop_with_empty_payload_uses_drag_type() {
    let mut doc = FormDefinition::default();
    let mut engine = PlacementEngine::new();
    engine.drag_start(ElementType::Date);
    let outcome = engine.drop(&end_zone(&doc), &TransferData::default(), &mut doc).unwrap();
    assert!(matches!(outcome, DropOutcome::Placed { .. }));
    assert_eq!(doc.elements().next().map(FormElement::element_type), Some(ElementType::Date));
}

#[test]
fn drop_with_no_payload_while_idle_is_noop() {
    let mut doc = FormDefinition::default();
    let before = doc.clone();
    let mut engine = PlacementEngine::new();
    let outcome = engine.drop(&end_zone(&doc), &TransferData::default(), &mut doc).unwrap();
    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(doc, before);
}

#[test]
fn drop_unknown_tag_reports_schema_error_and_resets() {
    let mut doc = FormDefinition::default();
    let before = doc.clone();
    let mut engine = PlacementEngine::new();
    engine.drag_start(ElementType::Text);
    let mut data = TransferData::default();
    data.set(DRAG_TYPE_KEY, "hologram");
    let err = engine.drop(&end_zone(&doc), &data, &mut doc).unwrap_err();
    assert!(matches!(err, EditorError::UnknownType(ref t) if t == "hologram"));
    assert_eq!(doc, before);
    assert_eq!(engine.state(), &DragState::Idle);
}

#[test]
fn drop_type_missing_from_registry_reports_schema_error() {
    let mut doc = FormDefinition::default();
    doc.schema.remove(ElementType::Color);
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Color);
    let result = engine.drop(&end_zone(&doc), &data, &mut doc);
    assert!(matches!(result, Err(EditorError::UnknownType(_))));
    assert!(doc.data.sections[0].rows.is_empty());
}

#[test]
fn drop_on_missing_section_is_noop() {
    let mut doc = FormDefinition::default();
    let before = doc.clone();
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Text);
    let outcome = engine.drop(&DropZone::new("gone", 0), &data, &mut doc).unwrap();
    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(doc, before);
    assert!(!engine.is_dragging());
}

#[test]
fn drop_on_canvas_appends_to_first_section() {
    let mut doc = FormDefinition::default();
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Text);
    engine.drop(&end_zone(&doc), &data, &mut doc).unwrap();
    let data = engine.drag_start(ElementType::Email);
    engine.drop_on_canvas(&data, &mut doc).unwrap();
    let rows = &doc.data.sections[0].rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].columns[0].element.element_type(), ElementType::Email);
}

#[test]
fn drop_on_canvas_without_sections_is_noop() {
    let mut doc = FormDefinition::default();
    doc.data.sections.clear();
    let mut engine = PlacementEngine::new();
    let data = engine.drag_start(ElementType::Text);
    assert_eq!(engine.drop_on_canvas(&data, &mut doc).unwrap(), DropOutcome::Ignored);
    assert!(!engine.is_dragging());
}

// =============================================================
// Zones
// =============================================================

#[test]
fn zones_cover_every_row_boundary() {
    let mut doc = FormDefinition::default();
    doc.data.sections.push(crate::doc::Section { id: "s2".into(), title: "Two".into(), rows: Vec::new() });
    let mut engine = PlacementEngine::new();
    for _ in 0..2 {
        let data = engine.drag_start(ElementType::Text);
        engine.drop(&end_zone(&doc), &data, &mut doc).unwrap();
    }
    let zones = drop_zones(&doc);
    assert_eq!(
        zones,
        vec![
            DropZone::new(DEFAULT_SECTION_ID, 0),
            DropZone::new(DEFAULT_SECTION_ID, 1),
            DropZone::new(DEFAULT_SECTION_ID, 2),
            DropZone::new("s2", 0),
        ]
    );
}
