use serde_json::json;

use super::*;
use crate::schema::{ComponentDefinition, DefaultProps};

fn doc_with_rows() -> FormDefinition {
    let mut doc = FormDefinition::default();
    for ty in [ElementType::Text, ElementType::Email, ElementType::Title] {
        let el = doc.create_element(ty).unwrap();
        let len = doc.data.sections[0].rows.len();
        doc.insert_row(DEFAULT_SECTION_ID, len, el).unwrap();
    }
    doc
}

fn element_at(doc: &FormDefinition, row: usize, col: usize) -> &FormElement {
    &doc.data.sections[0].rows[row].columns[col].element
}

fn with_meta(mut el: FormElement) -> FormElement {
    let base = el.base_mut();
    base.subtitle = Some("sub".into());
    base.description = Some("desc".into());
    base.photo = Some("https://example.com/p.png".into());
    el
}

// =============================================================
// Default document
// =============================================================

#[test]
fn default_document_has_one_empty_section() {
    let doc = FormDefinition::default();
    assert_eq!(doc.data.sections.len(), 1);
    assert_eq!(doc.data.sections[0].id, "section-1");
    assert_eq!(doc.data.sections[0].title, "Section 1");
    assert!(doc.data.sections[0].rows.is_empty());
    assert_eq!(doc.config.version, "1.0.0");
    assert_eq!(doc.config.name, "New Form");
    assert!(doc.config.uid.starts_with("form-"));
    assert_eq!(doc.schema.len(), ElementType::ALL.len());
}

#[test]
fn default_documents_get_distinct_uids() {
    assert_ne!(FormDefinition::default().config.uid, FormDefinition::default().config.uid);
}

#[test]
fn rename_changes_only_name() {
    let mut doc = FormDefinition::default();
    let uid = doc.config.uid.clone();
    doc.rename("Registration");
    assert_eq!(doc.config.name, "Registration");
    assert_eq!(doc.config.uid, uid);
}

// =============================================================
// create_element
// =============================================================

#[test]
fn create_text_element_uses_registry_defaults() {
    let doc = FormDefinition::default();
    let el = doc.create_element(ElementType::Text).unwrap();
    let FormElement::Field(field) = &el else {
        panic!("expected field, got {el:?}");
    };
    assert_eq!(field.element_type, ElementType::Text);
    assert_eq!(field.label, "Text Field");
    assert_eq!(field.placeholder.as_deref(), Some("Enter text"));
    assert!(field.base.id.starts_with("text-"));
}

#[test]
fn create_display_element_has_content() {
    let doc = FormDefinition::default();
    let el = doc.create_element(ElementType::Paragraph).unwrap();
    assert_eq!(el.kind(), ElementKind::Display);
    assert_eq!(el.primary_text(), "New paragraph text.");
}

#[test]
fn create_element_ids_are_unique() {
    let doc = FormDefinition::default();
    let a = doc.create_element(ElementType::Text).unwrap();
    let b = doc.create_element(ElementType::Text).unwrap();
    assert_ne!(a.id(), b.id());
}

#[test]
fn create_element_unknown_to_registry_fails() {
    let mut doc = FormDefinition::default();
    doc.schema.remove(ElementType::Rating);
    let err = doc.create_element(ElementType::Rating).unwrap_err();
    assert!(matches!(err, EditorError::UnknownType(ref t) if t == "rating"));
}

#[test]
fn create_element_uses_registry_key_over_default_type() {
    let mut doc = FormDefinition::default();
    doc.schema.insert(
        ElementType::Phone,
        ComponentDefinition {
            category: "Data Entry".into(),
            icon: "phone".into(),
            default_props: DefaultProps {
                element_type: Some(ElementType::Text),
                label: Some("Phone".into()),
                ..DefaultProps::default()
            },
        },
    );
    let el = doc.create_element(ElementType::Phone).unwrap();
    assert_eq!(el.element_type(), ElementType::Phone);
}

// =============================================================
// insert_row
// =============================================================

#[test]
fn insert_row_grows_by_one_at_index() {
    let mut doc = doc_with_rows();
    let el = doc.create_element(ElementType::Number).unwrap();
    let id = el.id().to_owned();
    let at = doc.insert_row(DEFAULT_SECTION_ID, 1, el).unwrap();
    assert_eq!(at, 1);
    assert_eq!(doc.data.sections[0].rows.len(), 4);
    assert_eq!(element_at(&doc, 1, 0).id(), id);
    assert_eq!(element_at(&doc, 2, 0).element_type(), ElementType::Email);
}

#[test]
fn insert_row_wraps_in_full_width_column() {
    let mut doc = FormDefinition::default();
    let el = doc.create_element(ElementType::Text).unwrap();
    doc.insert_row(DEFAULT_SECTION_ID, 0, el).unwrap();
    let row = &doc.data.sections[0].rows[0];
    assert_eq!(row.columns.len(), 1);
    assert_eq!(row.columns[0].width, ColumnWidth::Full);
    assert!(row.condition.is_none());
    assert_ne!(row.id, row.columns[0].id);
}

#[test]
fn insert_row_past_end_appends() {
    let mut doc = doc_with_rows();
    let el = doc.create_element(ElementType::Date).unwrap();
    let at = doc.insert_row(DEFAULT_SECTION_ID, 99, el).unwrap();
    assert_eq!(at, 3);
    assert_eq!(element_at(&doc, 3, 0).element_type(), ElementType::Date);
}

#[test]
fn insert_row_missing_section_leaves_doc_unchanged() {
    let mut doc = doc_with_rows();
    let before = doc.clone();
    let el = doc.create_element(ElementType::Text).unwrap();
    let err = doc.insert_row("nope", 0, el).unwrap_err();
    assert!(matches!(err, EditorError::MissingTarget { kind: TargetKind::Section, .. }));
    assert_eq!(doc, before);
}

// =============================================================
// delete_element
// =============================================================

#[test]
fn delete_only_element_removes_just_that_row() {
    let mut doc = doc_with_rows();
    let id = element_at(&doc, 1, 0).id().to_owned();
    assert_eq!(doc.delete_element(&id), 1);
    let rows = &doc.data.sections[0].rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].columns[0].element.element_type(), ElementType::Text);
    assert_eq!(rows[1].columns[0].element.element_type(), ElementType::Title);
}

#[test]
fn delete_removes_siblings_in_same_row() {
    let mut doc = doc_with_rows();
    let x = element_at(&doc, 0, 0).id().to_owned();
    let y = doc.duplicate_element(&x).unwrap();
    assert_eq!(doc.data.sections[0].rows[0].columns.len(), 2);
    doc.delete_element(&x);
    assert!(doc.find_element(&x).is_none());
    assert!(doc.find_element(&y).is_none());
    assert_eq!(doc.data.sections[0].rows.len(), 2);
}

#[test]
fn delete_column_only_policy_keeps_siblings() {
    let mut doc = doc_with_rows();
    let x = element_at(&doc, 0, 0).id().to_owned();
    let y = doc.duplicate_element(&x).unwrap();
    assert_eq!(doc.delete_element_with(&x, DeletePolicy::ColumnOnly), 0);
    assert!(doc.find_element(&x).is_none());
    assert!(doc.find_element(&y).is_some());
    assert_eq!(doc.data.sections[0].rows.len(), 3);
}

#[test]
fn delete_column_only_drops_emptied_row() {
    let mut doc = doc_with_rows();
    let x = element_at(&doc, 2, 0).id().to_owned();
    assert_eq!(doc.delete_element_with(&x, DeletePolicy::ColumnOnly), 1);
    assert_eq!(doc.data.sections[0].rows.len(), 2);
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut doc = doc_with_rows();
    let before = doc.clone();
    assert_eq!(doc.delete_element("ghost"), 0);
    assert_eq!(doc, before);
}

// =============================================================
// duplicate_element
// =============================================================

#[test]
fn duplicate_inserts_column_after_original_with_same_width() {
    let mut doc = doc_with_rows();
    doc.data.sections[0].rows[0].columns[0].width = ColumnWidth::Half;
    let x = element_at(&doc, 0, 0).id().to_owned();
    let new_id = doc.duplicate_element(&x).unwrap();
    let row = &doc.data.sections[0].rows[0];
    assert_eq!(row.columns.len(), 2);
    assert_eq!(row.columns[1].width, ColumnWidth::Half);
    assert_eq!(row.columns[1].element.id(), new_id);
    assert_ne!(new_id, x);
    assert_ne!(row.columns[1].id, row.columns[0].id);
    assert_eq!(row.columns[1].element.primary_text(), row.columns[0].element.primary_text());
    assert_eq!(doc.data.sections[0].rows.len(), 3);
}

#[test]
fn duplicate_middle_column_lands_at_next_index() {
    let mut doc = doc_with_rows();
    let x = element_at(&doc, 0, 0).id().to_owned();
    let second = doc.duplicate_element(&x).unwrap();
    doc.duplicate_element(&x).unwrap();
    let row = &doc.data.sections[0].rows[0];
    assert_eq!(row.columns.len(), 3);
    assert_eq!(row.columns[0].element.id(), x);
    assert_eq!(row.columns[2].element.id(), second);
}

#[test]
fn duplicate_missing_element_errors() {
    let mut doc = doc_with_rows();
    let err = doc.duplicate_element("ghost").unwrap_err();
    assert!(matches!(err, EditorError::MissingTarget { kind: TargetKind::Element, .. }));
}

// =============================================================
// morph
// =============================================================

#[test]
fn morph_field_to_field_keeps_label() {
    let doc = FormDefinition::default();
    let el = with_meta(doc.create_element(ElementType::Text).unwrap());
    let morphed = doc.morph_element_type(&el, ElementType::Select).unwrap();
    let FormElement::Field(f) = &morphed else {
        panic!("expected field");
    };
    assert_eq!(f.label, "Text Field");
    assert_eq!(f.element_type, ElementType::Select);
    assert_eq!(f.options.as_ref().map(Vec::len), Some(3));
    assert_eq!(f.placeholder, None);
    assert_eq!(f.base.id, el.id());
}

#[test]
fn morph_display_to_display_keeps_content() {
    let doc = FormDefinition::default();
    let mut el = doc.create_element(ElementType::Title).unwrap();
    el.set_primary_text("Welcome");
    let morphed = doc.morph_element_type(&el, ElementType::Paragraph).unwrap();
    assert_eq!(morphed.kind(), ElementKind::Display);
    assert_eq!(morphed.primary_text(), "Welcome");
}

#[test]
fn morph_field_to_display_maps_label_to_content() {
    let doc = FormDefinition::default();
    let mut el = doc.create_element(ElementType::Email).unwrap();
    el.set_primary_text("Work email");
    let morphed = doc.morph_element_type(&el, ElementType::Subtitle).unwrap();
    let FormElement::Display(d) = &morphed else {
        panic!("expected display");
    };
    assert_eq!(d.content, "Work email");
}

#[test]
fn morph_display_to_field_maps_content_to_label() {
    let doc = FormDefinition::default();
    let mut el = doc.create_element(ElementType::Paragraph).unwrap();
    el.set_primary_text("Notes");
    let morphed = doc.morph_element_type(&el, ElementType::Textarea).unwrap();
    let FormElement::Field(f) = &morphed else {
        panic!("expected field");
    };
    assert_eq!(f.label, "Notes");
    assert_eq!(f.placeholder.as_deref(), Some("Enter text..."));
}

#[test]
fn morph_round_trip_preserves_identity_and_metadata() {
    let doc = FormDefinition::default();
    for original in [ElementType::Text, ElementType::Title, ElementType::Rating] {
        for via in [ElementType::Paragraph, ElementType::Checkbox, ElementType::Subtitle] {
            if via == original {
                continue;
            }
            let el = with_meta(doc.create_element(original).unwrap());
            let there = doc.morph_element_type(&el, via).unwrap();
            let back = doc.morph_element_type(&there, original).unwrap();
            assert_eq!(back.id(), el.id());
            assert_eq!(back.base().subtitle, el.base().subtitle);
            assert_eq!(back.base().description, el.base().description);
            assert_eq!(back.base().photo, el.base().photo);
            assert_eq!(back.element_type(), original);
        }
    }
}

#[test]
fn morph_takes_icon_from_new_defaults() {
    let doc = FormDefinition::default();
    let mut el = doc.create_element(ElementType::Text).unwrap();
    el.base_mut().icon = Some("user".into());
    let morphed = doc.morph_element_type(&el, ElementType::Number).unwrap();
    assert_eq!(morphed.base().icon, None);
}

#[test]
fn morph_to_unregistered_type_leaves_doc_unchanged() {
    let mut doc = doc_with_rows();
    doc.schema.remove(ElementType::Signature);
    let before = doc.clone();
    let id = element_at(&doc, 0, 0).id().to_owned();
    let err = doc.morph_element(&id, ElementType::Signature).unwrap_err();
    assert!(matches!(err, EditorError::UnknownType(_)));
    assert_eq!(doc, before);
}

#[test]
fn morph_in_place_replaces_element() {
    let mut doc = doc_with_rows();
    let id = element_at(&doc, 0, 0).id().to_owned();
    doc.morph_element(&id, ElementType::Select).unwrap();
    let el = doc.find_element(&id).unwrap();
    assert_eq!(el.element_type(), ElementType::Select);
    assert_eq!(el.primary_text(), "Text Field");
}

// =============================================================
// update / move
// =============================================================

#[test]
fn update_element_replaces_by_id() {
    let mut doc = doc_with_rows();
    let mut el = element_at(&doc, 1, 0).clone();
    el.set_primary_text("Contact email");
    doc.update_element(el).unwrap();
    assert_eq!(element_at(&doc, 1, 0).primary_text(), "Contact email");
}

#[test]
fn update_missing_element_errors() {
    let mut doc = doc_with_rows();
    let el = doc.create_element(ElementType::Text).unwrap();
    assert!(doc.update_element(el).is_err());
}

#[test]
fn move_row_swaps_neighbours() {
    let mut doc = doc_with_rows();
    let row_id = doc.data.sections[0].rows[1].id.clone();
    assert!(doc.move_row(&row_id, MoveDirection::Up).unwrap());
    assert_eq!(doc.data.sections[0].rows[0].id, row_id);
    assert!(doc.move_row(&row_id, MoveDirection::Down).unwrap());
    assert_eq!(doc.data.sections[0].rows[1].id, row_id);
}

#[test]
fn move_row_past_ends_is_noop() {
    let mut doc = doc_with_rows();
    let first = doc.data.sections[0].rows[0].id.clone();
    let last = doc.data.sections[0].rows[2].id.clone();
    assert!(!doc.move_row(&first, MoveDirection::Up).unwrap());
    assert!(!doc.move_row(&last, MoveDirection::Down).unwrap());
    assert!(doc.move_row("ghost", MoveDirection::Up).is_err());
}

// =============================================================
// JSON
// =============================================================

#[test]
fn json_round_trip_preserves_structure() {
    let mut doc = doc_with_rows();
    let x = element_at(&doc, 0, 0).id().to_owned();
    doc.duplicate_element(&x).unwrap();
    let text = doc.to_json().unwrap();
    let back = FormDefinition::from_json(&text).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn element_wire_shape_is_flat() {
    let doc = FormDefinition::default();
    let mut el = doc.create_element(ElementType::Title).unwrap();
    el.base_mut().id = "el_title".into();
    let value = serde_json::to_value(&el).unwrap();
    assert_eq!(value, json!({ "id": "el_title", "type": "title", "content": "New Title" }));
}

#[test]
fn parses_reference_document() {
    let text = json!({
        "config": { "uid": "f-event-reg-05", "version": "5.0.0", "name": "Tech Conference" },
        "schema": {},
        "data": { "sections": [{
            "id": "sec_attendee", "title": "Attendee Information",
            "rows": [
                { "id": "row_name", "columns": [
                    { "id": "col_fname", "width": "1/2", "element": { "id": "firstName", "type": "text", "label": "First Name", "icon": "user" } },
                    { "id": "col_lname", "width": "1/2", "element": { "id": "lastName", "type": "text", "label": "Last Name" } }
                ]},
                { "id": "row_zip", "columns": [
                    { "id": "col_zip", "width": "1/3", "element": { "id": "postalCode", "type": "text", "label": "Postal Code",
                      "validation": { "regex": "^\\d{5}$", "message": "Must be 5 digits" } } }
                ], "condition": { "fieldId": "firstName", "operator": "notEquals", "value": "" } }
            ]
        }]}
    })
    .to_string();
    let doc = FormDefinition::from_json(&text).unwrap();
    assert_eq!(doc.schema.len(), ElementType::ALL.len());
    assert_eq!(doc.fields().count(), 3);
    let row = &doc.data.sections[0].rows[1];
    assert_eq!(row.columns[0].width, ColumnWidth::Third);
    let cond = row.condition.as_ref().unwrap();
    assert_eq!(cond.operator, ConditionOperator::NotEquals);
    assert_eq!(cond.field_id, "firstName");
}

#[test]
fn display_with_label_is_rejected() {
    let text = json!({
        "config": { "uid": "u", "version": "1", "name": "n" },
        "data": { "sections": [{ "id": "s", "title": "t", "rows": [
            { "id": "r", "columns": [{ "id": "c", "width": "full",
              "element": { "id": "e", "type": "title", "label": "oops" } }] }
        ]}]}
    })
    .to_string();
    assert!(FormDefinition::from_json(&text).is_err());
}

#[test]
fn field_with_content_is_rejected() {
    let text = json!({
        "id": "e", "type": "email", "content": "oops"
    })
    .to_string();
    assert!(serde_json::from_str::<FormElement>(&text).is_err());
}

#[test]
fn unknown_type_tag_is_rejected() {
    let text = json!({ "id": "e", "type": "hologram", "label": "x" }).to_string();
    assert!(serde_json::from_str::<FormElement>(&text).is_err());
}

#[test]
fn width_serde_tags() {
    let cases = [
        (ColumnWidth::Full, "\"full\""),
        (ColumnWidth::Half, "\"1/2\""),
        (ColumnWidth::Third, "\"1/3\""),
        (ColumnWidth::TwoThirds, "\"2/3\""),
    ];
    for (width, expected) in cases {
        assert_eq!(serde_json::to_string(&width).unwrap(), expected);
        assert_eq!(width.as_str(), expected.trim_matches('"'));
    }
}
