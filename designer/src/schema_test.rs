use super::*;

// =============================================================
// ElementType
// =============================================================

#[test]
fn tags_round_trip_through_from_str() {
    for ty in ElementType::ALL {
        assert_eq!(ty.as_str().parse::<ElementType>().unwrap(), ty);
    }
}

#[test]
fn serde_tag_matches_as_str() {
    for ty in ElementType::ALL {
        assert_eq!(serde_json::to_value(ty).unwrap(), serde_json::Value::String(ty.as_str().to_owned()));
    }
}

#[test]
fn unknown_tag_is_schema_error() {
    let err = "hologram".parse::<ElementType>().unwrap_err();
    assert!(matches!(err, EditorError::UnknownType(ref t) if t == "hologram"));
}

#[test]
fn only_title_subtitle_paragraph_are_display() {
    let display: Vec<_> = ElementType::ALL.into_iter().filter(|t| t.is_display()).collect();
    assert_eq!(display, vec![ElementType::Title, ElementType::Subtitle, ElementType::Paragraph]);
}

// =============================================================
// Builtin registry
// =============================================================

#[test]
fn builtin_covers_every_type_in_order() {
    let schema = FormSchema::builtin();
    assert_eq!(schema.len(), 30);
    assert_eq!(schema.types().collect::<Vec<_>>(), ElementType::ALL.to_vec());
}

#[test]
fn builtin_text_defaults() {
    let schema = FormSchema::builtin();
    let def = schema.lookup(ElementType::Text).unwrap();
    assert_eq!(def.category, "Basic Inputs");
    assert_eq!(def.default_props.label.as_deref(), Some("Text Field"));
    assert_eq!(def.default_props.placeholder.as_deref(), Some("Enter text"));
}

#[test]
fn builtin_select_has_three_options() {
    let schema = FormSchema::builtin();
    let opts = schema.lookup(ElementType::Select).unwrap().default_props.options.clone().unwrap();
    assert_eq!(opts, vec!["Option 1", "Option 2", "Option 3"]);
}

#[test]
fn builtin_display_types_use_content() {
    let schema = FormSchema::builtin();
    let def = schema.lookup(ElementType::Title).unwrap();
    assert_eq!(def.default_props.content.as_deref(), Some("New Title"));
    assert_eq!(def.default_props.label, None);
}

#[test]
fn require_reports_removed_type() {
    let mut schema = FormSchema::builtin();
    assert!(schema.remove(ElementType::Rating).is_some());
    assert!(schema.lookup(ElementType::Rating).is_none());
    let err = schema.require(ElementType::Rating).unwrap_err();
    assert_eq!(err.to_string(), "no schema definition for type: rating");
}

#[test]
fn schema_json_is_keyed_by_tag() {
    let schema = FormSchema::builtin();
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["email"]["category"], "Basic Inputs");
    assert_eq!(value["email"]["defaultProps"]["type"], "email");
    let back: FormSchema = serde_json::from_value(value).unwrap();
    assert_eq!(back, schema);
}

// =============================================================
// Palette
// =============================================================

#[test]
fn palette_groups_in_first_seen_order() {
    let groups = FormSchema::builtin().palette();
    let names: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["Layout", "Basic Inputs", "Selectors", "Date & Time", "Data Entry", "Media & Graphics", "Advanced"]);
    assert_eq!(groups.iter().map(|g| g.entries.len()).sum::<usize>(), 30);
}

#[test]
fn palette_name_prefers_label_then_content_then_tag() {
    let mut schema = FormSchema::new();
    schema.insert(
        ElementType::MapLocationPicker,
        ComponentDefinition { category: String::new(), icon: "map".into(), default_props: DefaultProps::default() },
    );
    schema.insert(
        ElementType::Title,
        ComponentDefinition {
            category: "Layout".into(),
            icon: "title".into(),
            default_props: DefaultProps { content: Some("Heading".into()), ..DefaultProps::default() },
        },
    );
    let groups = schema.palette();
    assert_eq!(groups[0].category, "Other");
    assert_eq!(groups[0].entries[0].name, "Map location picker");
    assert_eq!(groups[1].entries[0].name, "Heading");
}

#[test]
fn filter_matches_name_or_category_case_insensitively() {
    let schema = FormSchema::builtin();

    let by_name = schema.filtered_palette("EMAIL");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].entries[0].element_type, ElementType::Email);

    let by_category = schema.filtered_palette("date &");
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].entries.len(), 4);

    assert!(schema.filtered_palette("zzz").is_empty());
    assert_eq!(schema.filtered_palette("   ").len(), schema.palette().len());
}

// =============================================================
// Icons
// =============================================================

#[test]
fn icon_glyph_known_and_fallback() {
    assert_eq!(icon_glyph("rating"), "\u{2b50}");
    assert_eq!(icon_glyph("map"), icon_glyph("map_location_picker"));
    assert_eq!(icon_glyph("nonsense"), FALLBACK_ICON_GLYPH);
}

#[test]
fn every_builtin_icon_resolves() {
    let schema = FormSchema::builtin();
    for ty in schema.types() {
        let icon = &schema.lookup(ty).unwrap().icon;
        assert_ne!(icon_glyph(icon), FALLBACK_ICON_GLYPH, "icon {icon} for {ty}");
    }
}
