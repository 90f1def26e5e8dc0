//! Schema registry: element type tags and their default properties.
//!
//! The registry is pure data. It maps every element type tag to a
//! [`ComponentDefinition`] carrying the palette category, an icon name, and
//! the default property values used when a new element of that type is
//! created. Each [`crate::doc::FormDefinition`] carries its own copy so a
//! document may override defaults or drop types entirely.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::consts::{FALLBACK_CATEGORY, FALLBACK_ICON_GLYPH};
use crate::error::EditorError;

/// Every element type the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    // Display
    Title,
    Subtitle,
    Paragraph,
    // Basic inputs
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Url,
    // Selectors
    Select,
    Multiselect,
    Checkbox,
    Radio,
    Toggle,
    // Date & time
    Date,
    Daterange,
    Time,
    Datetime,
    // Data entry
    Phone,
    Creditcard,
    Currency,
    Masked,
    // Media & graphics
    File,
    Image,
    Signature,
    Color,
    // Advanced
    Richtext,
    MapLocationPicker,
    Rating,
    Repeater,
}

/// Whether an element type carries a `label` (field) or `content` (display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Field,
    Display,
}

impl ElementType {
    /// All element types, in built-in registry order.
    pub const ALL: [ElementType; 30] = [
        Self::Title,
        Self::Subtitle,
        Self::Paragraph,
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Number,
        Self::Textarea,
        Self::Url,
        Self::Select,
        Self::Multiselect,
        Self::Checkbox,
        Self::Radio,
        Self::Toggle,
        Self::Date,
        Self::Datetime,
        Self::Daterange,
        Self::Time,
        Self::Phone,
        Self::Creditcard,
        Self::Currency,
        Self::Masked,
        Self::File,
        Self::Image,
        Self::Signature,
        Self::Color,
        Self::Richtext,
        Self::MapLocationPicker,
        Self::Rating,
        Self::Repeater,
    ];

    /// The wire tag for this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Url => "url",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Toggle => "toggle",
            Self::Date => "date",
            Self::Daterange => "daterange",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Phone => "phone",
            Self::Creditcard => "creditcard",
            Self::Currency => "currency",
            Self::Masked => "masked",
            Self::File => "file",
            Self::Image => "image",
            Self::Signature => "signature",
            Self::Color => "color",
            Self::Richtext => "richtext",
            Self::MapLocationPicker => "map_location_picker",
            Self::Rating => "rating",
            Self::Repeater => "repeater",
        }
    }

    /// Display types carry `content`; everything else is a field with a `label`.
    #[must_use]
    pub fn kind(self) -> ElementKind {
        match self {
            Self::Title | Self::Subtitle | Self::Paragraph => ElementKind::Display,
            _ => ElementKind::Field,
        }
    }

    #[must_use]
    pub fn is_display(self) -> bool {
        self.kind() == ElementKind::Display
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| EditorError::UnknownType(s.to_owned()))
    }
}

/// Regex validation attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Pattern the captured value must match.
    pub regex: String,
    /// Message shown when the value is empty or does not match.
    pub message: String,
}

/// Initial property values for a newly created element. Every field is
/// optional; absent values fall back to empty text when an element is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultProps {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Registry entry for one element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Palette group this type is listed under.
    pub category: String,
    /// Icon name; resolved to a glyph by [`icon_glyph`].
    pub icon: String,
    /// Values copied into every new element of this type.
    pub default_props: DefaultProps,
}

impl ComponentDefinition {
    /// Palette display name: default label, else default content, else the
    /// humanized type tag.
    #[must_use]
    pub fn display_name(&self, ty: ElementType) -> String {
        let props = &self.default_props;
        props
            .label
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| props.content.as_deref().filter(|s| !s.is_empty()))
            .map_or_else(|| humanize(ty.as_str()), str::to_owned)
    }
}

/// A single draggable palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub element_type: ElementType,
    pub name: String,
    pub icon: String,
}

/// Palette entries sharing a category, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteGroup {
    pub category: String,
    pub entries: Vec<PaletteEntry>,
}

/// Type tag → definition lookup. Iteration order is registry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema {
    entries: IndexMap<ElementType, ComponentDefinition>,
}

impl FormSchema {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry covering every [`ElementType`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut schema = Self::new();
        for ty in ElementType::ALL {
            let (category, icon, props) = builtin_entry(ty);
            schema.insert(ty, ComponentDefinition { category: category.to_owned(), icon: icon.to_owned(), default_props: props });
        }
        schema
    }

    /// Add or replace the definition for `ty`.
    pub fn insert(&mut self, ty: ElementType, definition: ComponentDefinition) {
        self.entries.insert(ty, definition);
    }

    /// Remove the definition for `ty`, returning it if present.
    pub fn remove(&mut self, ty: ElementType) -> Option<ComponentDefinition> {
        self.entries.shift_remove(&ty)
    }

    /// Look up the definition for `ty`. `None` means the type cannot be created.
    #[must_use]
    pub fn lookup(&self, ty: ElementType) -> Option<&ComponentDefinition> {
        self.entries.get(&ty)
    }

    /// Like [`lookup`](Self::lookup) but reports absence as a schema error.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the registry has no entry for `ty`.
    pub fn require(&self, ty: ElementType) -> Result<&ComponentDefinition, EditorError> {
        self.lookup(ty).ok_or_else(|| EditorError::UnknownType(ty.as_str().to_owned()))
    }

    /// Registered types in registry order.
    pub fn types(&self) -> impl Iterator<Item = ElementType> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by category, categories in first-seen order.
    #[must_use]
    pub fn palette(&self) -> Vec<PaletteGroup> {
        self.filtered_palette("")
    }

    /// Like [`palette`](Self::palette), keeping only entries whose name or
    /// category contains `search` (case-insensitive). Empty groups are dropped.
    #[must_use]
    pub fn filtered_palette(&self, search: &str) -> Vec<PaletteGroup> {
        let needle = search.trim().to_lowercase();
        let mut groups: IndexMap<String, Vec<PaletteEntry>> = IndexMap::new();
        for (ty, def) in &self.entries {
            let category = if def.category.is_empty() { FALLBACK_CATEGORY } else { def.category.as_str() };
            let name = def.display_name(*ty);
            if !needle.is_empty()
                && !name.to_lowercase().contains(&needle)
                && !category.to_lowercase().contains(&needle)
            {
                continue;
            }
            groups
                .entry(category.to_owned())
                .or_default()
                .push(PaletteEntry { element_type: *ty, name, icon: def.icon.clone() });
        }
        groups
            .into_iter()
            .map(|(category, entries)| PaletteGroup { category, entries })
            .collect()
    }
}

/// Glyph for an icon name; unknown names get a generic package glyph.
#[must_use]
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "title" | "textarea" => "\u{1f4c4}",
        "subtitle" => "\u{1f4d1}",
        "paragraph" | "text" | "richtext" => "\u{1f4dd}",
        "email" => "\u{2709}\u{fe0f}",
        "password" => "\u{1f512}",
        "number" => "\u{1f522}",
        "url" => "\u{1f517}",
        "select" => "\u{1f4cb}",
        "checkbox" => "\u{2611}\u{fe0f}",
        "radio" => "\u{1f518}",
        "toggle" | "repeater" => "\u{1f504}",
        "date" => "\u{1f4c5}",
        "datetime" => "\u{1f4c5}\u{23f0}",
        "daterange" => "\u{1f4c5}\u{1f4c5}",
        "time" => "\u{23f0}",
        "phone" => "\u{1f4de}",
        "creditcard" => "\u{1f4b3}",
        "currency" => "\u{1f4b0}",
        "masked" => "\u{1f510}",
        "file" => "\u{1f4c1}",
        "image" => "\u{1f5bc}\u{fe0f}",
        "signature" => "\u{270d}\u{fe0f}",
        "color" => "\u{1f3a8}",
        "map" | "map_location_picker" => "\u{1f4cd}",
        "rating" => "\u{2b50}",
        _ => FALLBACK_ICON_GLYPH,
    }
}

/// `map_location_picker` → `Map location picker`.
fn humanize(tag: &str) -> String {
    let spaced = tag.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn field(ty: ElementType, label: &str, placeholder: Option<&str>) -> DefaultProps {
    DefaultProps {
        element_type: Some(ty),
        label: Some(label.to_owned()),
        placeholder: placeholder.map(str::to_owned),
        ..DefaultProps::default()
    }
}

fn choice(ty: ElementType, label: &str) -> DefaultProps {
    DefaultProps {
        options: Some(vec!["Option 1".to_owned(), "Option 2".to_owned(), "Option 3".to_owned()]),
        ..field(ty, label, None)
    }
}

fn display(ty: ElementType, content: &str) -> DefaultProps {
    DefaultProps { element_type: Some(ty), content: Some(content.to_owned()), ..DefaultProps::default() }
}

fn builtin_entry(ty: ElementType) -> (&'static str, &'static str, DefaultProps) {
    use ElementType as T;
    match ty {
        T::Title => ("Layout", "title", display(ty, "New Title")),
        T::Subtitle => ("Layout", "subtitle", display(ty, "New Subtitle")),
        T::Paragraph => ("Layout", "paragraph", display(ty, "New paragraph text.")),
        T::Text => ("Basic Inputs", "text", field(ty, "Text Field", Some("Enter text"))),
        T::Email => ("Basic Inputs", "email", field(ty, "Email", Some("email@example.com"))),
        T::Password => ("Basic Inputs", "password", field(ty, "Password", Some("Enter password"))),
        T::Number => ("Basic Inputs", "number", field(ty, "Number", Some("0"))),
        T::Textarea => ("Basic Inputs", "textarea", field(ty, "Text Area", Some("Enter text..."))),
        T::Url => ("Basic Inputs", "url", field(ty, "URL", Some("https://example.com"))),
        T::Select => ("Selectors", "select", choice(ty, "Select")),
        T::Multiselect => ("Selectors", "select", choice(ty, "Multi Select")),
        T::Checkbox => ("Selectors", "checkbox", field(ty, "Checkbox", None)),
        T::Radio => ("Selectors", "radio", choice(ty, "Radio Group")),
        T::Toggle => ("Selectors", "toggle", field(ty, "Toggle", None)),
        T::Date => ("Date & Time", "date", field(ty, "Date", None)),
        T::Datetime => ("Date & Time", "datetime", field(ty, "Date & Time", None)),
        T::Daterange => ("Date & Time", "date", field(ty, "Date Range", None)),
        T::Time => ("Date & Time", "time", field(ty, "Time", None)),
        T::Phone => ("Data Entry", "phone", field(ty, "Phone Number", Some("(555) 555-5555"))),
        T::Creditcard => ("Data Entry", "creditcard", field(ty, "Credit Card", Some("0000 0000 0000 0000"))),
        T::Currency => ("Data Entry", "number", field(ty, "Currency", Some("0.00"))),
        T::Masked => ("Data Entry", "text", field(ty, "Masked Input", Some("___-___-____"))),
        T::File => ("Media & Graphics", "file", field(ty, "File Upload", None)),
        T::Image => ("Media & Graphics", "file", field(ty, "Image Upload", None)),
        T::Signature => ("Media & Graphics", "signature", field(ty, "Signature", None)),
        T::Color => ("Media & Graphics", "color", field(ty, "Color Picker", None)),
        T::Richtext => ("Advanced", "richtext", field(ty, "Rich Text Editor", None)),
        T::MapLocationPicker => ("Advanced", "map", field(ty, "Location", None)),
        T::Rating => ("Advanced", "rating", field(ty, "Rating", None)),
        T::Repeater => ("Advanced", "repeater", field(ty, "Repeater Field", None)),
    }
}
