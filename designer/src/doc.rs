//! Document model: the form definition tree and its mutation primitives.
//!
//! A [`FormDefinition`] owns an ordered list of sections, each holding
//! ordered rows of columns, each column holding exactly one
//! [`FormElement`]. Order is the only ordering mechanism; every insertion
//! names an explicit index.
//!
//! Data flows into this layer from the placement engine (drops), the edit
//! dialog (updates, morphs, duplicates), and the JSON bridge (wholesale
//! replacement). The renderer only ever reads from it.
//!
//! Ids are caller-generated strings. Uniqueness across the document is a
//! caller obligation; [`fresh_id`] produces collision-resistant ids but
//! nothing here checks for collisions.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_FORM_NAME, DEFAULT_FORM_VERSION, DEFAULT_SECTION_ID, DEFAULT_SECTION_TITLE};
use crate::error::{EditorError, TargetKind};
use crate::schema::{ElementKind, ElementType, FormSchema, Validation};

/// Generate a collision-resistant id of the form `{prefix}-{uuid}`.
#[must_use]
pub fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// Identity and metadata shared by every element. Survives a type morph,
/// except `icon`, which comes from the new type's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementBase {
    pub id: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub icon: Option<String>,
}

/// A non-input block (`title`, `subtitle`, `paragraph`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayElement {
    pub element_type: ElementType,
    pub base: ElementBase,
    pub content: String,
}

/// An input field of any non-display type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub element_type: ElementType,
    pub base: ElementBase,
    pub label: String,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub mask: Option<String>,
    pub validation: Option<Validation>,
}

/// A single form element. Display elements never carry a label and fields
/// never carry content; the JSON boundary rejects documents that mix them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub enum FormElement {
    Display(DisplayElement),
    Field(FormField),
}

impl FormElement {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.base().id
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Display(d) => d.element_type,
            Self::Field(f) => f.element_type,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Display(_) => ElementKind::Display,
            Self::Field(_) => ElementKind::Field,
        }
    }

    #[must_use]
    pub fn base(&self) -> &ElementBase {
        match self {
            Self::Display(d) => &d.base,
            Self::Field(f) => &f.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Self::Display(d) => &mut d.base,
            Self::Field(f) => &mut f.base,
        }
    }

    /// The label of a field or the content of a display element.
    #[must_use]
    pub fn primary_text(&self) -> &str {
        match self {
            Self::Display(d) => &d.content,
            Self::Field(f) => &f.label,
        }
    }

    pub fn set_primary_text(&mut self, text: impl Into<String>) {
        match self {
            Self::Display(d) => d.content = text.into(),
            Self::Field(f) => f.label = text.into(),
        }
    }

    #[must_use]
    pub fn as_field(&self) -> Option<&FormField> {
        match self {
            Self::Field(f) => Some(f),
            Self::Display(_) => None,
        }
    }
}

/// Flat wire shape of an element: `{id, type, ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<Validation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

impl TryFrom<RawElement> for FormElement {
    type Error = EditorError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let invalid = |field: &'static str| EditorError::InvalidElement {
            id: raw.id.clone(),
            element_type: raw.element_type.as_str().to_owned(),
            field,
        };
        let base = ElementBase {
            id: raw.id.clone(),
            subtitle: raw.subtitle.clone(),
            description: raw.description.clone(),
            photo: raw.photo.clone(),
            icon: raw.icon.clone(),
        };
        match raw.element_type.kind() {
            ElementKind::Display => {
                if raw.label.is_some() {
                    return Err(invalid("label"));
                }
                Ok(Self::Display(DisplayElement {
                    element_type: raw.element_type,
                    base,
                    content: raw.content.unwrap_or_default(),
                }))
            }
            ElementKind::Field => {
                if raw.content.is_some() {
                    return Err(invalid("content"));
                }
                Ok(Self::Field(FormField {
                    element_type: raw.element_type,
                    base,
                    label: raw.label.unwrap_or_default(),
                    placeholder: raw.placeholder,
                    options: raw.options,
                    mask: raw.mask,
                    validation: raw.validation,
                }))
            }
        }
    }
}

impl From<FormElement> for RawElement {
    fn from(element: FormElement) -> Self {
        match element {
            FormElement::Display(d) => Self {
                id: d.base.id,
                element_type: d.element_type,
                label: None,
                content: Some(d.content),
                placeholder: None,
                options: None,
                mask: None,
                validation: None,
                subtitle: d.base.subtitle,
                description: d.base.description,
                photo: d.base.photo,
                icon: d.base.icon,
            },
            FormElement::Field(f) => Self {
                id: f.base.id,
                element_type: f.element_type,
                label: Some(f.label),
                content: None,
                placeholder: f.placeholder,
                options: f.options,
                mask: f.mask,
                validation: f.validation,
                subtitle: f.base.subtitle,
                description: f.base.description,
                photo: f.base.photo,
                icon: f.base.icon,
            },
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Column width hint. Widths in a row are not required to sum to a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnWidth {
    #[default]
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "1/3")]
    Third,
    #[serde(rename = "2/3")]
    TwoThirds,
}

impl ColumnWidth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "1/2",
            Self::Third => "1/3",
            Self::TwoThirds => "2/3",
        }
    }
}

/// A layout slot holding exactly one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub width: ColumnWidth,
    pub element: FormElement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
}

/// Visibility condition on a row. Stored and projected, never evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowCondition {
    pub field_id: String,
    pub operator: ConditionOperator,
    pub value: serde_json::Value,
}

/// Columns rendered side by side; the unit of vertical placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RowCondition>,
}

impl Row {
    /// A fresh row with a single full-width column wrapping `element`.
    #[must_use]
    pub fn single(element: FormElement) -> Self {
        Self {
            id: fresh_id("row"),
            columns: vec![Column { id: fresh_id("col"), width: ColumnWidth::Full, element }],
            condition: None,
        }
    }

    fn references(&self, element_id: &str) -> bool {
        self.columns.iter().any(|c| c.element.id() == element_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A titled, ordered list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub rows: Vec<Row>,
}

impl Section {
    /// Wrap `element` in a full-width column and row, and splice the row in
    /// at `at`. An index past the end appends. Returns the index used.
    pub fn insert_row(&mut self, at: usize, element: FormElement) -> usize {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::single(element));
        at
    }
}

/// What to do with the rest of a row when one of its elements is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the whole row containing the element, siblings included.
    #[default]
    WholeRow,
    /// Remove only the element's column; a row left empty is removed.
    ColumnOnly,
}

// =============================================================================
// FORM DEFINITION
// =============================================================================

/// Identity and metadata. Only `name` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    pub uid: String,
    pub version: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub sections: Vec<Section>,
}

/// Root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub config: FormConfig,
    #[serde(default)]
    pub schema: FormSchema,
    pub data: FormData,
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self {
            config: FormConfig {
                uid: fresh_id("form"),
                version: DEFAULT_FORM_VERSION.to_owned(),
                name: DEFAULT_FORM_NAME.to_owned(),
            },
            schema: FormSchema::builtin(),
            data: FormData {
                sections: vec![Section {
                    id: DEFAULT_SECTION_ID.to_owned(),
                    title: DEFAULT_SECTION_TITLE.to_owned(),
                    rows: Vec::new(),
                }],
            },
        }
    }
}

impl FormDefinition {
    /// Parse a document. A missing or empty schema is replaced by the
    /// built-in registry.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if `text` is not a well-formed document.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let mut doc: Self = serde_json::from_str(text)?;
        if doc.schema.is_empty() {
            doc.schema = FormSchema::builtin();
        }
        Ok(doc)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.config.name = name.into();
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.data.sections
    }

    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.data.sections.iter().find(|s| s.id == section_id)
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = &FormElement> {
        self.data
            .sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.columns.iter())
            .map(|c| &c.element)
    }

    /// Every input field in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.elements().filter_map(FormElement::as_field)
    }

    #[must_use]
    pub fn find_element(&self, element_id: &str) -> Option<&FormElement> {
        self.elements().find(|e| e.id() == element_id)
    }

    /// Build a new element of type `ty` from this document's registry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the registry has no entry for `ty`.
    pub fn create_element(&self, ty: ElementType) -> Result<FormElement, EditorError> {
        let def = self.schema.require(ty)?;
        let props = &def.default_props;
        let base = ElementBase {
            id: fresh_id(ty.as_str()),
            subtitle: props.subtitle.clone(),
            description: props.description.clone(),
            photo: props.photo.clone(),
            icon: props.icon.clone(),
        };
        Ok(match ty.kind() {
            ElementKind::Display => FormElement::Display(DisplayElement {
                element_type: ty,
                base,
                content: props.content.clone().unwrap_or_default(),
            }),
            ElementKind::Field => FormElement::Field(FormField {
                element_type: ty,
                base,
                label: props.label.clone().unwrap_or_default(),
                placeholder: props.placeholder.clone(),
                options: props.options.clone(),
                mask: props.mask.clone(),
                validation: props.validation.clone(),
            }),
        })
    }

    /// Insert `element` as a new single-column row at `at` in `section_id`.
    /// Returns the index the row landed at.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if the section does not exist.
    pub fn insert_row(&mut self, section_id: &str, at: usize, element: FormElement) -> Result<usize, EditorError> {
        let section = self
            .data
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| EditorError::missing(TargetKind::Section, section_id))?;
        Ok(section.insert_row(at, element))
    }

    /// Delete the element with `element_id` using the whole-row policy.
    /// Returns the number of rows removed.
    pub fn delete_element(&mut self, element_id: &str) -> usize {
        self.delete_element_with(element_id, DeletePolicy::WholeRow)
    }

    /// Delete the element with `element_id`. Returns the number of rows removed.
    pub fn delete_element_with(&mut self, element_id: &str, policy: DeletePolicy) -> usize {
        let mut removed = 0;
        for section in &mut self.data.sections {
            let before = section.rows.len();
            match policy {
                DeletePolicy::WholeRow => section.rows.retain(|row| !row.references(element_id)),
                DeletePolicy::ColumnOnly => {
                    for row in &mut section.rows {
                        row.columns.retain(|c| c.element.id() != element_id);
                    }
                    section.rows.retain(|row| !row.columns.is_empty());
                }
            }
            removed += before - section.rows.len();
        }
        removed
    }

    /// Clone the element into a new column of the same width directly after
    /// the original, in the same row. Returns the new element's id.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no column holds `element_id`.
    pub fn duplicate_element(&mut self, element_id: &str) -> Result<String, EditorError> {
        for row in self.data.sections.iter_mut().flat_map(|s| s.rows.iter_mut()) {
            let Some(index) = row.columns.iter().position(|c| c.element.id() == element_id) else {
                continue;
            };
            let original = &row.columns[index];
            let mut element = original.element.clone();
            let new_id = fresh_id(element.element_type().as_str());
            element.base_mut().id.clone_from(&new_id);
            let column = Column { id: fresh_id("col"), width: original.width, element };
            row.columns.insert(index + 1, column);
            return Ok(new_id);
        }
        Err(EditorError::missing(TargetKind::Element, element_id))
    }

    /// Replace the element sharing `element`'s id wherever it appears.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no element has that id.
    pub fn update_element(&mut self, element: FormElement) -> Result<(), EditorError> {
        let mut found = false;
        for column in self
            .data
            .sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut())
            .flat_map(|r| r.columns.iter_mut())
        {
            if column.element.id() == element.id() {
                column.element = element.clone();
                found = true;
            }
        }
        if found { Ok(()) } else { Err(EditorError::missing(TargetKind::Element, element.id())) }
    }

    /// Build the element `element` would become as type `new_type`.
    ///
    /// Starts from the new type's registry defaults, then carries over `id`,
    /// `subtitle`, `description`, and `photo`. The label or content moves
    /// across by kind: field→field keeps the label, display→display keeps the
    /// content, and a kind change maps one onto the other.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the registry has no entry for `new_type`.
    pub fn morph_element_type(&self, element: &FormElement, new_type: ElementType) -> Result<FormElement, EditorError> {
        let mut morphed = self.create_element(new_type)?;
        let old = element.base();
        {
            let base = morphed.base_mut();
            base.id.clone_from(&old.id);
            base.subtitle.clone_from(&old.subtitle);
            base.description.clone_from(&old.description);
            base.photo.clone_from(&old.photo);
        }
        morphed.set_primary_text(element.primary_text());
        Ok(morphed)
    }

    /// Morph the element with `element_id` in place.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if the element is absent, `UnknownType` if the
    /// registry lacks `new_type`. The document is unchanged on error.
    pub fn morph_element(&mut self, element_id: &str, new_type: ElementType) -> Result<(), EditorError> {
        let element = self
            .find_element(element_id)
            .ok_or_else(|| EditorError::missing(TargetKind::Element, element_id))?;
        let morphed = self.morph_element_type(element, new_type)?;
        self.update_element(morphed)
    }

    /// Swap the row with its neighbour in `direction`. Moving past either end
    /// is a no-op. Returns whether anything moved.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no section holds `row_id`.
    pub fn move_row(&mut self, row_id: &str, direction: MoveDirection) -> Result<bool, EditorError> {
        for section in &mut self.data.sections {
            let Some(index) = section.rows.iter().position(|r| r.id == row_id) else {
                continue;
            };
            let target = match direction {
                MoveDirection::Up => index.checked_sub(1),
                MoveDirection::Down => Some(index + 1).filter(|&i| i < section.rows.len()),
            };
            return Ok(match target {
                Some(other) => {
                    section.rows.swap(index, other);
                    true
                }
                None => false,
            });
        }
        Err(EditorError::missing(TargetKind::Row, row_id))
    }
}
