//! Subcommand implementations. Each loads what it needs, drives the editor
//! core, and returns the text to print.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::fs;
use std::path::{Path, PathBuf};

use designer::doc::{FormDefinition, MoveDirection};
use designer::engine::{Action, EditorConfig, EditorCore};
use designer::placement::DropZone;
use designer::records::{Record, RecordId};
use designer::render::{ListAction, ViewMode};
use designer::schema::{ElementType, icon_glyph};
use designer::widget::WidgetTable;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CliError;

/// A form file, an optional records file, and the editor core over both.
pub struct Workspace {
    form_path: PathBuf,
    records_path: Option<PathBuf>,
    pub core: EditorCore,
}

impl Workspace {
    /// Load `form_path` (the default document if the file does not exist yet)
    /// and `records_path` (empty if absent).
    ///
    /// # Errors
    ///
    /// I/O failures other than a missing file, and malformed JSON.
    pub fn open(form_path: &Path, records_path: Option<&Path>, config: EditorConfig) -> Result<Self, CliError> {
        let doc = match read_optional(form_path)? {
            Some(text) => FormDefinition::from_json(&text)?,
            None => {
                debug!(path = %form_path.display(), "no form file; starting from the default document");
                FormDefinition::default()
            }
        };
        let mut core = EditorCore::new(doc, config);
        if let Some(path) = records_path {
            if let Some(text) = read_optional(path)? {
                let records: Vec<Record> = serde_json::from_str(&text)?;
                core.load_records(records);
            }
        }
        Ok(Self { form_path: form_path.to_owned(), records_path: records_path.map(Path::to_owned), core })
    }

    /// Write the document and, if configured, the records back to disk.
    ///
    /// # Errors
    ///
    /// Serialization or I/O failure.
    pub fn save(&self) -> Result<(), CliError> {
        let text = self.core.doc.to_json()?;
        fs::write(&self.form_path, text).map_err(|e| CliError::io(&self.form_path, e))?;
        if let Some(path) = &self.records_path {
            let text = serde_json::to_string_pretty(self.core.records.records())?;
            fs::write(path, text).map_err(|e| CliError::io(path, e))?;
        }
        info!(path = %self.form_path.display(), "form saved");
        Ok(())
    }

    fn records_path(&self) -> Result<&Path, CliError> {
        self.records_path.as_deref().ok_or(CliError::NoRecordsFile)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, CliError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CliError::io(path, e)),
    }
}

// =============================================================================
// DOCUMENT COMMANDS
// =============================================================================

/// Create a fresh document at `path`.
///
/// # Errors
///
/// `AlreadyExists` unless `force`; I/O failure.
pub fn new_form(path: &Path, name: Option<&str>, force: bool) -> Result<String, CliError> {
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_owned()));
    }
    let mut doc = FormDefinition::default();
    if let Some(name) = name {
        doc.rename(name);
    }
    fs::write(path, doc.to_json()?).map_err(|e| CliError::io(path, e))?;
    Ok(format!("created {} ({})", path.display(), doc.config.uid))
}

/// Palette entries grouped by category.
#[must_use]
pub fn palette(ws: &Workspace, search: &str) -> String {
    let mut lines = Vec::new();
    for group in ws.core.doc.schema.filtered_palette(search) {
        lines.push(group.category);
        for entry in group.entries {
            lines.push(format!("  {} {:<20} {}", icon_glyph(&entry.icon), entry.element_type.as_str(), entry.name));
        }
    }
    lines.join("\n")
}

/// Drop a palette type at `index` of `section`. A missing section means the
/// document's first section; with neither, the element lands at the end of
/// the first section.
///
/// # Errors
///
/// Unknown type tag, or a type the document's registry lacks.
pub fn drop_element(ws: &mut Workspace, tag: &str, section: Option<&str>, index: Option<usize>) -> Result<String, CliError> {
    let ty: ElementType = tag.parse()?;
    let section = match (section, index) {
        (Some(id), _) => Some(id.to_owned()),
        (None, Some(_)) => ws.core.doc.sections().first().map(|s| s.id.clone()),
        (None, None) => None,
    };
    let payload = ws.core.drag_start(ty);
    let actions = match section.as_deref() {
        Some(section_id) => {
            let end = ws.core.doc.section(section_id).map_or(0, |s| s.rows.len());
            let zone = DropZone::new(section_id, index.unwrap_or(end));
            ws.core.drag_over(zone.clone());
            ws.core.drop(&zone, &payload)?
        }
        None => ws.core.drop_on_canvas(&payload)?,
    };
    ws.save()?;
    Ok(describe(&actions, "nothing placed"))
}

/// # Errors
///
/// I/O failure while saving.
pub fn delete_element(ws: &mut Workspace, element_id: &str) -> Result<String, CliError> {
    let actions = ws.core.delete_element(element_id);
    ws.save()?;
    Ok(describe(&actions, "no such element"))
}

/// # Errors
///
/// I/O failure while saving.
pub fn duplicate_element(ws: &mut Workspace, element_id: &str) -> Result<String, CliError> {
    let actions = ws.core.duplicate_element(element_id);
    ws.save()?;
    Ok(describe(&actions, "no such element"))
}

/// # Errors
///
/// Unknown type tag, or a type the document's registry lacks.
pub fn morph_element(ws: &mut Workspace, element_id: &str, tag: &str) -> Result<String, CliError> {
    let ty: ElementType = tag.parse()?;
    let actions = ws.core.morph_element(element_id, ty)?;
    ws.save()?;
    Ok(describe(&actions, "no such element"))
}

/// # Errors
///
/// I/O failure while saving.
pub fn move_row(ws: &mut Workspace, row_id: &str, direction: MoveDirection) -> Result<String, CliError> {
    let actions = ws.core.move_row(row_id, direction);
    ws.save()?;
    Ok(describe(&actions, "row not moved"))
}

/// # Errors
///
/// I/O failure while saving.
pub fn rename(ws: &mut Workspace, name: &str) -> Result<String, CliError> {
    let action = ws.core.rename(name);
    ws.save()?;
    Ok(describe(&[action], ""))
}

// =============================================================================
// VIEWS AND RECORDS
// =============================================================================

/// Project `mode`, selecting `record` first for record-bound modes.
pub fn render(ws: &mut Workspace, mode: ViewMode, record: Option<RecordId>) -> String {
    if let Some(id) = record {
        ws.core.list_action(id, ListAction::View);
    }
    ws.core.set_mode(mode);
    ws.core.project(&mut WidgetTable::default()).to_string()
}

/// Submit a new record in ADD mode, or update `record` in UPDATE mode.
///
/// # Errors
///
/// Malformed assignments, validation failures, missing records file.
pub fn submit(ws: &mut Workspace, assignments: &[String], record: Option<RecordId>) -> Result<String, CliError> {
    ws.records_path()?;
    match record {
        Some(id) => {
            ws.core.list_action(id, ListAction::Update);
        }
        None => {
            ws.core.set_mode(ViewMode::Add);
        }
    }
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        ws.core.set_field_value(field, value);
    }
    let actions = ws.core.submit();
    if let [Action::ValidationFailed { errors }] = actions.as_slice() {
        return Err(CliError::Invalid(*errors));
    }
    ws.save()?;
    Ok(describe(&actions, "nothing submitted"))
}

/// Delete a record from the records file.
///
/// # Errors
///
/// Missing records file or I/O failure.
pub fn delete_record(ws: &mut Workspace, id: RecordId) -> Result<String, CliError> {
    ws.records_path()?;
    let actions = ws.core.list_action(id, ListAction::Delete);
    ws.save()?;
    Ok(describe(&actions, "no such record"))
}

/// `FIELD=VALUE`; the value is taken as JSON when it parses, else as a string.
fn parse_assignment(text: &str) -> Result<(&str, Value), CliError> {
    let (field, raw) = text.split_once('=').ok_or_else(|| CliError::BadAssignment(text.to_owned()))?;
    if field.is_empty() {
        return Err(CliError::BadAssignment(text.to_owned()));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((field, value))
}

// =============================================================================
// SYNC
// =============================================================================

/// Feed `text` through the document JSON bridge as if typed, wait out the
/// debounce, and save if it was accepted.
///
/// # Errors
///
/// I/O failure while saving.
pub async fn sync_form_text(ws: &mut Workspace, text: &str) -> Result<String, CliError> {
    ws.core.form_text_changed(text);
    let actions = ws.core.settle().await;
    if actions.contains(&Action::DocumentReplaced) {
        ws.save()?;
        return Ok(format!("applied: {} section(s)", ws.core.doc.data.sections.len()));
    }
    Ok("rejected: text did not parse; document unchanged".to_owned())
}

/// Same as [`sync_form_text`] for the record JSON bridge.
///
/// # Errors
///
/// Missing records file or I/O failure.
pub async fn sync_record_text(ws: &mut Workspace, id: RecordId, text: &str) -> Result<String, CliError> {
    ws.records_path()?;
    ws.core.list_action(id, ListAction::View);
    ws.core.set_mode(ViewMode::FormDataJson);
    ws.core.record_text_changed(text);
    let actions = ws.core.settle().await;
    if let Some(Action::RecordReplaced(id)) = actions.iter().find(|a| matches!(a, Action::RecordReplaced(_))) {
        ws.save()?;
        return Ok(format!("applied: record {id}"));
    }
    Ok("rejected: text did not parse or names no stored record".to_owned())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn describe(actions: &[Action], nothing: &str) -> String {
    if actions.is_empty() {
        return nothing.to_owned();
    }
    let lines: Vec<String> = actions
        .iter()
        .map(|action| match action {
            Action::ElementCreated { element_id, section_id, row_index } => {
                format!("created {element_id} in {section_id} at row {row_index}")
            }
            Action::ElementDeleted { element_id, rows_removed } => format!("deleted {element_id} ({rows_removed} row(s))"),
            Action::ElementDuplicated { source_id, element_id } => format!("duplicated {source_id} as {element_id}"),
            Action::ElementUpdated { element_id } => format!("updated {element_id}"),
            Action::RowMoved { row_id } => format!("moved {row_id}"),
            Action::FormRenamed(name) => format!("renamed to {name}"),
            Action::RecordSubmitted(id) => format!("record {id} submitted"),
            Action::RecordUpdated(id) => format!("record {id} updated"),
            Action::RecordDeleted(id) => format!("record {id} deleted"),
            other => format!("{other:?}"),
        })
        .collect();
    lines.join("\n")
}
