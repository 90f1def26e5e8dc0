//! View-mode projection.
//!
//! DESIGN
//! ======
//! Rendering is a pure function of editor state. [`project`] reads the
//! document, record store, entry state, drag state and overlay slot, and
//! builds a fresh [`Projection`] tree for the active [`ViewMode`]. Nothing
//! here mutates the document; switching modes is just projecting again.
//!
//! Leaf widgets are the one side effect. Field elements in form modes get a
//! widget from the [`WidgetTable`]; the handles live in the projection and
//! are disposed when it is dropped, so replacing the previous projection
//! tears down its widgets before the new ones take over.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{FALLBACK_ICON_GLYPH, NO_RECORDS, NO_RECORD_SELECTED, NO_RECORD_TO_UPDATE, NO_RECORD_TO_VIEW};
use crate::doc::{ColumnWidth, FormDefinition, FormElement, RowCondition, Section};
use crate::entry::EntryState;
use crate::error::EditorError;
use crate::overlay::{ContextAction, Overlay, OverlayManager};
use crate::placement::{DropZone, PlacementEngine};
use crate::records::{RecordId, RecordStore};
use crate::schema::{ElementType, PaletteGroup, icon_glyph};
use crate::widget::{WidgetHandle, WidgetKind, WidgetTable};

// =============================================================================
// MODES
// =============================================================================

/// The active presentation of the editor. Declared in tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    #[default]
    Editor,
    FormJson,
    Add,
    List,
    View,
    Update,
    FormDataJson,
}

impl ViewMode {
    pub const ALL: [ViewMode; 7] =
        [Self::Editor, Self::FormJson, Self::Add, Self::List, Self::View, Self::Update, Self::FormDataJson];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "EDITOR",
            Self::FormJson => "FORM_JSON",
            Self::Add => "ADD",
            Self::List => "LIST",
            Self::View => "VIEW",
            Self::Update => "UPDATE",
            Self::FormDataJson => "FORM_DATA_JSON",
        }
    }

    /// Tab caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::FormJson => "Form JSON",
            Self::Add => "Add",
            Self::List => "List",
            Self::View => "View",
            Self::Update => "Update",
            Self::FormDataJson => "Form Data JSON",
        }
    }

    /// Modes that render the form layout.
    #[must_use]
    pub fn is_form(self) -> bool {
        matches!(self, Self::Editor | Self::Add | Self::View | Self::Update)
    }

    /// Modes that capture data and offer a submit action.
    #[must_use]
    pub fn is_entry(self) -> bool {
        matches!(self, Self::Add | Self::Update)
    }

    /// Modes that show the selected record.
    #[must_use]
    pub fn needs_record(self) -> bool {
        matches!(self, Self::View | Self::Update | Self::FormDataJson)
    }

    /// Caption of the submit button, if the mode has one.
    #[must_use]
    pub fn submit_label(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("Submit"),
            Self::Update => Some("Update"),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = EditorError;

    /// Accepts `FORM_JSON`, `form-json`, `Form JSON` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| EditorError::UnknownMode(s.to_owned()))
    }
}

// =============================================================================
// VIEW TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHeader {
    pub name: String,
    pub mode_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    /// No drag in progress.
    Inert,
    /// A drag is in progress; the zone accepts drops.
    Armed,
    /// The pointer is over this zone.
    Hovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneView {
    pub zone: DropZone,
    pub state: ZoneState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub kind: WidgetKind,
    pub slot: String,
    pub label: String,
    pub read_only: bool,
    pub value: Value,
    pub error: Option<String>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Display { content: String },
    Widget(WidgetView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    pub id: String,
    pub element_type: ElementType,
    pub icon: &'static str,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub body: ElementBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub id: String,
    pub width: ColumnWidth,
    pub element: ElementView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub condition: Option<RowCondition>,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub rows: Vec<RowView>,
    /// `rows.len() + 1` insertion points in EDITOR; empty elsewhere.
    pub zones: Vec<ZoneView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub header: FormHeader,
    pub palette: Vec<PaletteGroup>,
    pub sections: Vec<SectionView>,
    /// Elements accept context menu and double click.
    pub editable: bool,
    pub submit: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    View,
    Update,
    Delete,
}

impl ListAction {
    pub const ALL: [ListAction; 3] = [Self::View, Self::Update, Self::Delete];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: RecordId,
    pub summary: String,
    pub selected: bool,
    pub actions: [ListAction; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<ListRow>,
    pub empty: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonView {
    Text { title: String, text: String },
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Form(FormView),
    List(ListView),
    Json(JsonView),
    /// Placeholder shown instead of a form that needs a selected record.
    Notice(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub element_id: String,
    pub primary_label: &'static str,
    /// Registry types offered by the type select.
    pub type_choices: Vec<ElementType>,
    pub draft: FormElement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayView {
    ContextMenu { element_id: String, x: f64, y: f64, actions: [ContextAction; 3] },
    EditDialog(DialogView),
}

/// One rendered frame. Owns the leaf widgets it instantiated.
pub struct Projection {
    pub mode: ViewMode,
    pub view: View,
    pub overlay: Option<OverlayView>,
    widgets: Vec<Box<dyn WidgetHandle>>,
}

impl Projection {
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormView> {
        match &self.view {
            View::Form(form) => Some(form),
            _ => None,
        }
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("mode", &self.mode)
            .field("view", &self.view)
            .field("overlay", &self.overlay)
            .field("widgets", &self.widgets.len())
            .finish()
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Everything a projection reads.
pub struct RenderContext<'a> {
    pub mode: ViewMode,
    pub doc: &'a FormDefinition,
    pub records: &'a RecordStore,
    pub entry: &'a EntryState,
    pub placement: &'a PlacementEngine,
    pub overlay: &'a OverlayManager,
    /// Current text of the document JSON surface.
    pub form_text: &'a str,
    /// Current text of the record JSON surface.
    pub record_text: &'a str,
    pub palette_search: &'a str,
    pub show_palette: bool,
}

/// Project the editor state for `ctx.mode`, instantiating leaf widgets
/// through `widgets`.
#[must_use]
pub fn project(ctx: &RenderContext<'_>, widgets: &mut WidgetTable) -> Projection {
    let mut handles = Vec::new();
    let view = match ctx.mode {
        ViewMode::Editor | ViewMode::Add => View::Form(form_view(ctx, None, widgets, &mut handles)),
        ViewMode::View | ViewMode::Update => match ctx.records.selected() {
            Some(record) => View::Form(form_view(ctx, Some(&record.fields), widgets, &mut handles)),
            None if ctx.mode == ViewMode::View => View::Notice(NO_RECORD_TO_VIEW),
            None => View::Notice(NO_RECORD_TO_UPDATE),
        },
        ViewMode::List => View::List(list_view(ctx.records)),
        ViewMode::FormJson => View::Json(JsonView::Text { title: "Form Definition JSON".to_owned(), text: ctx.form_text.to_owned() }),
        ViewMode::FormDataJson => View::Json(match ctx.records.selected_id() {
            Some(id) => JsonView::Text { title: format!("Submitted Data JSON (ID: {id})"), text: ctx.record_text.to_owned() },
            None => JsonView::Empty(NO_RECORD_SELECTED),
        }),
    };
    let overlay = if ctx.mode == ViewMode::Editor { overlay_view(ctx) } else { None };
    Projection { mode: ctx.mode, view, overlay, widgets: handles }
}

fn form_view(
    ctx: &RenderContext<'_>,
    record: Option<&serde_json::Map<String, Value>>,
    widgets: &mut WidgetTable,
    handles: &mut Vec<Box<dyn WidgetHandle>>,
) -> FormView {
    let editor = ctx.mode == ViewMode::Editor;
    let palette = if editor && ctx.show_palette { ctx.doc.schema.filtered_palette(ctx.palette_search) } else { Vec::new() };
    let sections = ctx
        .doc
        .sections()
        .iter()
        .map(|section| section_view(ctx, section, record, widgets, handles))
        .collect();
    FormView {
        header: FormHeader { name: ctx.doc.config.name.clone(), mode_label: ctx.mode.label() },
        palette,
        sections,
        editable: editor,
        submit: ctx.mode.submit_label(),
    }
}

fn section_view(
    ctx: &RenderContext<'_>,
    section: &Section,
    record: Option<&serde_json::Map<String, Value>>,
    widgets: &mut WidgetTable,
    handles: &mut Vec<Box<dyn WidgetHandle>>,
) -> SectionView {
    let rows = section
        .rows
        .iter()
        .map(|row| RowView {
            id: row.id.clone(),
            condition: row.condition.clone(),
            columns: row
                .columns
                .iter()
                .map(|col| ColumnView {
                    id: col.id.clone(),
                    width: col.width,
                    element: element_view(ctx, &col.element, record, widgets, handles),
                })
                .collect(),
        })
        .collect();

    let zones = if ctx.mode == ViewMode::Editor {
        (0..=section.rows.len())
            .map(|i| {
                let zone = DropZone::new(section.id.clone(), i);
                let state = if ctx.placement.is_active(&zone) {
                    ZoneState::Hovered
                } else if ctx.placement.is_dragging() {
                    ZoneState::Armed
                } else {
                    ZoneState::Inert
                };
                ZoneView { zone, state }
            })
            .collect()
    } else {
        Vec::new()
    };

    SectionView { id: section.id.clone(), title: section.title.clone(), rows, zones }
}

fn element_view(
    ctx: &RenderContext<'_>,
    element: &FormElement,
    record: Option<&serde_json::Map<String, Value>>,
    widgets: &mut WidgetTable,
    handles: &mut Vec<Box<dyn WidgetHandle>>,
) -> ElementView {
    let base = element.base();
    let icon_name = base
        .icon
        .as_deref()
        .or_else(|| ctx.doc.schema.lookup(element.element_type()).map(|def| def.icon.as_str()));
    let icon = icon_name.map_or(FALLBACK_ICON_GLYPH, icon_glyph);

    let body = match element {
        FormElement::Display(display) => ElementBody::Display { content: display.content.clone() },
        FormElement::Field(field) => {
            let id = &field.base.id;
            let read_only = !ctx.mode.is_entry();
            let slot = format!("{}:{id}", ctx.mode.as_str().to_ascii_lowercase());
            let value = match (ctx.mode, record) {
                (ViewMode::View, Some(fields)) => fields.get(id).cloned(),
                (ViewMode::Add | ViewMode::Update, _) => ctx.entry.value(id).cloned(),
                _ => None,
            };
            let error = if ctx.mode.is_entry() { ctx.entry.error(id).map(str::to_owned) } else { None };
            handles.push(widgets.instantiate(slot.clone(), field, read_only));
            ElementBody::Widget(WidgetView {
                kind: WidgetKind::for_type(field.element_type),
                slot,
                label: field.label.clone(),
                read_only,
                value: value.unwrap_or(Value::Null),
                error,
                placeholder: field.placeholder.clone(),
                options: field.options.clone(),
            })
        }
    };

    ElementView {
        id: base.id.clone(),
        element_type: element.element_type(),
        icon,
        subtitle: base.subtitle.clone(),
        description: base.description.clone(),
        photo: base.photo.clone(),
        body,
    }
}

fn list_view(records: &RecordStore) -> ListView {
    let selected = records.selected_id();
    let rows: Vec<ListRow> = records
        .records()
        .iter()
        .map(|r| ListRow { id: r.id, summary: r.summary(), selected: selected == Some(r.id), actions: ListAction::ALL })
        .collect();
    let empty = if rows.is_empty() { Some(NO_RECORDS) } else { None };
    ListView { rows, empty }
}

fn overlay_view(ctx: &RenderContext<'_>) -> Option<OverlayView> {
    match ctx.overlay.active()? {
        Overlay::ContextMenu { element_id, x, y } => {
            Some(OverlayView::ContextMenu { element_id: element_id.clone(), x: *x, y: *y, actions: ContextAction::ALL })
        }
        Overlay::EditDialog(dialog) => Some(OverlayView::EditDialog(DialogView {
            element_id: dialog.element_id().to_owned(),
            primary_label: dialog.primary_label(),
            type_choices: ctx.doc.schema.types().collect(),
            draft: dialog.draft().clone(),
        })),
    }
}

// =============================================================================
// TEXT OUTLINE
// =============================================================================

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.view {
            View::Form(form) => write_form(f, form)?,
            View::List(list) => {
                writeln!(f, "[{}] records: {}", self.mode, list.rows.len())?;
                if let Some(empty) = list.empty {
                    writeln!(f, "  {empty}")?;
                }
                for row in &list.rows {
                    let mark = if row.selected { "*" } else { " " };
                    let actions: Vec<_> = row.actions.iter().map(|a| a.label()).collect();
                    writeln!(f, "{mark} #{} {}  [{}]", row.id, row.summary, actions.join(" | "))?;
                }
            }
            View::Json(JsonView::Text { title, text }) => {
                writeln!(f, "[{}] {title}", self.mode)?;
                writeln!(f, "{text}")?;
            }
            View::Json(JsonView::Empty(message)) | View::Notice(message) => {
                writeln!(f, "[{}] {message}", self.mode)?;
            }
        }
        match &self.overlay {
            Some(OverlayView::ContextMenu { element_id, actions, .. }) => {
                let labels: Vec<_> = actions.iter().map(|a| a.label()).collect();
                writeln!(f, "menu for {element_id}: {}", labels.join(" | "))?;
            }
            Some(OverlayView::EditDialog(dialog)) => {
                writeln!(
                    f,
                    "editing {} as {}: {} = {:?}",
                    dialog.element_id,
                    dialog.draft.element_type(),
                    dialog.primary_label,
                    dialog.draft.primary_text()
                )?;
            }
            None => {}
        }
        Ok(())
    }
}

fn write_form(f: &mut fmt::Formatter<'_>, form: &FormView) -> fmt::Result {
    writeln!(f, "[{}] {}", form.header.mode_label, form.header.name)?;
    for group in &form.palette {
        let names: Vec<_> = group.entries.iter().map(|e| e.name.as_str()).collect();
        writeln!(f, "  palette {}: {}", group.category, names.join(", "))?;
    }
    for section in &form.sections {
        writeln!(f, "section {} \"{}\"", section.id, section.title)?;
        for (i, row) in section.rows.iter().enumerate() {
            if let Some(zone) = section.zones.get(i) {
                write_zone(f, zone)?;
            }
            let cond = row.condition.as_ref().map_or(String::new(), |c| format!(" if {} {:?} {}", c.field_id, c.operator, c.value));
            writeln!(f, "  row {}{cond}", row.id)?;
            for col in &row.columns {
                write_element(f, col)?;
            }
        }
        if let Some(zone) = section.zones.last() {
            write_zone(f, zone)?;
        }
    }
    if let Some(submit) = form.submit {
        writeln!(f, "  ({submit})")?;
    }
    Ok(())
}

fn write_zone(f: &mut fmt::Formatter<'_>, zone: &ZoneView) -> fmt::Result {
    let mark = match zone.state {
        ZoneState::Inert => "·",
        ZoneState::Armed => "+",
        ZoneState::Hovered => ">",
    };
    writeln!(f, "  {mark} drop {}", zone.zone.row_index)
}

fn write_element(f: &mut fmt::Formatter<'_>, col: &ColumnView) -> fmt::Result {
    let el = &col.element;
    match &el.body {
        ElementBody::Display { content } => {
            writeln!(f, "    [{}] {} {} ({}) {}", col.width.as_str(), el.icon, content, el.element_type, el.id)
        }
        ElementBody::Widget(w) => {
            let lock = if w.read_only { " ro" } else { "" };
            write!(f, "    [{}] {} {} ({}) <{}{lock}> {}", col.width.as_str(), el.icon, w.label, el.element_type, w.kind, el.id)?;
            if !w.value.is_null() {
                write!(f, " = {}", w.value)?;
            }
            if let Some(error) = &w.error {
                write!(f, " !{error}")?;
            }
            writeln!(f)
        }
    }
}
