//! Editor core: owns every piece of editor state and turns gestures into
//! [`Action`]s.
//!
//! DESIGN
//! ======
//! The host forwards platform events (palette drags, drops, clicks, text
//! edits, timer ticks) to [`EditorCore`] and re-projects after any call that
//! returns a non-empty action list. All mutation funnels through here, so
//! this is also where the error policy lives:
//!
//! - `UnknownType` is logged at warn and returned to the caller.
//! - `MissingTarget` is logged at debug and becomes an empty action list.
//! - Malformed JSON text never reaches the caller; the bridge drops it.
//!
//! Every document mutation publishes a snapshot to the document JSON bridge,
//! and every record mutation to the record bridge. A successful inbound parse
//! replaces the model without publishing back to the bridge it came from.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::consts::{MODEL_TO_TEXT_DEBOUNCE_MS, TEXT_TO_MODEL_DEBOUNCE_MS};
use crate::doc::{DeletePolicy, FormDefinition, MoveDirection};
use crate::entry::EntryState;
use crate::error::{EditorError, ErrorCode};
use crate::overlay::{ContextAction, EditDialog, Overlay, OverlayManager};
use crate::placement::{DropOutcome, DropZone, PlacementEngine, TransferData};
use crate::records::{Record, RecordId, RecordStore};
use crate::render::{ListAction, Projection, RenderContext, ViewMode, project};
use crate::schema::ElementType;
use crate::sync::{BufferSurface, JsonBridge, SyncOutcome, TextSurface};
use crate::widget::WidgetTable;

/// Tunables for one editor instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Quiet period before edited JSON text is parsed.
    pub text_debounce: Duration,
    /// Delay before a model change reaches a JSON surface.
    pub model_debounce: Duration,
    pub delete_policy: DeletePolicy,
    pub show_palette: bool,
    pub initial_mode: ViewMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text_debounce: Duration::from_millis(TEXT_TO_MODEL_DEBOUNCE_MS),
            model_debounce: Duration::from_millis(MODEL_TO_TEXT_DEBOUNCE_MS),
            delete_policy: DeletePolicy::WholeRow,
            show_palette: true,
            initial_mode: ViewMode::Editor,
        }
    }
}

/// Observable outcome of an editor call. The host re-projects after any.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ModeChanged(ViewMode),
    ElementCreated { element_id: String, section_id: String, row_index: usize },
    ElementUpdated { element_id: String },
    ElementDeleted { element_id: String, rows_removed: usize },
    ElementDuplicated { source_id: String, element_id: String },
    RowMoved { row_id: String },
    FormRenamed(String),
    OverlayChanged,
    EntryChanged { field_id: String },
    ValidationFailed { errors: usize },
    RecordSubmitted(RecordId),
    RecordUpdated(RecordId),
    RecordDeleted(RecordId),
    RecordSelected(RecordId),
    /// A JSON surface received a fresh snapshot.
    TextPushed(ViewMode),
    /// Edited document JSON replaced the document.
    DocumentReplaced,
    /// Edited record JSON replaced a stored record.
    RecordReplaced(RecordId),
}

pub struct EditorCore {
    pub doc: FormDefinition,
    pub records: RecordStore,
    pub placement: PlacementEngine,
    pub overlay: OverlayManager,
    pub entry: EntryState,
    config: EditorConfig,
    mode: ViewMode,
    palette_search: String,
    form_bridge: JsonBridge<FormDefinition>,
    record_bridge: JsonBridge<Record>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new(FormDefinition::default(), EditorConfig::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new(doc: FormDefinition, config: EditorConfig) -> Self {
        let (inbound, outbound) = (config.text_debounce, config.model_debounce);
        let mut core = Self {
            doc,
            records: RecordStore::new(),
            placement: PlacementEngine::new(),
            overlay: OverlayManager::new(),
            entry: EntryState::blank(),
            mode: config.initial_mode,
            palette_search: String::new(),
            form_bridge: JsonBridge::new(BufferSurface::new(), inbound, outbound),
            record_bridge: JsonBridge::new(BufferSurface::new(), inbound, outbound),
            config,
        };
        core.publish_doc();
        core
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Replace the record store, clearing the selection.
    pub fn load_records(&mut self, records: Vec<Record>) {
        self.records = RecordStore::from_records(records);
        self.publish_record();
    }

    // =========================================================================
    // MODES AND LIST
    // =========================================================================

    /// Switch the active mode. Never touches the document. Entering ADD
    /// starts a blank entry; entering UPDATE binds the selected record.
    pub fn set_mode(&mut self, mode: ViewMode) -> Action {
        if mode != ViewMode::Editor && self.overlay.close().is_some() {
            debug!("overlay closed on mode change");
        }
        match mode {
            ViewMode::Add => self.entry = EntryState::blank(),
            ViewMode::Update => {
                self.entry = self.records.selected().map_or_else(EntryState::blank, EntryState::from_record);
            }
            _ => {}
        }
        self.mode = mode;
        Action::ModeChanged(mode)
    }

    /// A per-row button in the LIST view.
    pub fn list_action(&mut self, id: RecordId, action: ListAction) -> Vec<Action> {
        match action {
            ListAction::View | ListAction::Update => {
                let previous = self.records.selected_id();
                if let Err(e) = self.records.select(id) {
                    debug!(error = %e, "list action on missing record ignored");
                    return Vec::new();
                }
                let mut actions = Vec::new();
                if previous == Some(id) {
                    self.publish_record();
                } else {
                    actions.extend(self.switch_record_text());
                }
                let mode = if action == ListAction::View { ViewMode::View } else { ViewMode::Update };
                actions.push(Action::RecordSelected(id));
                actions.push(self.set_mode(mode));
                actions
            }
            ListAction::Delete => {
                let was_selected = self.records.selected_id() == Some(id);
                if self.records.delete(id).is_none() {
                    debug!(record_id = id, "delete of missing record ignored");
                    return Vec::new();
                }
                info!(record_id = id, "record deleted");
                let mut actions = vec![Action::RecordDeleted(id)];
                if was_selected && self.mode.needs_record() {
                    actions.push(self.set_mode(ViewMode::List));
                }
                actions
            }
        }
    }

    // =========================================================================
    // PALETTE AND PLACEMENT
    // =========================================================================

    pub fn set_palette_search(&mut self, search: &str) {
        search.clone_into(&mut self.palette_search);
    }

    #[must_use]
    pub fn palette_search(&self) -> &str {
        &self.palette_search
    }

    pub fn drag_start(&mut self, ty: ElementType) -> TransferData {
        self.placement.drag_start(ty)
    }

    pub fn drag_over(&mut self, zone: DropZone) {
        self.placement.drag_over(zone);
    }

    pub fn drag_leave(&mut self, zone: &DropZone) {
        self.placement.drag_leave(zone);
    }

    pub fn drag_end(&mut self) {
        self.placement.drag_end();
    }

    /// Drop onto `zone`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` when the payload names a type the document's
    /// registry lacks. The document is unchanged.
    pub fn drop(&mut self, zone: &DropZone, data: &TransferData) -> Result<Vec<Action>, EditorError> {
        let outcome = self.placement.drop(zone, data, &mut self.doc);
        self.placed(outcome)
    }

    /// Drop onto the canvas background.
    ///
    /// # Errors
    ///
    /// Same as [`drop`](Self::drop).
    pub fn drop_on_canvas(&mut self, data: &TransferData) -> Result<Vec<Action>, EditorError> {
        let outcome = self.placement.drop_on_canvas(data, &mut self.doc);
        self.placed(outcome)
    }

    fn placed(&mut self, outcome: Result<DropOutcome, EditorError>) -> Result<Vec<Action>, EditorError> {
        match self.recover(outcome)? {
            Some(DropOutcome::Placed { element_id, section_id, row_index }) => {
                self.publish_doc();
                Ok(vec![Action::ElementCreated { element_id, section_id, row_index }])
            }
            Some(DropOutcome::Ignored) | None => Ok(Vec::new()),
        }
    }

    // =========================================================================
    // STRUCTURAL EDITS
    // =========================================================================

    /// Delete an element using the configured policy.
    pub fn delete_element(&mut self, element_id: &str) -> Vec<Action> {
        if self.doc.find_element(element_id).is_none() {
            debug!(element_id, "delete of missing element ignored");
            return Vec::new();
        }
        let rows_removed = self.doc.delete_element_with(element_id, self.config.delete_policy);
        self.publish_doc();
        vec![Action::ElementDeleted { element_id: element_id.to_owned(), rows_removed }]
    }

    pub fn duplicate_element(&mut self, element_id: &str) -> Vec<Action> {
        let duplicated = self.doc.duplicate_element(element_id);
        match self.recover(duplicated) {
            Ok(Some(new_id)) => {
                self.publish_doc();
                vec![Action::ElementDuplicated { source_id: element_id.to_owned(), element_id: new_id }]
            }
            Ok(None) | Err(_) => Vec::new(),
        }
    }

    /// Change an element's type in place.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the registry lacks `ty`.
    pub fn morph_element(&mut self, element_id: &str, ty: ElementType) -> Result<Vec<Action>, EditorError> {
        let morphed = self.doc.morph_element(element_id, ty);
        Ok(match self.recover(morphed)? {
            Some(()) => {
                self.publish_doc();
                vec![Action::ElementUpdated { element_id: element_id.to_owned() }]
            }
            None => Vec::new(),
        })
    }

    pub fn move_row(&mut self, row_id: &str, direction: MoveDirection) -> Vec<Action> {
        let moved = self.doc.move_row(row_id, direction);
        match self.recover(moved) {
            Ok(Some(true)) => {
                self.publish_doc();
                vec![Action::RowMoved { row_id: row_id.to_owned() }]
            }
            _ => Vec::new(),
        }
    }

    /// Change the form's display name.
    pub fn rename(&mut self, name: &str) -> Action {
        self.doc.rename(name);
        self.publish_doc();
        Action::FormRenamed(name.to_owned())
    }

    // =========================================================================
    // CONTEXT MENU AND EDIT DIALOG
    // =========================================================================

    /// Secondary click or long press on an element. EDITOR only.
    pub fn open_context_menu(&mut self, element_id: &str, x: f64, y: f64) -> Option<Action> {
        if self.mode != ViewMode::Editor || self.doc.find_element(element_id).is_none() {
            return None;
        }
        self.overlay.open(Overlay::ContextMenu { element_id: element_id.to_owned(), x, y });
        Some(Action::OverlayChanged)
    }

    /// Click outside the open overlay.
    pub fn close_overlay(&mut self) -> Option<Action> {
        self.overlay.close().map(|_| Action::OverlayChanged)
    }

    /// Run a context menu entry against the menu's element. The menu closes.
    pub fn context_action(&mut self, action: ContextAction) -> Vec<Action> {
        let Some(element_id) = self.overlay.menu_target().map(str::to_owned) else {
            return Vec::new();
        };
        self.overlay.close();
        let mut actions = vec![Action::OverlayChanged];
        match action {
            ContextAction::Edit => actions.extend(self.open_edit_dialog(&element_id)),
            ContextAction::Delete => actions.extend(self.delete_element(&element_id)),
            ContextAction::Duplicate => actions.extend(self.duplicate_element(&element_id)),
        }
        actions
    }

    /// Open the edit dialog on a copy of the element. Double click lands here.
    pub fn open_edit_dialog(&mut self, element_id: &str) -> Option<Action> {
        if self.mode != ViewMode::Editor {
            return None;
        }
        let Some(element) = self.doc.find_element(element_id) else {
            debug!(element_id, "edit of missing element ignored");
            return None;
        };
        self.overlay.open(Overlay::EditDialog(EditDialog::new(element.clone())));
        Some(Action::OverlayChanged)
    }

    /// The open edit dialog, for field edits.
    pub fn dialog_mut(&mut self) -> Option<&mut EditDialog> {
        self.overlay.dialog_mut()
    }

    /// Change the draft's type from the dialog's type select.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the registry lacks `ty`.
    pub fn dialog_change_type(&mut self, ty: ElementType) -> Result<Option<Action>, EditorError> {
        let Some(dialog) = self.overlay.dialog_mut() else {
            return Ok(None);
        };
        if let Err(e) = dialog.change_type(&self.doc, ty) {
            warn!(code = e.error_code(), error = %e, "type change rejected");
            return Err(e);
        }
        Ok(Some(Action::OverlayChanged))
    }

    /// Commit the draft and close the dialog.
    pub fn dialog_save(&mut self) -> Vec<Action> {
        let Some(dialog) = self.overlay.take_dialog() else {
            return Vec::new();
        };
        let draft = dialog.into_draft();
        let element_id = draft.id().to_owned();
        let mut actions = vec![Action::OverlayChanged];
        let updated = self.doc.update_element(draft);
        if let Ok(Some(())) = self.recover(updated) {
            self.publish_doc();
            actions.push(Action::ElementUpdated { element_id });
        }
        actions
    }

    /// Delete the dialog's element and close the dialog.
    pub fn dialog_delete(&mut self) -> Vec<Action> {
        let Some(dialog) = self.overlay.take_dialog() else {
            return Vec::new();
        };
        let mut actions = vec![Action::OverlayChanged];
        actions.extend(self.delete_element(dialog.element_id()));
        actions
    }

    /// Discard the draft.
    pub fn dialog_cancel(&mut self) -> Option<Action> {
        self.overlay.take_dialog().map(|_| Action::OverlayChanged)
    }

    // =========================================================================
    // DATA ENTRY
    // =========================================================================

    /// A leaf widget reported a new value. ADD and UPDATE only.
    pub fn set_field_value(&mut self, field_id: &str, value: Value) -> Option<Action> {
        if !self.mode.is_entry() {
            return None;
        }
        let Some(field) = self.doc.find_element(field_id).and_then(|el| el.as_field()) else {
            debug!(field_id, "value for unknown field ignored");
            return None;
        };
        self.entry.set_value(field, value);
        Some(Action::EntryChanged { field_id: field_id.to_owned() })
    }

    /// Submit the entry form. Refused while any field fails validation.
    pub fn submit(&mut self) -> Vec<Action> {
        if !self.mode.is_entry() {
            return Vec::new();
        }
        if !self.entry.validate_all(&self.doc) {
            let errors = self.entry.errors().len();
            debug!(errors, "submit refused");
            return vec![Action::ValidationFailed { errors }];
        }
        let values = self.entry.values().clone();
        let action = if self.mode == ViewMode::Add {
            let id = self.records.insert(values);
            info!(record_id = id, "record submitted");
            self.entry = EntryState::blank();
            Action::RecordSubmitted(id)
        } else {
            let Some(id) = self.records.selected_id() else {
                return Vec::new();
            };
            let updated = self.records.update(id, values);
            if !matches!(self.recover(updated), Ok(Some(()))) {
                return Vec::new();
            }
            info!(record_id = id, "record updated");
            self.publish_record();
            Action::RecordUpdated(id)
        };
        vec![action]
    }

    // =========================================================================
    // JSON SYNC
    // =========================================================================

    /// Text typed into the document JSON surface.
    pub fn form_text_changed(&mut self, text: &str) {
        self.form_bridge.edit_text(text, Instant::now());
    }

    /// Text typed into the record JSON surface.
    pub fn record_text_changed(&mut self, text: &str) {
        self.record_bridge.edit_text(text, Instant::now());
    }

    #[must_use]
    pub fn form_text(&self) -> String {
        self.form_bridge.surface().value()
    }

    #[must_use]
    pub fn record_text(&self) -> String {
        self.record_bridge.surface().value()
    }

    /// Earliest time [`poll_sync`](Self::poll_sync) has work to do.
    #[must_use]
    pub fn next_sync_deadline(&self) -> Option<Instant> {
        match (self.form_bridge.next_deadline(), self.record_bridge.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run due sync work on both bridges.
    pub fn poll_sync(&mut self) -> Vec<Action> {
        let now = Instant::now();
        let mut actions = Vec::new();
        match self.form_bridge.poll(now) {
            SyncOutcome::Applied(doc) => {
                info!(uid = %doc.config.uid, "document replaced from JSON");
                self.doc = doc;
                actions.push(Action::DocumentReplaced);
            }
            SyncOutcome::Pushed => actions.push(Action::TextPushed(ViewMode::FormJson)),
            SyncOutcome::Idle | SyncOutcome::Rejected => {}
        }
        match self.record_bridge.poll(now) {
            SyncOutcome::Applied(record) => actions.extend(self.adopt_record(record)),
            SyncOutcome::Pushed => actions.push(Action::TextPushed(ViewMode::FormDataJson)),
            SyncOutcome::Idle | SyncOutcome::Rejected => {}
        }
        actions
    }

    /// Wait out every pending debounce, collecting the actions.
    pub async fn settle(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(deadline) = self.next_sync_deadline() {
            tokio::time::sleep_until(deadline).await;
            actions.extend(self.poll_sync());
        }
        actions
    }

    // =========================================================================
    // PROJECTION
    // =========================================================================

    /// Project the active mode.
    #[must_use]
    pub fn project(&self, widgets: &mut WidgetTable) -> Projection {
        let form_text = self.form_text();
        let record_text = self.record_text();
        let ctx = RenderContext {
            mode: self.mode,
            doc: &self.doc,
            records: &self.records,
            entry: &self.entry,
            placement: &self.placement,
            overlay: &self.overlay,
            form_text: &form_text,
            record_text: &record_text,
            palette_search: &self.palette_search,
            show_palette: self.config.show_palette,
        };
        project(&ctx, widgets)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Apply the error policy: missing targets become `None`, anything else
    /// is logged and returned.
    fn recover<T>(&self, result: Result<T, EditorError>) -> Result<Option<T>, EditorError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e @ EditorError::MissingTarget { .. }) => {
                debug!(code = e.error_code(), error = %e, "target gone; ignored");
                Ok(None)
            }
            Err(e) => {
                warn!(code = e.error_code(), error = %e, mode = %self.mode, "editor operation failed");
                Err(e)
            }
        }
    }

    fn publish_doc(&mut self) {
        if let Err(e) = self.form_bridge.model_changed(&self.doc, Instant::now()) {
            warn!(error = %e, "document snapshot failed");
        }
    }

    /// Store a record parsed from the JSON tab. Unknown ids are a no-op.
    fn adopt_record(&mut self, record: Record) -> Option<Action> {
        let id = record.id;
        let replaced = self.records.replace(record);
        match self.recover(replaced) {
            Ok(Some(())) => {
                info!(record_id = id, "record replaced from JSON");
                Some(Action::RecordReplaced(id))
            }
            _ => None,
        }
    }

    /// The selection moved to another record: settle the edit typed against
    /// the old one, then show the new one regardless of what was queued.
    fn switch_record_text(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let SyncOutcome::Applied(record) = self.record_bridge.flush() {
            actions.extend(self.adopt_record(record));
        }
        if let Some(record) = self.records.selected() {
            if let Err(e) = self.record_bridge.show_model(record) {
                warn!(error = %e, "record snapshot failed");
            }
        }
        actions
    }

    fn publish_record(&mut self) {
        let Some(record) = self.records.selected() else {
            return;
        };
        if let Err(e) = self.record_bridge.model_changed(record, Instant::now()) {
            warn!(error = %e, "record snapshot failed");
        }
    }
}
