//! Shared constants for the designer crate.

// ── Drag and drop ───────────────────────────────────────────────

/// Primary transfer-data key carrying the element type tag.
pub const DRAG_TYPE_KEY: &str = "application/x-xforms-element-type";

/// Fallback transfer-data key; some engines only expose plain text on drop.
pub const DRAG_TEXT_KEY: &str = "text/plain";

// ── Default document ────────────────────────────────────────────

/// Id of the single section in a freshly created document.
pub const DEFAULT_SECTION_ID: &str = "section-1";

/// Title of the single section in a freshly created document.
pub const DEFAULT_SECTION_TITLE: &str = "Section 1";

/// Name given to a freshly created document.
pub const DEFAULT_FORM_NAME: &str = "New Form";

/// Version stamped on a freshly created document.
pub const DEFAULT_FORM_VERSION: &str = "1.0.0";

// ── Sync ────────────────────────────────────────────────────────

/// Quiet period after the last keystroke before edited JSON is reparsed.
pub const TEXT_TO_MODEL_DEBOUNCE_MS: u64 = 500;

/// Quiet period before a model change is pushed into the text surface.
pub const MODEL_TO_TEXT_DEBOUNCE_MS: u64 = 0;

/// Content-type hint handed to text surfaces.
pub const JSON_CONTENT_TYPE: &str = "json";

// ── Presentation ────────────────────────────────────────────────

/// Message shown in the record JSON view when no record is selected.
pub const NO_RECORD_SELECTED: &str = "Select a record from the LIST tab to view its JSON data.";

/// Glyph used for icon names with no dedicated glyph.
pub const FALLBACK_ICON_GLYPH: &str = "\u{1f4e6}";

/// Category assigned to registry entries with an empty category.
pub const FALLBACK_CATEGORY: &str = "Other";

/// VIEW mode placeholder when no record is selected.
pub const NO_RECORD_TO_VIEW: &str = "Select a record from the LIST tab to view it.";

/// UPDATE mode placeholder when no record is selected.
pub const NO_RECORD_TO_UPDATE: &str = "Select a record from the LIST tab to update it.";

/// LIST mode placeholder when the store is empty.
pub const NO_RECORDS: &str = "No records submitted yet.";
