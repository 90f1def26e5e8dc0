//! Placement engine: palette drag sources, drop zones, and the drag state
//! machine that turns a drop into a new row.
//!
//! The state machine has two states. A palette drag-start moves it from
//! [`DragState::Idle`] to [`DragState::Dragging`]; any drop, cancel, or
//! drag-end moves it back to idle and clears zone highlighting, whether or
//! not the drop produced an element.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use std::collections::BTreeMap;

use tracing::debug;

use crate::consts::{DRAG_TEXT_KEY, DRAG_TYPE_KEY};
use crate::doc::FormDefinition;
use crate::error::EditorError;
use crate::schema::ElementType;

/// An insertion point: before row `row_index` of section `section_id`, or at
/// the end of the section when `row_index` equals its row count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropZone {
    pub section_id: String,
    pub row_index: usize,
}

impl DropZone {
    #[must_use]
    pub fn new(section_id: impl Into<String>, row_index: usize) -> Self {
        Self { section_id: section_id.into(), row_index }
    }
}

/// Drag payload as carried by the platform's transfer object. The element
/// type tag is written under two keys; readers take whichever is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferData {
    slots: BTreeMap<String, String>,
}

impl TransferData {
    /// Payload for dragging `ty` off the palette.
    #[must_use]
    pub fn for_type(ty: ElementType) -> Self {
        let mut data = Self::default();
        data.set(DRAG_TYPE_KEY, ty.as_str());
        data.set(DRAG_TEXT_KEY, ty.as_str());
        data
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// The element type tag, from the primary slot first, then the text slot.
    /// Blank values count as absent.
    #[must_use]
    pub fn element_tag(&self) -> Option<&str> {
        [DRAG_TYPE_KEY, DRAG_TEXT_KEY]
            .into_iter()
            .filter_map(|key| self.get(key))
            .map(str::trim)
            .find(|tag| !tag.is_empty())
    }
}

/// Drag gesture state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A palette item is being dragged.
    Dragging {
        /// Type carried by the drag, kept in case the drop event's payload
        /// comes back empty.
        element_type: ElementType,
    },
}

/// What a completed drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A new row was inserted holding the element with this id.
    Placed { element_id: String, section_id: String, row_index: usize },
    /// Nothing to place (empty payload or missing section).
    Ignored,
}

/// Drag tracking and zone highlighting. Holds no document state.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    state: DragState,
    hovered: Option<DropZone>,
}

impl PlacementEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The zone currently marked active, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&DropZone> {
        self.hovered.as_ref()
    }

    #[must_use]
    pub fn is_active(&self, zone: &DropZone) -> bool {
        self.hovered.as_ref() == Some(zone)
    }

    /// Begin dragging `ty` from the palette. Returns the transfer payload to
    /// hand to the platform.
    pub fn drag_start(&mut self, ty: ElementType) -> TransferData {
        self.state = DragState::Dragging { element_type: ty };
        self.hovered = None;
        TransferData::for_type(ty)
    }

    /// Pointer entered or moved over `zone`. Only marks it while dragging.
    pub fn drag_over(&mut self, zone: DropZone) {
        if self.is_dragging() {
            self.hovered = Some(zone);
        }
    }

    /// Pointer left `zone`.
    pub fn drag_leave(&mut self, zone: &DropZone) {
        if self.hovered.as_ref() == Some(zone) {
            self.hovered = None;
        }
    }

    /// Drag finished without a drop, or was cancelled. Always returns to idle.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
        self.hovered = None;
    }

    /// Resolve a drop on `zone` into a new row.
    ///
    /// The engine returns to idle on every path. An empty payload or a zone
    /// whose section no longer exists is ignored.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the payload names a type the document's
    /// registry cannot create. The document is unchanged.
    pub fn drop(&mut self, zone: &DropZone, data: &TransferData, doc: &mut FormDefinition) -> Result<DropOutcome, EditorError> {
        let fallback = match self.state {
            DragState::Dragging { element_type } => Some(element_type),
            DragState::Idle => None,
        };
        self.drag_end();

        let ty = match data.element_tag() {
            Some(tag) => tag.parse::<ElementType>()?,
            None => match fallback {
                Some(ty) => ty,
                None => {
                    debug!(section_id = %zone.section_id, "drop without payload ignored");
                    return Ok(DropOutcome::Ignored);
                }
            },
        };

        if doc.section(&zone.section_id).is_none() {
            debug!(section_id = %zone.section_id, "drop on missing section ignored");
            return Ok(DropOutcome::Ignored);
        }

        let element = doc.create_element(ty)?;
        let element_id = element.id().to_owned();
        let row_index = doc.insert_row(&zone.section_id, zone.row_index, element)?;
        Ok(DropOutcome::Placed { element_id, section_id: zone.section_id.clone(), row_index })
    }

    /// Drop on the canvas background, outside every zone: appends to the
    /// first section. Ignored when the document has no sections.
    ///
    /// # Errors
    ///
    /// Same as [`drop`](Self::drop).
    pub fn drop_on_canvas(&mut self, data: &TransferData, doc: &mut FormDefinition) -> Result<DropOutcome, EditorError> {
        let Some(first) = doc.sections().first() else {
            self.drag_end();
            return Ok(DropOutcome::Ignored);
        };
        let zone = DropZone::new(first.id.clone(), first.rows.len());
        self.drop(&zone, data, doc)
    }
}

/// Every drop zone in `doc`: one before each row of every section and one at
/// the end of each section, in document order.
#[must_use]
pub fn drop_zones(doc: &FormDefinition) -> Vec<DropZone> {
    doc.sections()
        .iter()
        .flat_map(|s| (0..=s.rows.len()).map(move |i| DropZone::new(s.id.clone(), i)))
        .collect()
}
