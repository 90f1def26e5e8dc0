//! Overlay manager: at most one context menu or edit dialog at a time.
//!
//! Opening any overlay closes whatever was open before. The edit dialog
//! works on a draft copy of the element; the document only changes when the
//! dialog is saved.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::doc::{FormDefinition, FormElement};
use crate::error::EditorError;
use crate::schema::{ElementKind, ElementType};

/// Context menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Edit,
    Delete,
    Duplicate,
}

impl ContextAction {
    pub const ALL: [ContextAction; 3] = [Self::Edit, Self::Delete, Self::Duplicate];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Duplicate => "Duplicate",
        }
    }
}

/// Element editor backed by a draft. Type changes morph the draft through
/// the document's registry so the preview matches what save will commit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDialog {
    draft: FormElement,
}

impl EditDialog {
    #[must_use]
    pub fn new(element: FormElement) -> Self {
        Self { draft: element }
    }

    #[must_use]
    pub fn draft(&self) -> &FormElement {
        &self.draft
    }

    #[must_use]
    pub fn into_draft(self) -> FormElement {
        self.draft
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        self.draft.id()
    }

    /// Caption for the primary text input.
    #[must_use]
    pub fn primary_label(&self) -> &'static str {
        match self.draft.kind() {
            ElementKind::Field => "Label",
            ElementKind::Display => "Content",
        }
    }

    /// Switch the draft to `ty`, carrying identity and text across.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if `doc`'s registry lacks `ty`. The draft is
    /// unchanged.
    pub fn change_type(&mut self, doc: &FormDefinition, ty: ElementType) -> Result<(), EditorError> {
        if ty == self.draft.element_type() {
            return Ok(());
        }
        self.draft = doc.morph_element_type(&self.draft, ty)?;
        Ok(())
    }

    pub fn set_primary_text(&mut self, text: &str) {
        self.draft.set_primary_text(text);
    }

    pub fn set_subtitle(&mut self, text: &str) {
        self.draft.base_mut().subtitle = non_empty(text);
    }

    pub fn set_description(&mut self, text: &str) {
        self.draft.base_mut().description = non_empty(text);
    }

    /// Only fields carry a placeholder; ignored for display elements.
    pub fn set_placeholder(&mut self, text: &str) {
        if let FormElement::Field(field) = &mut self.draft {
            field.placeholder = non_empty(text);
        }
    }

    /// Options as one entry per line; blank lines are dropped.
    pub fn set_options(&mut self, text: &str) {
        if let FormElement::Field(field) = &mut self.draft {
            let options: Vec<String> = text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_owned).collect();
            field.options = if options.is_empty() { None } else { Some(options) };
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() { None } else { Some(text.to_owned()) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    ContextMenu { element_id: String, x: f64, y: f64 },
    EditDialog(EditDialog),
}

/// Single overlay slot.
#[derive(Debug, Clone, Default)]
pub struct OverlayManager {
    active: Option<Overlay>,
}

impl OverlayManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `overlay`, dismissing any open one.
    pub fn open(&mut self, overlay: Overlay) {
        self.active = Some(overlay);
    }

    /// Dismiss the open overlay, returning it.
    pub fn close(&mut self) -> Option<Overlay> {
        self.active.take()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Overlay> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The open edit dialog, if the active overlay is one.
    pub fn dialog_mut(&mut self) -> Option<&mut EditDialog> {
        match &mut self.active {
            Some(Overlay::EditDialog(dialog)) => Some(dialog),
            _ => None,
        }
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&EditDialog> {
        match &self.active {
            Some(Overlay::EditDialog(dialog)) => Some(dialog),
            _ => None,
        }
    }

    /// Element targeted by the open context menu.
    #[must_use]
    pub fn menu_target(&self) -> Option<&str> {
        match &self.active {
            Some(Overlay::ContextMenu { element_id, .. }) => Some(element_id),
            _ => None,
        }
    }

    /// Take the open dialog out of the slot, closing it.
    pub fn take_dialog(&mut self) -> Option<EditDialog> {
        match self.active.take() {
            Some(Overlay::EditDialog(dialog)) => Some(dialog),
            other => {
                self.active = other;
                None
            }
        }
    }
}
