//! Leaf widget dispatch.
//!
//! Input widgets are external collaborators. The renderer never looks inside
//! one: it picks a [`WidgetKind`] for the field's type, asks the factory
//! registered for that kind to build the widget into a container slot, and
//! keeps the returned handle until the next projection disposes it. Kinds
//! with no registered factory fall back to the generic text-entry factory so
//! one missing widget never fails a whole render.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use std::collections::HashMap;
use std::fmt;

use crate::doc::FormField;
use crate::schema::ElementType;

/// The leaf widget families the editor instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    TextInput,
    NumberInput,
    TextArea,
    Select,
    MultiSelect,
    Checkbox,
    Toggle,
    RadioGroup,
    DatePicker,
    DateTimePicker,
    DateRangePicker,
    TimePicker,
    Rating,
    SignaturePad,
    FileUpload,
    ImageUpload,
}

impl WidgetKind {
    /// Dispatch table from element type to widget family. Types without a
    /// dedicated widget use the generic text input.
    #[must_use]
    pub fn for_type(ty: ElementType) -> Self {
        use ElementType as T;
        match ty {
            T::Number => Self::NumberInput,
            T::Textarea | T::Richtext => Self::TextArea,
            T::Select => Self::Select,
            T::Multiselect => Self::MultiSelect,
            T::Checkbox => Self::Checkbox,
            T::Toggle => Self::Toggle,
            T::Radio => Self::RadioGroup,
            T::Date => Self::DatePicker,
            T::Datetime => Self::DateTimePicker,
            T::Daterange => Self::DateRangePicker,
            T::Time => Self::TimePicker,
            T::Rating => Self::Rating,
            T::Signature => Self::SignaturePad,
            T::File => Self::FileUpload,
            T::Image => Self::ImageUpload,
            _ => Self::TextInput,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "text-input",
            Self::NumberInput => "number-input",
            Self::TextArea => "text-area",
            Self::Select => "select",
            Self::MultiSelect => "multi-select",
            Self::Checkbox => "checkbox",
            Self::Toggle => "toggle",
            Self::RadioGroup => "radio-group",
            Self::DatePicker => "date-picker",
            Self::DateTimePicker => "date-time-picker",
            Self::DateRangePicker => "date-range-picker",
            Self::TimePicker => "time-picker",
            Self::Rating => "rating",
            Self::SignaturePad => "signature-pad",
            Self::FileUpload => "file-upload",
            Self::ImageUpload => "image-upload",
        };
        f.write_str(name)
    }
}

/// Where a widget is mounted. `slot` is unique within one projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContainer {
    pub slot: String,
    pub kind: WidgetKind,
}

/// A live widget. Dropping the handle disposes it.
pub trait WidgetHandle {}

/// Builds one family of leaf widgets.
pub trait WidgetFactory {
    fn create_widget(&mut self, container: &WidgetContainer, field: &FormField, read_only: bool) -> Box<dyn WidgetHandle>;
}

/// Per-kind factories plus the text-entry fallback.
pub struct WidgetTable {
    factories: HashMap<WidgetKind, Box<dyn WidgetFactory>>,
    fallback: Box<dyn WidgetFactory>,
}

impl WidgetTable {
    /// A table with only the text-entry fallback registered.
    #[must_use]
    pub fn new(fallback: Box<dyn WidgetFactory>) -> Self {
        Self { factories: HashMap::new(), fallback }
    }

    /// Register the factory for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: WidgetKind, factory: Box<dyn WidgetFactory>) {
        self.factories.insert(kind, factory);
    }

    #[must_use]
    pub fn has_factory(&self, kind: WidgetKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Instantiate the widget for `field` in `slot`.
    pub fn instantiate(&mut self, slot: String, field: &FormField, read_only: bool) -> Box<dyn WidgetHandle> {
        let kind = WidgetKind::for_type(field.element_type);
        let container = WidgetContainer { slot, kind };
        match self.factories.get_mut(&kind) {
            Some(factory) => factory.create_widget(&container, field, read_only),
            None => self.fallback.create_widget(&container, field, read_only),
        }
    }
}

/// Factory whose widgets are inert placeholders. Used by hosts that only
/// need the projection tree, such as text output.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertWidgets;

struct InertHandle;

impl WidgetHandle for InertHandle {}

impl WidgetFactory for InertWidgets {
    fn create_widget(&mut self, _container: &WidgetContainer, _field: &FormField, _read_only: bool) -> Box<dyn WidgetHandle> {
        Box::new(InertHandle)
    }
}

impl Default for WidgetTable {
    fn default() -> Self {
        Self::new(Box::new(InertWidgets))
    }
}
