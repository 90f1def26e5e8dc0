//! Form-definition editor engine.
//!
//! This crate owns the authoring model behind the visual form designer: the
//! schema registry of element types, the section/row/column/element document
//! tree and its mutation primitives, the drag-and-drop placement state
//! machine, the per-mode projection of the document into views, and the
//! debounced JSON text bridges. The host layer is responsible only for wiring
//! platform events to [`engine::EditorCore`] and presenting the resulting
//! [`render::Projection`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level editor core; turns gestures into [`engine::Action`]s |
//! | [`schema`] | Element type tags and the registry of default properties |
//! | [`doc`] | `FormDefinition` tree and structural mutation primitives |
//! | [`placement`] | Drag sources, drop zones, and the drag state machine |
//! | [`render`] | View modes and projection of the document into view trees |
//! | [`widget`] | Leaf widget dispatch table and factory contract |
//! | [`overlay`] | Single-slot overlay manager (context menu, edit dialog) |
//! | [`entry`] | Data-capture state and field validation for ADD/UPDATE |
//! | [`records`] | In-memory store of submitted records |
//! | [`sync`] | Debounced text/JSON bridges and the text-surface contract |
//! | [`error`] | Error taxonomy shared by every module |
//! | [`consts`] | Shared constants (transfer keys, default texts, delays) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod entry;
pub mod error;
pub mod overlay;
pub mod placement;
pub mod records;
pub mod render;
pub mod schema;
pub mod sync;
pub mod widget;
