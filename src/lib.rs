//! Headless editable data grid
//!
//! A spreadsheet-like table engine built on the Elm Architecture: input
//! arrives as [`GridMsg`]s through [`update_grid`], visual changes leave as
//! [`Patch`]es for a [`RenderSink`], and the host page observes
//! [`GridEvent`]s. No DOM is required; [`DomMirror`] keeps a simulated one.

pub mod cli;
pub mod column;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod csv_import;
pub mod editor;
pub mod events;
pub mod gesture;
pub mod grid;
pub mod host;
pub mod input;
pub mod keys;
pub mod lifecycle;
pub mod messages;
pub mod navigation;
pub mod numeric;
pub mod render;
pub mod row;
pub mod templates;
pub mod tracing;
pub mod update;
pub mod validation;

// Re-export commonly used types
pub use column::{Align, ColumnDef, ColumnType};
pub use commands::Cmd;
pub use config::GridConfig;
pub use events::GridEvent;
pub use grid::{ActiveCell, CommitOutcome, DataGrid, GridMode, SetDataOptions};
pub use host::HeadlessHost;
pub use lifecycle::Component;
pub use messages::{FrameTask, GridMsg};
pub use navigation::CellPosition;
pub use render::{CellContent, DomMirror, Patch, RenderSink};
pub use row::{Row, RowKey};
pub use templates::DetailsTemplate;
pub use update::update_grid;
pub use validation::{Validation, ValidityError};
