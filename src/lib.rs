/* src/lib.rs */

//!
//! Composition root for a component-catalog and documentation generator.
//!
//! The crate is built around one coordinator, [`Folio`], which owns:
//!
//! - **config**: a configuration overlay, built-in defaults plus one override
//!   layer, optionally read from a project config file.
//! - **events**: a synchronous, ordered publish/subscribe channel.
//! - **frontend**: the CLI and web front ends and their consoles.
//! - **source**: the registry of content sources (`components`, `docs`) and
//!   the lifecycle contract they implement.
//! - **fatal**: the panic escalation policy chosen at construction.
//!
//! Front ends drive the sources through [`Folio::load`], [`Folio::watch`],
//! [`Folio::unwatch`] and [`Folio::engine`].
//!
//! ## Feature Flags
//!
//! - `full` (default): all of the below.
//! - `toml`, `yaml`: extra project config formats (JSON is always on).
//!
//! ## Basic Usage
//!
//! See `demos/basic.rs` for a complete example.

pub mod config;
pub mod console;
pub mod coordinator;
pub mod events;
pub mod fatal;
pub mod frontend;
pub mod source;

pub use config::Config;
pub use coordinator::{EngineMap, Folio, FolioBuilder, FolioError};
pub use events::Emitter;
pub use frontend::{FrontEnd, FrontEndKind};
pub use source::{ContentSource, SourceError, SourceKind};
