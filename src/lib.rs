//! # cr-manager
//!
//! A tool that adds, updates, checks and deletes copyright headers across
//! mixed source trees.
//!
//! Each file's comment dialect is detected (forced type, modeline, suffix,
//! content sniffing), the copyright template is rendered in that dialect at a
//! fixed width of 80 columns, and the existing header block is located and
//! edited in place without disturbing the code, shebang, encoding line or
//! package declaration around it.
//!
//! ## Features
//!
//! * Three comment dialect families: `#` comments, `/** ... **/` doc blocks
//!   and C-style `/** ... */` blocks
//! * Bordered (boxed) and simple header layouts
//! * Check mode that reports `match`, `mismatch` or `not_found` per file
//! * Idempotent add and update: running twice changes nothing the second time
//! * Dry runs that report what would change and show a unified diff
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use cr_manager::engine::{Engine, Status};
//! use cr_manager::registry::Registry;
//! use cr_manager::templates::{Template, TemplateData};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = TemplateData {
//!         year: "2025".to_string(),
//!     };
//!     let template = Template::load(Path::new("COPYRIGHT"), &data)?;
//!
//!     let engine = Engine::new(Registry::builtin(), template);
//!
//!     let outcome = engine.check(Path::new("src/main.c"), None);
//!     if outcome.status != Status::Match {
//!         println!("src/main.c: {}", outcome.status);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`registry`] - The closed set of comment dialects
//! * [`detect`] - Picks the dialect for a file
//! * [`templates`] - Template loading and preprocessing
//! * [`render`] - Renders a template in a dialect
//! * [`locate`] - Finds an existing header block
//! * [`engine`] - The check, add, update and delete verbs
//!
//! [`registry`]: crate::registry
//! [`detect`]: crate::detect
//! [`templates`]: crate::templates
//! [`render`]: crate::render
//! [`locate`]: crate::locate
//! [`engine`]: crate::engine

pub mod cli;
pub mod config;
pub mod detect;
pub mod diff;
pub mod engine;
pub mod locate;
pub mod logging;
pub mod output;
pub mod registry;
pub mod render;
pub mod report;
pub mod templates;
