//! LMP Core - placeholder substitution and prompt execution.
//!
//! This crate turns parsed prompt templates into request text. It expands
//! placeholders such as `$input`, `$select` and `$register_a` by asking a
//! [`ValueSource`](tools::source::ValueSource), loads template files from
//! the configured directories, and keeps the per-session state needed to
//! repeat the last prompt.
//!
//! # Architecture
//!
//! - [`error`]: Error types and result type alias
//! - [`config`]: Configuration and `.lmp/config.toml` overrides
//! - [`substitute`]: The placeholder substitution engine
//! - [`loader`]: Template file discovery, loading and export
//! - [`session`]: Prompt snapshot, dot prompt and request preparation
//! - [`tools`]: File system and value source adapters
//!
//! # Example
//!
//! ```
//! use lmp_core::substitute;
//! use lmp_core::tools::source_mock::ScriptedSource;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let source = ScriptedSource::answering("borrowing");
//! source.set_filetype("rust");
//!
//! let text = substitute("Explain $input in $filetype", &source).await.unwrap();
//! assert_eq!(text, "Explain borrowing in rust");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod session;
pub mod substitute;
pub mod tools;

// Re-export core types for convenience
pub use config::LmpConfig;
pub use error::{LmpError, Result, SourceError, SubstituteError};
pub use loader::{LoadFailure, LoadReport, export_templates, load_file, load_templates};
pub use session::{PreparedRequest, Session};
pub use substitute::{SubstituteOptions, Substitution, substitute, substitute_with};
pub use tools::source::{SelectSource, ValueSource};
