//! Prompt template parsing for LMP.
//!
//! This crate turns template files into [`Prompt`] records and back. It
//! performs no I/O: callers hand in text and receive records, or a
//! [`ParseError`] naming the offending line.
//!
//! # Examples
//!
//! ```
//! use lmp_pm::{parse_templates, MergePolicy, PromptCollection};
//!
//! let text = "\
//! ---
//! name: Explain
//! model: llama3
//! temperature: 0.2
//! ---
//! Explain this $filetype code:
//! $register_0
//! ";
//!
//! let prompts = PromptCollection::from(parse_templates(text)?);
//! let explain = prompts.get("Explain").unwrap();
//! assert_eq!(explain.model.as_deref(), Some("llama3"));
//! assert_eq!(explain.model_options["temperature"], "0.2");
//! # Ok::<(), lmp_pm::ParseError>(())
//! ```

pub mod collection;
pub mod error;
pub mod escape;
pub mod parser;
pub mod prompt;
pub mod writer;

// Re-export public types for convenience
pub use collection::{MergePolicy, PromptCollection};
pub use error::{ParseError, ParseErrorKind, Result};
pub use escape::{escape, unescape};
pub use parser::{ParseOptions, Parser, parse_templates};
pub use prompt::{DOT_PROMPT_NAME, ModelOptions, PasteMode, Prompt};
pub use writer::{write_template, write_templates};
