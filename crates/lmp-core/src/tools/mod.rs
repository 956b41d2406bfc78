//! Adapters for the outside world.
//!
//! [`fs::FsAdapter`] abstracts template file access and
//! [`source::ValueSource`] abstracts the editor state and user interaction
//! that placeholder substitution needs. Each trait has a real implementation
//! (`*_impl`) and an in-memory one (`*_mock`) for tests and embedding.

pub mod fs;
pub mod fs_impl;
pub mod fs_mock;
pub mod source;
pub mod source_impl;
pub mod source_mock;
