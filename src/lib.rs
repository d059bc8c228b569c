//! Visual page builder with custom widget blocks.
//!
//! The builder is driven by a [`shell::PageShell`]: it mounts the editor
//! host once, registers the widget kinds of its [`config::BuilderConfig`],
//! fills the block palette and routes every host callback (trait edits,
//! block insertion, render and dispose requests) to the
//! [`registry::Registry`]. Each live widget instance owns exactly one
//! render target, released when the instance leaves the canvas or the
//! page is torn down.

pub mod canvas;
pub mod catalog;
pub mod config;
mod error;
pub mod host;
pub mod project;
pub mod registry;
pub mod shell;
pub mod styles;
pub mod visual_editor;
pub mod widgets;

pub use error::{BuilderError, BuilderResult};
