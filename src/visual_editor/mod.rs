mod component;
mod styles_editor;

pub use component::{BuilderPage, EditorMode, BUILDER, EDITOR_MODE};
pub use styles_editor::STYLE_EDIT_BUFFER;
