//! Error types for the builder.

use thiserror::Error;

/// Errors raised by the registry, catalog, canvas and page shell.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A component kind was registered without a render strategy.
    #[error("component kind `{0}` has no renderer")]
    MissingRenderer(String),

    /// Two traits of one component kind share a name.
    #[error("component kind `{kind}` declares trait `{name}` twice")]
    DuplicateTrait { kind: String, name: String },

    /// No definition is registered for the kind.
    #[error("unknown component kind `{0}`")]
    UnknownKind(String),

    /// No catalog entry carries the id.
    #[error("unknown block `{0}`")]
    UnknownBlock(String),

    /// The canvas holds no node with the id.
    #[error("unknown canvas node {0}")]
    UnknownNode(u64),

    /// The target node does not accept children.
    #[error("canvas node {0} does not accept children")]
    NotDroppable(u64),

    /// The editor container element was not found.
    #[error("editor container `{0}` is missing")]
    ContainerMissing(String),

    /// A browser document call failed.
    #[error("document error: {0}")]
    Dom(String),

    /// The project store rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Snapshot or configuration JSON is malformed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BuilderError {
    pub(crate) fn dom(err: wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{err:?}"))
    }

    pub(crate) fn storage(err: wasm_bindgen::JsValue) -> Self {
        Self::Storage(format!("{err:?}"))
    }
}

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;
