//! Boundary with the editor host that owns the canvas frame and storage.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalog::BlockCatalog;
use crate::config::{StorageConfig, StorageKind};
use crate::error::{BuilderError, BuilderResult};

/// Everything the host receives when the page shell initializes it.
#[derive(Debug)]
pub struct HostInit<'a> {
    pub container_id: &'a str,
    pub blocks_append_to: &'a str,
    pub blocks: &'a BlockCatalog,
    pub kinds: Vec<&'a str>,
    pub canvas_styles: &'a [String],
    pub storage: &'a StorageConfig,
}

pub trait EditorHost {
    fn init(&mut self, init: &HostInit<'_>) -> BuilderResult<()>;

    /// The stored project for the configured key, if any.
    fn load_project(&mut self, storage: &StorageConfig) -> BuilderResult<Option<String>>;

    fn store_project(&mut self, storage: &StorageConfig, data: &str) -> BuilderResult<()>;

    fn destroy(&mut self);
}

/// Host backed by the browser window: local storage for projects, the
/// collected sheets for the canvas frame.
#[derive(Debug, Default)]
pub struct BrowserHost {
    pub canvas_styles: Vec<String>,
    pub container_id: Option<String>,
}

impl BrowserHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn local_storage() -> BuilderResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| BuilderError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(BuilderError::storage)?
            .ok_or_else(|| BuilderError::Storage("local storage unavailable".to_string()))
    }
}

impl EditorHost for BrowserHost {
    fn init(&mut self, init: &HostInit<'_>) -> BuilderResult<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| BuilderError::Dom("no document".to_string()))?;
        if document.get_element_by_id(init.container_id).is_none() {
            return Err(BuilderError::ContainerMissing(init.container_id.to_string()));
        }
        self.container_id = Some(init.container_id.to_string());
        self.canvas_styles = init.canvas_styles.to_vec();
        info!(
            container = init.container_id,
            blocks = init.blocks.len(),
            kinds = init.kinds.len(),
            "editor host ready"
        );
        Ok(())
    }

    fn load_project(&mut self, storage: &StorageConfig) -> BuilderResult<Option<String>> {
        if storage.kind == StorageKind::None {
            return Ok(None);
        }
        Self::local_storage()?
            .get_item(&storage.key)
            .map_err(BuilderError::storage)
    }

    fn store_project(&mut self, storage: &StorageConfig, data: &str) -> BuilderResult<()> {
        if storage.kind == StorageKind::None {
            return Ok(());
        }
        Self::local_storage()?
            .set_item(&storage.key, data)
            .map_err(BuilderError::storage)
    }

    fn destroy(&mut self) {
        debug!(container = ?self.container_id, "editor host destroyed");
        self.container_id = None;
        self.canvas_styles.clear();
    }
}

/// Host keeping projects in memory. Used where no browser is around.
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub projects: HashMap<String, String>,
    pub canvas_styles: Vec<String>,
    pub kinds: Vec<String>,
    pub inits: usize,
    pub destroyed: bool,
}

impl EditorHost for MemoryHost {
    fn init(&mut self, init: &HostInit<'_>) -> BuilderResult<()> {
        self.inits += 1;
        self.canvas_styles = init.canvas_styles.to_vec();
        self.kinds = init.kinds.iter().map(|k| k.to_string()).collect();
        Ok(())
    }

    fn load_project(&mut self, storage: &StorageConfig) -> BuilderResult<Option<String>> {
        Ok(match storage.kind {
            StorageKind::None => None,
            StorageKind::Local => self.projects.get(&storage.key).cloned(),
        })
    }

    fn store_project(&mut self, storage: &StorageConfig, data: &str) -> BuilderResult<()> {
        if storage.kind == StorageKind::Local {
            self.projects.insert(storage.key.clone(), data.to_string());
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
