//! Page shell: mounts the editor once, routes host callbacks to the
//! registry and canvas, and tears everything down on leave.

use tracing::{debug, info, warn};

use crate::canvas::{Canvas, NodeContent, NodeId};
use crate::catalog::{BlockCatalog, Resolved};
use crate::config::BuilderConfig;
use crate::error::BuilderResult;
use crate::host::{EditorHost, HostInit};
use crate::project::ProjectSnapshot;
use crate::registry::{builtin, InstanceId, Registry, RenderTarget};
use crate::styles::{self, StyleSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellState {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

pub struct PageShell<H: EditorHost> {
    config: BuilderConfig,
    state: ShellState,
    host: H,
    registry: Registry,
    catalog: BlockCatalog,
    canvas: Canvas,
    canvas_styles: Vec<String>,
    selected: Option<NodeId>,
}

impl<H: EditorHost> PageShell<H> {
    pub fn new(config: BuilderConfig, host: H) -> Self {
        Self {
            config,
            state: ShellState::Uninitialized,
            host,
            registry: Registry::new(),
            catalog: BlockCatalog::new(),
            canvas: Canvas::new(),
            canvas_styles: Vec::new(),
            selected: None,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ShellState::Ready
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_styles(&self) -> &[String] {
        &self.canvas_styles
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Initializes the editor the first time the container exists.
    /// Returns `Ok(false)` when there was nothing to do.
    pub fn mount(&mut self, container_present: bool, document: &dyn StyleSource) -> BuilderResult<bool> {
        if self.state != ShellState::Uninitialized {
            debug!(state = ?self.state, "mount ignored");
            return Ok(false);
        }
        if !container_present {
            return Ok(false);
        }
        self.state = ShellState::Initializing;

        // Canvas frame styling is fixed once the host is up.
        if self.config.canvas.inherit_document_styles {
            self.canvas_styles = styles::collect(document);
        }
        self.canvas_styles.extend(self.config.canvas.styles.iter().cloned());

        for kind in &self.config.components {
            if let Err(err) = self.registry.register(builtin(*kind)) {
                warn!(%err, "component kind not registered");
            }
        }
        for block in &self.config.blocks {
            if BlockCatalog::insertable(block, &self.registry) {
                self.catalog.add(block.clone());
            }
        }

        let init = HostInit {
            container_id: &self.config.container_id,
            blocks_append_to: &self.config.blocks_append_to,
            blocks: &self.catalog,
            kinds: self.registry.kinds().collect(),
            canvas_styles: &self.canvas_styles,
            storage: &self.config.storage,
        };
        if let Err(err) = self.host.init(&init) {
            warn!(%err, "editor host failed to start");
            self.registry = Registry::new();
            self.catalog = BlockCatalog::new();
            self.canvas_styles.clear();
            self.state = ShellState::Uninitialized;
            return Err(err);
        }

        self.load();
        self.state = ShellState::Ready;
        info!(
            kinds = self.registry.kinds().count(),
            blocks = self.catalog.len(),
            styles = self.canvas_styles.len(),
            "builder ready"
        );
        Ok(true)
    }

    fn load(&mut self) {
        let stored = match self.host.load_project(&self.config.storage) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(%err, "stored project unreadable");
                return;
            }
        };
        let Some(json) = stored else {
            return;
        };
        let restored = ProjectSnapshot::from_json(&json)
            .and_then(|snapshot| snapshot.restore(&mut self.canvas, &mut self.registry));
        match restored {
            Ok(count) => debug!(count, "restored stored project"),
            Err(err) => {
                warn!(%err, "stored project discarded");
                self.registry.clear_instances();
                self.canvas.clear();
            }
        }
    }

    /// Releases the host and every live render target. Only the first call
    /// after mount does anything.
    pub fn destroy(&mut self) -> bool {
        if !matches!(self.state, ShellState::Initializing | ShellState::Ready) {
            return false;
        }
        let released = self.registry.dispose_all();
        self.registry.clear_instances();
        self.canvas.clear();
        self.selected = None;
        self.host.destroy();
        self.state = ShellState::Destroyed;
        info!(released, "builder destroyed");
        true
    }

    fn accepting(&self, callback: &str) -> bool {
        if self.state != ShellState::Ready {
            debug!(state = ?self.state, callback, "callback ignored");
            return false;
        }
        true
    }

    /// Drops a catalog block onto the canvas, at the root or into a
    /// droppable node.
    pub fn insert_block(&mut self, block_id: &str, parent: Option<NodeId>) -> BuilderResult<Option<NodeId>> {
        if !self.accepting("insert_block") {
            return Ok(None);
        }
        let select = self.catalog.get(block_id).is_some_and(|b| b.select);
        let node = match self.catalog.resolve(block_id, &mut self.registry)? {
            Resolved::Markup(markup) => self.canvas.insert(NodeContent::Markup(markup), false, parent)?,
            Resolved::Instance { id, inner } => {
                let droppable = self
                    .registry
                    .instance(id)
                    .and_then(|i| self.registry.definition(&i.kind))
                    .is_some_and(|def| def.droppable);
                let node = match self.canvas.insert(NodeContent::Component(id), droppable, parent) {
                    Ok(node) => node,
                    Err(err) => {
                        self.registry.remove(id);
                        return Err(err);
                    }
                };
                if let Some(markup) = inner {
                    if let Err(err) = self.canvas.insert(NodeContent::Markup(markup), false, Some(node)) {
                        warn!(block = block_id, %err, "block markup cannot nest in its component");
                        self.canvas.remove(node)?;
                        self.registry.remove(id);
                        return Err(err);
                    }
                }
                self.registry.render(id);
                node
            }
        };
        if select {
            self.selected = Some(node);
        }
        self.autosave();
        Ok(Some(node))
    }

    /// Property edit from the trait panel.
    pub fn edit_trait(&mut self, instance: InstanceId, name: &str, value: String) -> bool {
        if !self.accepting("edit_trait") {
            return false;
        }
        let rendered = self.registry.set_property(instance, name, value);
        self.autosave();
        rendered
    }

    pub fn set_style(&mut self, instance: InstanceId, property: &str, value: String) -> bool {
        if !self.accepting("set_style") {
            return false;
        }
        let changed = self.registry.set_style(instance, property, value);
        if changed {
            self.autosave();
        }
        changed
    }

    /// Removes a node and disposes every component instance below it.
    pub fn remove_node(&mut self, node: NodeId) -> BuilderResult<usize> {
        if !self.accepting("remove_node") {
            return Ok(0);
        }
        let removed = self.canvas.remove(node)?;
        let mut disposed = 0;
        for content in removed {
            if let NodeContent::Component(id) = content {
                self.registry.remove(id);
                disposed += 1;
            }
        }
        if self.selected.is_some_and(|s| self.canvas.node(s).is_none()) {
            self.selected = None;
        }
        self.autosave();
        Ok(disposed)
    }

    /// Render request from the host.
    pub fn render(&mut self, instance: InstanceId) -> Option<&RenderTarget> {
        if !self.accepting("render") {
            return None;
        }
        self.registry.render(instance)
    }

    /// Dispose request from the host.
    pub fn dispose(&mut self, instance: InstanceId) -> bool {
        if !self.accepting("dispose") {
            return false;
        }
        self.registry.dispose(instance)
    }

    pub fn select(&mut self, node: Option<NodeId>) {
        if self.accepting("select") {
            self.selected = node.filter(|n| self.canvas.node(*n).is_some());
        }
    }

    /// Writes the current document under the configured storage key.
    pub fn save(&mut self) -> BuilderResult<()> {
        let json = ProjectSnapshot::capture(&self.canvas, &self.registry).to_json()?;
        self.host.store_project(&self.config.storage, &json)
    }

    fn autosave(&mut self) {
        if let Err(err) = self.save() {
            warn!(%err, "autosave failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BlockCatalogEntry, ComponentRef};
    use crate::config::{Preset, StorageKind};
    use crate::host::MemoryHost;
    use crate::styles::StyleSheetRef;
    use pretty_assertions::assert_eq;

    fn document() -> Vec<StyleSheetRef> {
        vec![
            StyleSheetRef::external("/grapes.min.css"),
            StyleSheetRef::inline(),
            StyleSheetRef::external("/globals.css"),
        ]
    }

    fn ready(preset: Preset) -> PageShell<MemoryHost> {
        let mut shell = PageShell::new(BuilderConfig::preset(preset), MemoryHost::default());
        assert!(shell.mount(true, &document()).unwrap());
        shell
    }

    fn instance_of(shell: &PageShell<MemoryHost>, node: NodeId) -> InstanceId {
        match shell.canvas().node(node).unwrap().content {
            NodeContent::Component(id) => id,
            NodeContent::Markup(_) => panic!("node {node:?} is markup"),
        }
    }

    #[test]
    fn mount_waits_for_container_and_runs_once() {
        let mut shell = PageShell::new(BuilderConfig::preset(Preset::Widgets), MemoryHost::default());
        assert!(!shell.mount(false, &document()).unwrap());
        assert_eq!(shell.state(), ShellState::Uninitialized);

        assert!(shell.mount(true, &document()).unwrap());
        assert!(!shell.mount(true, &document()).unwrap());
        assert_eq!(shell.state(), ShellState::Ready);
        assert_eq!(shell.host().inits, 1);
        assert_eq!(
            shell.host().kinds,
            vec!["image", "react-button", "react-alert", "react-badge"]
        );
    }

    #[test]
    fn canvas_styles_follow_config() {
        let widgets = ready(Preset::Widgets);
        assert_eq!(widgets.canvas_styles(), &["/grapes.min.css", "/globals.css"]);
        assert_eq!(widgets.host().canvas_styles, widgets.canvas_styles());

        let basic = ready(Preset::Basic);
        assert!(basic.canvas_styles().is_empty());
    }

    #[test]
    fn destroy_releases_every_target() {
        let mut shell = ready(Preset::Widgets);
        shell.insert_block("react-button-block", None).unwrap();
        shell.insert_block("react-badge-block", None).unwrap();
        shell.insert_block("text", None).unwrap();
        assert_eq!(shell.registry().live_targets(), 2);

        assert!(shell.destroy());
        assert_eq!(shell.state(), ShellState::Destroyed);
        assert_eq!(shell.registry().live_targets(), 0);
        assert!(shell.canvas().is_empty());
        assert!(shell.host().destroyed);
        assert!(!shell.destroy());
    }

    #[test]
    fn callbacks_after_teardown_are_no_ops() {
        let mut shell = ready(Preset::Widgets);
        let node = shell.insert_block("react-badge-block", None).unwrap().unwrap();
        let id = instance_of(&shell, node);
        shell.destroy();

        assert!(!shell.edit_trait(id, "badgeText", "late".into()));
        assert!(shell.render(id).is_none());
        assert!(!shell.dispose(id));
        assert_eq!(shell.insert_block("react-badge-block", None).unwrap(), None);
        assert_eq!(shell.remove_node(node).unwrap(), 0);
        assert_eq!(shell.registry().live_targets(), 0);
        assert!(!shell.mount(true, &document()).unwrap());
    }

    #[test]
    fn trait_edit_rerenders_and_autosaves() {
        let mut shell = ready(Preset::Widgets);
        let node = shell.insert_block("react-badge-block", None).unwrap().unwrap();
        let id = instance_of(&shell, node);

        assert!(shell.edit_trait(id, "badgeText", "Shipped".into()));
        assert!(!shell.edit_trait(id, "unrelatedField", "x".into()));
        assert_eq!(shell.registry().target(id).unwrap().renders, 2);

        let saved = shell.host().projects.get("gjs-nextjs-project").unwrap();
        assert!(saved.contains("Shipped"));
    }

    #[test]
    fn section_block_nests_markup_inside_container() {
        let mut shell = ready(Preset::Studio);
        let section = shell.insert_block("section", None).unwrap().unwrap();
        let children = shell.canvas().node(section).unwrap().children.clone();
        assert_eq!(children.len(), 1);

        let button = shell.insert_block("react-button-block", Some(section)).unwrap().unwrap();
        assert_eq!(shell.canvas().node(button).unwrap().parent, Some(section));
        assert!(shell.insert_block("text", Some(button)).is_err());
        assert_eq!(shell.registry().instances().count(), 2);

        let section_id = instance_of(&shell, section);
        assert_eq!(shell.registry().instance(section_id).unwrap().styles["padding"], "2rem");

        assert_eq!(shell.remove_node(section).unwrap(), 2);
        assert_eq!(shell.registry().live_targets(), 0);
        assert!(shell.canvas().is_empty());
    }

    #[test]
    fn image_block_selects_on_insert() {
        let mut shell = ready(Preset::Basic);
        let node = shell.insert_block("image", None).unwrap();
        assert_eq!(shell.selected(), node);
        shell.remove_node(node.unwrap()).unwrap();
        assert_eq!(shell.selected(), None);
    }

    #[test]
    fn stored_project_is_restored_on_mount() {
        let mut first = ready(Preset::Widgets);
        let node = first.insert_block("react-alert-block", None).unwrap().unwrap();
        let id = instance_of(&first, node);
        first.edit_trait(id, "alertTitle", "Saved".into());
        let projects = first.host().projects.clone();
        first.destroy();

        let host = MemoryHost {
            projects,
            ..MemoryHost::default()
        };
        let mut second = PageShell::new(BuilderConfig::preset(Preset::Widgets), host);
        second.mount(true, &document()).unwrap();

        let alert = second.registry().instances().next().unwrap();
        assert_eq!(alert.value("alertTitle"), Some("Saved"));
        assert_eq!(second.registry().live_targets(), 1);
    }

    #[test]
    fn disabled_storage_writes_nothing() {
        let mut config = BuilderConfig::preset(Preset::Button);
        config.storage.kind = StorageKind::None;
        let mut shell = PageShell::new(config, MemoryHost::default());
        shell.mount(true, &document()).unwrap();
        shell.insert_block("react-button-block", None).unwrap();
        assert!(shell.host().projects.is_empty());
    }

    #[test]
    fn markup_inside_a_non_droppable_block_rolls_back() {
        let mut config = BuilderConfig::preset(Preset::Button);
        let mut button = ComponentRef::new("react-button");
        button.components = Some("<b>x</b>".into());
        config.blocks.push(BlockCatalogEntry::component("nested-button", "Nested", button));
        let mut shell = PageShell::new(config, MemoryHost::default());
        shell.mount(true, &document()).unwrap();

        assert!(shell.insert_block("nested-button", None).is_err());
        assert!(shell.canvas().is_empty());
        assert_eq!(shell.registry().instances().count(), 0);
        assert_eq!(shell.registry().live_targets(), 0);
    }

    #[test]
    fn misplaced_child_in_stored_project_is_skipped() {
        let stored = r#"{"nodes":[{"type":"markup","html":"<p/>","children":[{"type":"component","kind":"react-button","values":{}}]}]}"#;
        let mut host = MemoryHost::default();
        host.projects.insert("gjs-nextjs-project".to_string(), stored.to_string());
        let mut shell = PageShell::new(BuilderConfig::preset(Preset::Button), host);
        shell.mount(true, &document()).unwrap();

        assert_eq!(shell.canvas().len(), 1);
        assert_eq!(shell.registry().instances().count(), 0);
        assert_eq!(shell.registry().live_targets(), 0);
    }

    #[test]
    fn unknown_block_is_an_error_not_a_panic() {
        let mut shell = ready(Preset::Basic);
        assert!(shell.insert_block("react-button-block", None).is_err());
        assert!(shell.canvas().is_empty());
    }
}
