use dioxus::prelude::*;
use tracing::warn;

use super::styles_editor::StyleManager;
use crate::canvas::{NodeContent, NodeId};
use crate::config::BuilderConfig;
use crate::host::BrowserHost;
use crate::registry::{InstanceId, Trait, TraitKind};
use crate::shell::{PageShell, ShellState};
use crate::styles::{self, DocumentStyles};
use crate::widgets::Widget;

#[derive(Clone, Debug, PartialEq)]
pub enum EditorMode {
    Editor,
    Preview,
}

pub static BUILDER: GlobalSignal<Option<PageShell<BrowserHost>>> = Signal::global(|| None);
pub static EDITOR_MODE: GlobalSignal<EditorMode> = Signal::global(|| EditorMode::Editor);

#[component]
pub fn BuilderPage(config: BuilderConfig) -> Element {
    use_hook(|| {
        *BUILDER.write() = Some(PageShell::new(config.clone(), BrowserHost::new()));
    });
    use_drop(|| {
        if let Some(mut shell) = BUILDER.write().take() {
            shell.destroy();
        }
    });

    let mode = EDITOR_MODE.read().clone();
    let editor_bg = if mode == EditorMode::Editor { "var(--color-primary)" } else { "var(--color-secondary)" };
    let preview_bg = if mode == EditorMode::Preview { "var(--color-primary)" } else { "var(--color-secondary)" };
    let layers = config
        .layer_manager
        .clone()
        .map(|container_id| rsx! { LayersPanel { container_id } });
    let style_manager = config.style_manager.clone().map(|manager| {
        rsx! { StyleManager { container_id: manager.append_to, sectors: manager.sectors } }
    });

    rsx! {
        div {
            class: "visual-editor",
            style: "display: flex; height: 100vh; font-family: system-ui;",

            // Left sidebar - Blocks
            div {
                class: "toolbox",
                style: "width: 20%; background: #f3f4f6; border-right: 1px solid #ddd; padding: 16px;",
                h2 { style: "margin: 0 0 16px 0; font-size: 18px;", "Blocks" }

                div {
                    class: "mode-toggle",
                    style: "margin-bottom: 16px; display: flex; gap: 8px;",
                    button {
                        onclick: move |_| set_mode(EditorMode::Editor),
                        style: "background: {editor_bg};",
                        "Editor"
                    }
                    button {
                        onclick: move |_| set_mode(EditorMode::Preview),
                        style: "background: {preview_bg};",
                        "Preview"
                    }
                }

                if mode == EditorMode::Editor {
                    BlockPalette { append_to: config.blocks_append_to.clone() }
                }
            }

            // Center - Canvas
            div {
                id: "{config.container_id}",
                class: "canvas-wrapper",
                style: "flex: 1; background: white; overflow: auto; position: relative; padding: 16px;",
                onmounted: move |_| mount_builder(),
                onclick: move |_| select_node(None),
                Canvas {}
            }

            // Right sidebar - Traits, layers and styles
            if mode == EditorMode::Editor {
                div {
                    class: "properties",
                    style: "width: 25%; background: #f3f4f6; border-left: 1px solid #ddd; overflow-y: auto;",
                    PropertiesPanel {}
                    {layers}
                    {style_manager}
                }
            }
        }
    }
}

#[component]
fn BlockPalette(append_to: String) -> Element {
    let builder = BUILDER.read();
    let Some(shell) = builder.as_ref() else {
        return rsx! { div { id: "{append_to}" } };
    };

    let groups: Vec<(String, Vec<(String, String)>)> = shell
        .catalog()
        .list()
        .into_iter()
        .map(|group| {
            let blocks = group
                .entries
                .iter()
                .map(|entry| (entry.id.clone(), entry.label.clone()))
                .collect();
            (group.category.unwrap_or("Basic").to_string(), blocks)
        })
        .collect();

    rsx! {
        div {
            id: "{append_to}",
            class: "component-buttons",
            style: "display: flex; flex-direction: column; gap: 8px;",
            for (category, blocks) in groups {
                h3 { style: "margin: 12px 0 4px 0; font-size: 13px; color: #666;", "{category}" }
                for (block_id, label) in blocks {
                    button {
                        onclick: move |_| insert_block(&block_id),
                        "{label}"
                    }
                }
            }
        }
    }
}

#[component]
fn Canvas() -> Element {
    let builder = BUILDER.read();
    let Some(shell) = builder.as_ref() else {
        return rsx! {};
    };
    let roots = shell.canvas().roots().to_vec();
    let sheets = shell.canvas_styles().to_vec();
    let empty = roots.is_empty();

    rsx! {
        div {
            class: "canvas",
            style: "width: 100%; min-height: 100%; position: relative;",
            for href in sheets {
                link { rel: "stylesheet", href: "{href}" }
            }
            if empty && shell.state() == ShellState::Ready {
                p { style: "color: #999; text-align: center; padding: 32px;", "Click a block to add it" }
            }
            for node_id in roots {
                CanvasNodeView { node_id }
            }
        }
    }
}

#[component]
fn CanvasNodeView(node_id: NodeId) -> Element {
    let builder = BUILDER.read();
    let Some(shell) = builder.as_ref() else {
        return rsx! {};
    };
    let Some(node) = shell.canvas().node(node_id) else {
        return rsx! {};
    };

    let editing = *EDITOR_MODE.read() == EditorMode::Editor;
    let outline = match (editing, shell.selected() == Some(node_id)) {
        (false, _) => "none",
        (true, true) => "2px solid #f44336",
        (true, false) => "1px dashed #ccc",
    };
    match &node.content {
        NodeContent::Markup(markup) => rsx! {
            div {
                style: "outline: {outline};",
                onclick: move |e| {
                    e.stop_propagation();
                    select_node(Some(node_id));
                },
                dangerous_inner_html: "{markup}",
            }
        },
        NodeContent::Component(instance_id) => {
            let style = shell
                .registry()
                .instance(*instance_id)
                .map(|i| i.style_attr())
                .unwrap_or_default();
            let children = node.children.clone();
            // No target means the widget is simply not shown.
            let widget = match shell.registry().target(*instance_id) {
                Some(target) => {
                    let mount_id = target.mount_id.clone();
                    let view = target.view.clone();
                    rsx! { div { id: "{mount_id}", Widget { view } } }
                }
                None => rsx! {},
            };
            rsx! {
                div {
                    style: "{style} outline: {outline};",
                    onclick: move |e| {
                        e.stop_propagation();
                        select_node(Some(node_id));
                    },
                    {widget}
                    for child in children {
                        CanvasNodeView { node_id: child }
                    }
                }
            }
        }
    }
}

#[component]
fn PropertiesPanel() -> Element {
    let builder = BUILDER.read();
    let Some(shell) = builder.as_ref() else {
        return rsx! {};
    };

    let Some(selected_id) = shell.selected() else {
        return rsx! {
            div {
                style: "color: slate; text-align: center; padding: 32px;",
                "Select a component"
            }
        };
    };

    let Some(node) = shell.canvas().node(selected_id) else {
        return rsx! { div { "Component not found" } };
    };

    let traits = match &node.content {
        NodeContent::Markup(_) => None,
        NodeContent::Component(instance_id) => shell.registry().instance(*instance_id).map(|instance| {
            let stale = shell.registry().stale_traits(*instance_id);
            let fields: Vec<(Trait, String, bool)> = shell
                .registry()
                .definition(&instance.kind)
                .map(|def| def.traits.clone())
                .unwrap_or_default()
                .into_iter()
                .map(|field| {
                    let value = instance.value(&field.name).unwrap_or_default().to_string();
                    let is_stale = stale.contains(&field.name.as_str());
                    (field, value, is_stale)
                })
                .collect();
            (*instance_id, instance.kind.clone(), fields)
        }),
    };

    let body = match traits {
        None => rsx! {
            p { style: "font-size: 12px; color: #666; padding-inline: 12px;",
                "Plain content has no editable traits"
            }
        },
        Some((instance_id, kind, fields)) => rsx! {
            div {
                style: "display:flex;flex-direction:column;gap:8px;padding-inline:12px;",
                div { style: "font-size: 12px; color: #666;", "{kind} #{instance_id}" }
                for (field, value, stale) in fields {
                    TraitField { instance_id, field, value, stale }
                }
            }
        },
    };

    rsx! {
        div { class: "properties-panel",
            h1 { style: "color:slate;text-align:center; margin: 24px 0 12px 0; font-size: 18px;", "Traits" }

            {body}

            div { style: "margin-top: 24px; padding-inline: 12px",
                button {
                    onclick: move |_| remove_node(selected_id),
                    style: "width: 100%; padding: 8px; cursor: pointer;
                            background: #f44336; color: white; border: none; border-radius: 4px;",
                    "Delete Component"
                }
            }
        }
    }
}

#[component]
fn TraitField(instance_id: InstanceId, field: Trait, value: String, stale: bool) -> Element {
    let name = field.name.clone();
    match field.kind {
        TraitKind::Text => rsx! {
            label { style: "display:flex;flex-direction:column;font-size:12px;",
                "{field.label}"
                input {
                    r#type: "text",
                    value: "{value}",
                    oninput: move |e| edit_trait(instance_id, &name, e.value()),
                }
            }
        },
        TraitKind::Select { options } => rsx! {
            label { style: "display:flex;flex-direction:column;font-size:12px;",
                "{field.label}"
                select {
                    value: "{value}",
                    onchange: move |e| edit_trait(instance_id, &name, e.value()),
                    // Stale values stay visible until the user picks another.
                    if stale {
                        option { value: "{value}", selected: true, "{value} (unavailable)" }
                    }
                    for opt in options {
                        option {
                            value: "{opt.value}",
                            selected: opt.value == value,
                            "{opt.name}"
                        }
                    }
                }
            }
        },
    }
}

#[component]
fn LayersPanel(container_id: String) -> Element {
    let builder = BUILDER.read();
    let Some(shell) = builder.as_ref() else {
        return rsx! {};
    };
    let selected = shell.selected();
    let rows: Vec<(NodeId, usize, &str, String)> = shell
        .canvas()
        .tree()
        .into_iter()
        .map(|(depth, node)| {
            let label = match &node.content {
                NodeContent::Markup(_) => "Markup".to_string(),
                NodeContent::Component(id) => shell
                    .registry()
                    .instance(*id)
                    .map(|i| format!("{} #{}", i.kind, id))
                    .unwrap_or_else(|| "Missing".to_string()),
            };
            let weight = if selected == Some(node.id) { "bold" } else { "normal" };
            (node.id, depth * 12, weight, label)
        })
        .collect();

    rsx! {
        div { id: "{container_id}", style: "border-top: 1px solid #ddd; padding: 12px;",
            h4 { style: "margin: 0 0 8px 0; font-size: 14px;", "Layers" }
            if rows.is_empty() {
                div { style: "font-size: 12px; color: #666;", "No layers yet" }
            }
            for (node_id, indent, weight, label) in rows {
                div {
                    style: "padding: 2px 0 2px {indent}px; font-size: 12px; cursor: pointer; font-weight: {weight};",
                    onclick: move |_| select_node(Some(node_id)),
                    "{label}"
                }
            }
        }
    }
}

fn mount_builder() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        warn!("no document, builder not mounted");
        return;
    };
    let mut builder = BUILDER.write();
    let Some(shell) = builder.as_mut() else {
        return;
    };
    if shell.state() != ShellState::Uninitialized {
        return;
    }
    for href in &shell.config().head_links {
        if let Err(err) = styles::inject_stylesheet(&document, href) {
            warn!(%err, href, "head stylesheet not added");
        }
    }
    let container_present = document.get_element_by_id(&shell.config().container_id).is_some();
    if let Err(err) = shell.mount(container_present, &DocumentStyles(&document)) {
        warn!(%err, "builder failed to mount");
    }
}

fn insert_block(block_id: &str) {
    let mut builder = BUILDER.write();
    let Some(shell) = builder.as_mut() else {
        return;
    };
    // Drop into the selected node when it takes children.
    let parent = shell
        .selected()
        .filter(|&id| shell.canvas().node(id).is_some_and(|n| n.droppable));
    if let Err(err) = shell.insert_block(block_id, parent) {
        warn!(%err, block_id, "block not inserted");
    }
}

fn select_node(node: Option<NodeId>) {
    if let Some(shell) = BUILDER.write().as_mut() {
        shell.select(node);
    }
}

fn edit_trait(instance: InstanceId, name: &str, value: String) {
    if let Some(shell) = BUILDER.write().as_mut() {
        shell.edit_trait(instance, name, value);
    }
}

fn remove_node(node: NodeId) {
    if let Some(shell) = BUILDER.write().as_mut() {
        if let Err(err) = shell.remove_node(node) {
            warn!(%err, "node not removed");
        }
    }
}

pub(super) fn set_style(instance: InstanceId, property: &str, value: String) {
    if let Some(shell) = BUILDER.write().as_mut() {
        shell.set_style(instance, property, value);
    }
}

fn set_mode(mode: EditorMode) {
    *EDITOR_MODE.write() = mode;
}
