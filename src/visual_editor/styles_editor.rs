use dioxus::prelude::*;
use std::collections::{BTreeMap, HashMap};

use super::component::{set_style, BUILDER};
use crate::canvas::NodeContent;
use crate::registry::InstanceId;
use crate::styles::{PropertyKind, StyleProperty, StyleSector};

// Buffer of unsaved style edits per instance (ordered)
pub static STYLE_EDIT_BUFFER: GlobalSignal<HashMap<InstanceId, Vec<(String, String)>>> = Signal::global(HashMap::new);

fn buffered(instance_id: InstanceId, property: &str) -> String {
    STYLE_EDIT_BUFFER
        .read()
        .get(&instance_id)
        .and_then(|pairs| pairs.iter().rev().find(|(k, _)| k == property))
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

fn set_buffered(instance_id: InstanceId, property: &str, value: String) {
    let mut buf = STYLE_EDIT_BUFFER.write();
    let pairs = buf.entry(instance_id).or_default();
    match pairs.iter_mut().find(|(k, _)| k == property) {
        Some(pair) => pair.1 = value,
        None => pairs.push((property.to_string(), value)),
    }
}

#[derive(Clone, Copy)]
enum RowField {
    Key,
    Value,
}

/// Edits one custom row. A row index left over from an earlier render is
/// ignored.
fn edit_row(rows: &mut [(String, String)], index: usize, field: RowField, text: String) -> bool {
    let Some(row) = rows.get_mut(index) else {
        return false;
    };
    match field {
        RowField::Key => row.0 = text,
        RowField::Value => row.1 = text,
    }
    true
}

#[component]
pub fn StyleManager(container_id: String, sectors: Vec<StyleSector>) -> Element {
    let builder = BUILDER.read();
    let instance = builder.as_ref().and_then(|shell| {
        let node = shell.canvas().node(shell.selected()?)?;
        match node.content {
            NodeContent::Component(id) => shell.registry().instance(id),
            NodeContent::Markup(_) => None,
        }
    });

    let Some(instance) = instance else {
        return rsx! {
            div { id: "{container_id}", style: "padding: 12px; font-size: 12px; color: #666;",
                "Select a component to style it"
            }
        };
    };
    let instance_id = instance.id;

    // Initialize buffer for this instance if not present
    {
        let mut buf = STYLE_EDIT_BUFFER.write();
        if !buf.contains_key(&instance_id) {
            buf.insert(instance_id, instance.styles.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>());
        }
    }

    // Pairs no sector covers are edited as free key/value rows
    let sector_props: Vec<String> = sectors
        .iter()
        .flat_map(|s| s.resolved_properties())
        .flat_map(|p| p.leaf_ids().into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect();
    let custom: Vec<(usize, String, String)> = {
        let buf = STYLE_EDIT_BUFFER.read();
        buf.get(&instance_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter(|(_, (k, _))| !sector_props.contains(k))
            .map(|(i, (k, v))| (i, k, v))
            .collect()
    };

    rsx! {
        div {
            id: "{container_id}",
            class: "styles-editor",
            style: "border-top: 1px solid #ddd; padding: 12px;",
            h4 { style: "margin: 0 0 8px 0; font-size: 14px;", "Style Manager" }

            for sector in sectors {
                SectorView { instance_id, sector }
            }

            h5 { style: "margin: 12px 0 4px 0; font-size: 12px;", "Custom" }
            for (i, key, value) in custom {
                div {
                    input {
                        value: "{key}",
                        oninput: move |e| {
                            let mut buf = STYLE_EDIT_BUFFER.write();
                            if let Some(vec) = buf.get_mut(&instance_id) {
                                edit_row(vec, i, RowField::Key, e.value());
                            }
                        }
                    }
                    input {
                        value: "{value}",
                        oninput: move |e| {
                            let mut buf = STYLE_EDIT_BUFFER.write();
                            if let Some(vec) = buf.get_mut(&instance_id) {
                                edit_row(vec, i, RowField::Value, e.value());
                            }
                        }
                    }
                    button {
                        onclick: move |_| {
                            let mut buf = STYLE_EDIT_BUFFER.write();
                            if let Some(vec) = buf.get_mut(&instance_id) {
                                if i < vec.len() { vec.remove(i); }
                            }
                        },
                        "X"
                    }
                }
            }

            div { style: "margin-top: 8px; display:flex; gap:8px;",
                button {
                    onclick: move |_| {
                        let mut buf = STYLE_EDIT_BUFFER.write();
                        let vec = buf.entry(instance_id).or_default();
                        let mut new_key = "new-property".to_string();
                        let mut counter = 1;
                        while vec.iter().any(|(k, _)| k == &new_key) {
                            new_key = format!("new-property-{}", counter);
                            counter += 1;
                        }
                        vec.push((new_key, "".to_string()));
                    },
                    "Add style"
                }

                button {
                    onclick: move |_| save_styles(instance_id),
                    "Save"
                }

                button {
                    onclick: move |_| {
                        // Cancel: reset local edits from current instance styles
                        let reset = BUILDER.read().as_ref().and_then(|shell| {
                            shell.registry().instance(instance_id).map(|instance| {
                                instance.styles.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>()
                            })
                        });
                        if let Some(reset) = reset {
                            STYLE_EDIT_BUFFER.write().insert(instance_id, reset);
                        }
                    },
                    "Cancel"
                }
            }
        }
    }
}

/// Writes the buffered pairs to the instance (duplicates keep last) and
/// drops properties that were removed from the buffer.
fn save_styles(instance_id: InstanceId) {
    let pairs = STYLE_EDIT_BUFFER.read().get(&instance_id).cloned().unwrap_or_default();
    let mut map = BTreeMap::new();
    for (k, v) in pairs {
        if !k.is_empty() {
            map.insert(k, v);
        }
    }

    let current: Vec<String> = BUILDER
        .read()
        .as_ref()
        .and_then(|shell| shell.registry().instance(instance_id))
        .map(|instance| instance.styles.keys().cloned().collect())
        .unwrap_or_default();
    for property in current.iter().filter(|k| !map.contains_key(*k)) {
        set_style(instance_id, property, String::new());
    }
    for (property, value) in map {
        set_style(instance_id, &property, value);
    }

    // remove buffer entry so next open loads fresh
    STYLE_EDIT_BUFFER.write().remove(&instance_id);
}

#[component]
fn SectorView(instance_id: InstanceId, sector: StyleSector) -> Element {
    let mut open = use_signal(|| sector.open);
    let marker = if open() { "-" } else { "+" };
    let properties = sector.resolved_properties();

    rsx! {
        div { class: "style-sector", style: "margin-bottom: 6px;",
            div {
                style: "font-weight: bold; font-size: 12px; cursor: pointer;",
                onclick: move |_| open.toggle(),
                "{marker} {sector.name}"
            }
            if open() {
                for property in properties {
                    PropertyEditor { instance_id, property }
                }
            }
        }
    }
}

#[component]
fn PropertyEditor(instance_id: InstanceId, property: StyleProperty) -> Element {
    let id = property.id.clone();
    let current = buffered(instance_id, &id);
    let placeholder = property.default.clone().unwrap_or_default();

    let editor = match property.kind {
        PropertyKind::Radio { list } | PropertyKind::Select { list } => rsx! {
            select {
                value: "{current}",
                onchange: move |e| set_buffered(instance_id, &id, e.value()),
                option { value: "", "{placeholder}" }
                for choice in list {
                    option {
                        value: "{choice.value}",
                        selected: choice.value == current,
                        {choice.label()}
                    }
                }
            }
        },
        PropertyKind::Slider { min, max, step } => rsx! {
            input {
                r#type: "range",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{current}",
                oninput: move |e| set_buffered(instance_id, &id, e.value()),
            }
        },
        PropertyKind::Color => rsx! {
            input {
                r#type: "color",
                value: "{current}",
                oninput: move |e| set_buffered(instance_id, &id, e.value()),
            }
        },
        PropertyKind::Composite { properties } => rsx! {
            div { style: "padding-left: 8px;",
                for part in properties {
                    PropertyEditor { instance_id, property: part }
                }
            }
        },
        PropertyKind::Integer { units } => {
            let hint = format!("{} ({})", placeholder, units.join(", "));
            rsx! {
                input {
                    r#type: "text",
                    placeholder: "{hint}",
                    value: "{current}",
                    oninput: move |e| set_buffered(instance_id, &id, e.value()),
                }
            }
        }
        PropertyKind::Stack | PropertyKind::Text => rsx! {
            input {
                r#type: "text",
                placeholder: "{placeholder}",
                value: "{current}",
                oninput: move |e| set_buffered(instance_id, &id, e.value()),
            }
        },
    };

    rsx! {
        label { style: "display:flex;justify-content:space-between;gap:8px;font-size:12px;margin:2px 0;",
            "{property.id}"
            {editor}
        }
    }
}
