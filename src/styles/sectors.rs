//! Style manager sectors: which CSS properties the style panel offers and
//! how each one is edited.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleChoice {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl StyleChoice {
    /// Display name, falling back to the raw value for icon-only choices.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyKind {
    Radio { list: Vec<StyleChoice> },
    Select { list: Vec<StyleChoice> },
    Integer { units: Vec<String> },
    Slider { min: f64, max: f64, step: f64 },
    Composite { properties: Vec<StyleProperty> },
    Stack,
    Color,
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleProperty {
    pub id: String,
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl StyleProperty {
    fn new(id: &str, kind: PropertyKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            default: None,
        }
    }

    fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Leaf CSS properties this entry writes. Composites expand to their parts.
    pub fn leaf_ids(&self) -> Vec<&str> {
        match &self.kind {
            PropertyKind::Composite { properties } => properties.iter().flat_map(|p| p.leaf_ids()).collect(),
            _ => vec![self.id.as_str()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleSector {
    pub name: String,
    #[serde(default)]
    pub open: bool,
    /// Properties the sector offers with their stock editors.
    pub build_props: Vec<String>,
    /// Overrides for entries of `build_props`.
    pub properties: Vec<StyleProperty>,
}

impl StyleSector {
    /// Every property of the sector in `build_props` order, overrides
    /// substituted and plain text editors for the rest.
    pub fn resolved_properties(&self) -> Vec<StyleProperty> {
        self.build_props
            .iter()
            .map(|id| {
                self.properties
                    .iter()
                    .find(|p| &p.id == id)
                    .cloned()
                    .unwrap_or_else(|| StyleProperty::new(id, PropertyKind::Text))
            })
            .collect()
    }
}

fn choices(list: &[(&str, &str)]) -> Vec<StyleChoice> {
    list.iter()
        .map(|(value, name)| StyleChoice {
            value: value.to_string(),
            name: Some(name.to_string()),
            class_name: None,
        })
        .collect()
}

fn icons(list: &[(&str, &str)]) -> Vec<StyleChoice> {
    list.iter()
        .map(|(value, class)| StyleChoice {
            value: value.to_string(),
            name: None,
            class_name: Some(class.to_string()),
        })
        .collect()
}

fn units(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

fn integer(id: &str, unit_list: &[&str]) -> StyleProperty {
    StyleProperty::new(id, PropertyKind::Integer { units: units(unit_list) })
}

fn sides(prefix: &str) -> StyleProperty {
    let properties = ["top", "right", "bottom", "left"]
        .iter()
        .map(|side| integer(&format!("{prefix}-{side}"), &["px", "%", "em", "rem"]))
        .collect();
    StyleProperty::new(prefix, PropertyKind::Composite { properties })
}

fn sector(name: &str, build_props: &[&str], properties: Vec<StyleProperty>) -> StyleSector {
    StyleSector {
        name: name.to_string(),
        open: false,
        build_props: build_props.iter().map(|p| p.to_string()).collect(),
        properties,
    }
}

/// General, Dimension, Typography, Decorations and Extra sectors of the
/// studio page.
pub fn default_sectors() -> Vec<StyleSector> {
    vec![
        sector(
            "General",
            &["float", "display", "position", "top", "right", "left", "bottom"],
            vec![
                StyleProperty::new(
                    "float",
                    PropertyKind::Radio {
                        list: icons(&[
                            ("none", "fa fa-times"),
                            ("left", "fa fa-align-left"),
                            ("right", "fa fa-align-right"),
                        ]),
                    },
                )
                .with_default("none"),
                StyleProperty::new(
                    "position",
                    PropertyKind::Select {
                        list: choices(&[
                            ("static", "Static"),
                            ("relative", "Relative"),
                            ("absolute", "Absolute"),
                            ("fixed", "Fixed"),
                        ]),
                    },
                )
                .with_default("static"),
            ],
        ),
        sector(
            "Dimension",
            &["width", "height", "max-width", "min-height", "margin", "padding"],
            vec![
                integer("width", &["px", "%", "em", "rem", "vw"]).with_default("auto"),
                integer("height", &["px", "%", "em", "rem", "vh"]).with_default("auto"),
                integer("max-width", &["px", "%", "em", "rem", "vw"]).with_default("none"),
                integer("min-height", &["px", "%", "em", "rem", "vh"]).with_default("0"),
                sides("margin"),
                sides("padding"),
            ],
        ),
        sector(
            "Typography",
            &[
                "font-family",
                "font-size",
                "font-weight",
                "letter-spacing",
                "color",
                "line-height",
                "text-align",
                "text-decoration",
                "text-shadow",
            ],
            vec![
                StyleProperty::new(
                    "font-family",
                    PropertyKind::Select {
                        list: choices(&[
                            ("Arial, sans-serif", "Arial"),
                            ("Helvetica, sans-serif", "Helvetica"),
                            ("Georgia, serif", "Georgia"),
                            ("Times New Roman, serif", "Times New Roman"),
                            ("Courier New, monospace", "Courier New"),
                        ]),
                    },
                )
                .with_default("Arial, sans-serif"),
                integer("font-size", &["px", "em", "rem", "%"]).with_default("16px"),
                StyleProperty::new(
                    "font-weight",
                    PropertyKind::Select {
                        list: choices(&[
                            ("normal", "Normal"),
                            ("bold", "Bold"),
                            ("bolder", "Bolder"),
                            ("lighter", "Lighter"),
                            ("100", "100"),
                            ("200", "200"),
                            ("300", "300"),
                            ("400", "400"),
                            ("500", "500"),
                            ("600", "600"),
                            ("700", "700"),
                            ("800", "800"),
                            ("900", "900"),
                        ]),
                    },
                )
                .with_default("normal"),
                StyleProperty::new("color", PropertyKind::Color),
                integer("line-height", &["px", "em", "rem", "%"]).with_default("normal"),
                StyleProperty::new(
                    "text-align",
                    PropertyKind::Radio {
                        list: choices(&[
                            ("left", "Left"),
                            ("center", "Center"),
                            ("right", "Right"),
                            ("justify", "Justify"),
                        ]),
                    },
                )
                .with_default("left"),
                StyleProperty::new(
                    "text-decoration",
                    PropertyKind::Radio {
                        list: choices(&[
                            ("none", "None"),
                            ("underline", "Underline"),
                            ("line-through", "Line-through"),
                        ]),
                    },
                )
                .with_default("none"),
            ],
        ),
        sector(
            "Decorations",
            &[
                "opacity",
                "background-color",
                "border-radius",
                "border",
                "box-shadow",
                "background",
            ],
            vec![
                StyleProperty::new(
                    "opacity",
                    PropertyKind::Slider {
                        min: 0.0,
                        max: 1.0,
                        step: 0.01,
                    },
                )
                .with_default("1"),
                StyleProperty::new("background-color", PropertyKind::Color),
                integer("border-radius", &["px", "%", "em", "rem"]).with_default("0"),
                StyleProperty::new(
                    "border",
                    PropertyKind::Composite {
                        properties: vec![
                            integer("border-width", &["px", "em", "rem"]),
                            StyleProperty::new(
                                "border-style",
                                PropertyKind::Select {
                                    list: choices(&[
                                        ("none", "None"),
                                        ("solid", "Solid"),
                                        ("dotted", "Dotted"),
                                        ("dashed", "Dashed"),
                                        ("double", "Double"),
                                        ("groove", "Groove"),
                                        ("ridge", "Ridge"),
                                        ("inset", "Inset"),
                                        ("outset", "Outset"),
                                    ]),
                                },
                            ),
                            StyleProperty::new("border-color", PropertyKind::Color),
                        ],
                    },
                ),
            ],
        ),
        sector(
            "Extra",
            &["transition", "perspective", "transform"],
            vec![
                StyleProperty::new("transition", PropertyKind::Stack),
                StyleProperty::new("transform", PropertyKind::Stack),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_follow_declared_order() {
        let names: Vec<String> = default_sectors().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["General", "Dimension", "Typography", "Decorations", "Extra"]);
    }

    #[test]
    fn composite_expands_to_four_sides() {
        let dimension = &default_sectors()[1];
        let margin = dimension.properties.iter().find(|p| p.id == "margin").unwrap();
        assert_eq!(
            margin.leaf_ids(),
            ["margin-top", "margin-right", "margin-bottom", "margin-left"]
        );
    }

    #[test]
    fn build_props_without_override_get_a_plain_editor() {
        let general = &default_sectors()[0];
        let resolved = general.resolved_properties();
        assert_eq!(resolved.len(), general.build_props.len());
        assert_eq!(resolved[1].id, "display");
        assert_eq!(resolved[1].kind, PropertyKind::Text);
        assert_eq!(resolved[0].default.as_deref(), Some("none"));
    }
}
