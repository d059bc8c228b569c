use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InstanceId, TraitValues};
use crate::widgets::{self, WidgetView};

/// Render strategy of a component kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Button,
    Alert,
    Badge,
    Container,
    Image,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Button,
        WidgetKind::Alert,
        WidgetKind::Badge,
        WidgetKind::Container,
        WidgetKind::Image,
    ];

    /// The component kind name the canvas knows this widget by.
    pub fn kind_name(self) -> &'static str {
        match self {
            WidgetKind::Button => "react-button",
            WidgetKind::Alert => "react-alert",
            WidgetKind::Badge => "react-badge",
            WidgetKind::Container => "container",
            WidgetKind::Image => "image",
        }
    }
}

/// Mount point holding the widget rendered for one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTarget {
    pub mount_id: String,
    pub view: WidgetView,
    /// Renders applied to this target, the initial mount included.
    pub renders: u32,
}

/// Mount, update and unmount hooks the canvas drives for each instance.
pub trait WidgetLifecycle {
    fn mount(&self, instance: InstanceId, values: &TraitValues) -> RenderTarget;
    fn update(&self, target: &mut RenderTarget, values: &TraitValues);
    fn unmount(&self, target: RenderTarget);
}

impl WidgetLifecycle for WidgetKind {
    fn mount(&self, instance: InstanceId, values: &TraitValues) -> RenderTarget {
        debug!(%instance, kind = self.kind_name(), "mounting widget");
        RenderTarget {
            mount_id: format!("wb-{}-{}", self.kind_name(), instance),
            view: widgets::project(*self, values),
            renders: 1,
        }
    }

    fn update(&self, target: &mut RenderTarget, values: &TraitValues) {
        target.view = widgets::project(*self, values);
        target.renders += 1;
    }

    fn unmount(&self, target: RenderTarget) {
        debug!(mount_id = %target.mount_id, renders = target.renders, "unmounting widget");
    }
}
