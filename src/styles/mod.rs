//! Canvas styling: the style sheets inherited from the hosting page and the
//! sectors of the style manager panel.

mod collector;
pub mod sectors;

pub use collector::{collect, inject_stylesheet, DocumentStyles, StyleSheetRef, StyleSource};
pub use sectors::{default_sectors, PropertyKind, StyleChoice, StyleProperty, StyleSector};
