//! Per-background overlay layouts: fixed images and fixed cables given in
//! percentage coordinates of the background image.

use crate::constants::DEFAULT_CABLE_COLOR;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("overlay `{name}` has a non-finite coordinate")]
    NonFinite { name: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpec {
    pub name: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default, alias = "pending", rename = "sagPercent")]
    pub sag_percent: f32,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CABLE_COLOR.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverlayDescriptor {
    Image(ImagePlacement),
    #[serde(alias = "connecteur")]
    Connector(ConnectorSpec),
}

impl OverlayDescriptor {
    pub fn name(&self) -> &str {
        match self {
            OverlayDescriptor::Image(i) => &i.name,
            OverlayDescriptor::Connector(c) => &c.name,
        }
    }

    fn coordinates(&self) -> Vec<f32> {
        match self {
            OverlayDescriptor::Image(i) => vec![i.x, i.y],
            OverlayDescriptor::Connector(c) => vec![c.x1, c.y1, c.x2, c.y2, c.sag_percent],
        }
    }
}

/// Layouts keyed by background index. Each list keeps its document order,
/// which is also the order overlays are processed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBook {
    pub backgrounds: BTreeMap<u32, Vec<OverlayDescriptor>>,
}

impl LayoutBook {
    pub fn from_json(text: &str) -> Result<Self, LayoutError> {
        let book: LayoutBook = serde_json::from_str(text)?;
        for list in book.backgrounds.values() {
            for d in list {
                if d.coordinates().iter().any(|v| !v.is_finite()) {
                    return Err(LayoutError::NonFinite {
                        name: d.name().to_string(),
                    });
                }
                if d.coordinates().iter().any(|v| !(0.0..=100.0).contains(v)) {
                    log::warn!("[layout] `{}` has a percentage outside 0..100; it will be clamped", d.name());
                }
            }
        }
        Ok(book)
    }

    pub fn for_background(&self, index: u32) -> &[OverlayDescriptor] {
        self.backgrounds.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}
