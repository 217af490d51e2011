//! Output contracts handed to the rendering collaborator.
//!
//! A [`Frame`] carries flat, ordered draw primitives plus text: the debug
//! dump of the tree and any transient status lines (formula failures).
//! Hosts map primitives onto whatever surface they draw on.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::formula::FormulaError;
use crate::vector::Vector;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// One draw primitive, in the surface's local coordinate space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        from: Vector,
        to: Vector,
        stroke: Stroke,
    },
    /// Clickable marker at a bone tip. `address` is the handle the host
    /// sends back with pointer events on this anchor.
    Anchor {
        center: Vector,
        radius: f64,
        stroke: Stroke,
        fill: String,
        address: Address,
    },
    Polyline {
        points: Vec<Vector>,
        stroke: Stroke,
    },
}

impl Primitive {
    /// Address tag for anchors, `None` for plain geometry.
    pub fn anchor_address(&self) -> Option<&Address> {
        match self {
            Primitive::Anchor { address, .. } => Some(address),
            _ => None,
        }
    }
}

/// A formula that failed while posing or sampling this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormulaFailure {
    /// Bone whose rotation formula failed; `None` for the wave formula.
    pub address: Option<Address>,
    pub message: String,
}

impl FormulaFailure {
    pub fn for_bone(address: Address, err: &FormulaError) -> Self {
        Self {
            address: Some(address),
            message: err.to_string(),
        }
    }

    pub fn for_wave(err: &FormulaError) -> Self {
        Self {
            address: None,
            message: err.to_string(),
        }
    }
}

/// Text fields and curve of the Animate screen's wave panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WavePanel {
    /// (min_x, min_y, width, height) of the wave coordinate space.
    pub view_box: [f64; 4],
    pub primitives: Vec<Primitive>,
    pub wave_formula: String,
    /// Phase in `[0, 1)`.
    pub phase: f64,
    /// Wave sample fed to the rotation formulas this frame.
    pub sample: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedBonePanel>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedBonePanel {
    pub address: Address,
    pub rotation_formula: String,
    /// Pretty JSON of the selected subtree.
    pub dump: String,
}

/// Everything produced for one render of the active screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// (min_x, min_y, width, height) of the skeleton surface.
    pub view_box: [f64; 4],
    #[serde(default)]
    pub primitives: Vec<Primitive>,
    /// Debug dump of the tree.
    #[serde(default)]
    pub dump: String,
    /// One line per bone: address, id, vector and rotation formula.
    #[serde(default)]
    pub listing: String,
    #[serde(default)]
    pub status: Vec<FormulaFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_panel: Option<WavePanel>,
}

impl Frame {
    /// Anchor primitives in draw order.
    pub fn anchors(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Anchor { .. }))
    }

    #[inline]
    pub fn has_failures(&self) -> bool {
        !self.status.is_empty()
    }
}
