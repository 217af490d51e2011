//! Forward kinematics: absolute positions and effective rotations.
//!
//! The walk is depth-first pre-order. Each bone starts from its parent's
//! absolute position and accumulated rotation:
//!
//! - `rest = atan2(-vector.y, vector.x)`
//! - identity formula (`"a"`): `rotation = inherited`
//! - otherwise: `rotation = inherited + formula(a = rest, s) - rest`
//! - `position = parent_position + rotate(vector, rotation)`
//!
//! A formula written only in terms of `a` therefore leaves the bone where it
//! was, while formulas over `s` add an offset that oscillates with the wave.
//! A failing formula falls back to the inherited rotation for that frame and
//! is reported in [`Pose::failures`].

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::bone::Bone;
use crate::config::Config;
use crate::formula::{FormulaEngine, FormulaError};
use crate::ids::BoneId;
use crate::outputs::{FormulaFailure, Primitive, Stroke};
use crate::vector::Vector;

/// One bone after posing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosedBone {
    pub address: Address,
    pub id: BoneId,
    pub parent_position: Vector,
    pub position: Vector,
    /// Rotation applied to this bone and passed on to its children.
    pub rotation: f64,
}

/// Posed bones in pre-order, plus the formulas that failed along the way.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub bones: Vec<PosedBone>,
    pub failures: Vec<FormulaFailure>,
}

/// How posed bones are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneStyle {
    pub line: Stroke,
    pub anchor_stroke: Stroke,
    pub anchor_fill: String,
    pub anchor_radius: f64,
}

impl BoneStyle {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            line: Stroke::new(cfg.palette.bone.clone(), 1.0),
            anchor_stroke: Stroke::new(cfg.palette.anchor_stroke.clone(), 1.0),
            anchor_fill: cfg.palette.anchor_fill.clone(),
            anchor_radius: cfg.anchor_radius,
        }
    }
}

impl Default for BoneStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Pose the whole tree from the origin with no inherited rotation.
pub fn pose(root: &Bone, wave_sample: f64, formulas: &mut FormulaEngine) -> Pose {
    pose_from(root, Vector::ZERO, 0.0, wave_sample, formulas)
}

/// Pose the tree rooted at `root` as if its parent sat at `parent_position`
/// with accumulated rotation `inherited_rotation`.
pub fn pose_from(
    root: &Bone,
    parent_position: Vector,
    inherited_rotation: f64,
    wave_sample: f64,
    formulas: &mut FormulaEngine,
) -> Pose {
    let mut pose = Pose {
        bones: Vec::with_capacity(root.bone_count()),
        failures: Vec::new(),
    };
    pose_bone(
        root,
        Address::root(),
        parent_position,
        inherited_rotation,
        wave_sample,
        formulas,
        &mut pose,
    );
    pose
}

/// Rotation a bone applies given its parent's accumulated rotation.
pub fn effective_rotation(
    bone: &Bone,
    inherited_rotation: f64,
    wave_sample: f64,
    formulas: &mut FormulaEngine,
) -> Result<f64, FormulaError> {
    if bone.is_identity() {
        return Ok(inherited_rotation);
    }
    let rest = bone.vector.rest_angle();
    let angle = formulas.eval_rotation(&bone.rotation_formula, rest, wave_sample)?;
    Ok(inherited_rotation + angle - rest)
}

fn pose_bone(
    bone: &Bone,
    address: Address,
    parent_position: Vector,
    inherited_rotation: f64,
    wave_sample: f64,
    formulas: &mut FormulaEngine,
    out: &mut Pose,
) {
    let rotation = match effective_rotation(bone, inherited_rotation, wave_sample, formulas) {
        Ok(rotation) => rotation,
        Err(err) => {
            log::debug!("bone [{address}] keeps inherited rotation: {err}");
            out.failures.push(FormulaFailure::for_bone(address.clone(), &err));
            inherited_rotation
        }
    };
    let position = parent_position + bone.vector.rotate(rotation);

    out.bones.push(PosedBone {
        address: address.clone(),
        id: bone.id,
        parent_position,
        position,
        rotation,
    });

    for child in &bone.children {
        pose_bone(
            child,
            address.child(child.id),
            position,
            rotation,
            wave_sample,
            formulas,
            out,
        );
    }
}

impl Pose {
    /// Posed position of the bone at `address`, if it was posed.
    pub fn position_of(&self, address: &Address) -> Option<Vector> {
        self.bones
            .iter()
            .find(|b| &b.address == address)
            .map(|b| b.position)
    }

    /// Flatten into draw primitives: a line from the parent then an anchor,
    /// for every bone in pre-order.
    pub fn primitives(&self, style: &BoneStyle) -> Vec<Primitive> {
        let mut out = Vec::with_capacity(self.bones.len() * 2);
        for bone in &self.bones {
            out.push(Primitive::Line {
                from: bone.parent_position,
                to: bone.position,
                stroke: style.line.clone(),
            });
            out.push(Primitive::Anchor {
                center: bone.position,
                radius: style.anchor_radius,
                stroke: style.anchor_stroke.clone(),
                fill: style.anchor_fill.clone(),
                address: bone.address.clone(),
            });
        }
        out
    }
}
