//! Create screen: grow the skeleton by dragging out of existing anchors.
//!
//! ```text
//! Idle --PointerDown{address}--> AddingBone{address}
//! AddingBone --PointerUp--> Idle   (appends a child under `address`)
//! ```
//!
//! `PointerMove` updates the tracked pointer in every phase. `PointerUp` in
//! `Idle` does nothing, and a second `PointerDown` while a drag is active is
//! ignored: drags cannot be re-targeted.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::bone::Bone;
use crate::config::Config;
use crate::dump;
use crate::error::SkeletonError;
use crate::formula::FormulaEngine;
use crate::ids::{BoneId, IdCounter};
use crate::kinematics::{self, BoneStyle};
use crate::outputs::{Frame, Primitive, Stroke};
use crate::vector::Vector;

/// Pointer input for the Create screen, already mapped into the drawing
/// surface's local coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CreateEvent {
    PointerMove { position: Vector },
    /// Pointer pressed on the anchor tagged with `address`.
    PointerDown { address: Address },
    PointerUp,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CreatePhase {
    #[default]
    Idle,
    AddingBone {
        address: Address,
    },
}

#[derive(Clone, Debug)]
pub struct SkeletonCreator {
    root: Bone,
    phase: CreatePhase,
    mouse_position: Vector,
}

impl SkeletonCreator {
    pub fn new(root: Bone) -> Self {
        Self {
            root,
            phase: CreatePhase::Idle,
            mouse_position: Vector::ZERO,
        }
    }

    pub fn root(&self) -> &Bone {
        &self.root
    }

    pub fn phase(&self) -> &CreatePhase {
        &self.phase
    }

    pub fn mouse_position(&self) -> Vector {
        self.mouse_position
    }

    /// Apply one event. Returns the id of the bone appended by a completed
    /// drag, if any.
    ///
    /// An anchor address that does not resolve is an error and leaves the
    /// state as it was before the event.
    pub fn apply(
        &mut self,
        event: CreateEvent,
        ids: &mut IdCounter,
    ) -> Result<Option<BoneId>, SkeletonError> {
        match event {
            CreateEvent::PointerMove { position } => {
                self.mouse_position = position;
                Ok(None)
            }
            CreateEvent::PointerDown { address } => {
                if let CreatePhase::AddingBone { address: active } = &self.phase {
                    log::debug!("ignoring pointer-down on [{address}]: already adding under [{active}]");
                    return Ok(None);
                }
                if let Err(err) = self.root.find_bone(&address) {
                    log::error!("pointer-down on unresolvable anchor: {err}");
                    return Err(err);
                }
                log::debug!("start adding bone under [{address}]");
                self.phase = CreatePhase::AddingBone { address };
                Ok(None)
            }
            CreateEvent::PointerUp => {
                let address = match std::mem::take(&mut self.phase) {
                    CreatePhase::Idle => return Ok(None),
                    CreatePhase::AddingBone { address } => address,
                };
                let id = self.finish_adding(&address, ids).map_err(|err| {
                    log::error!("could not add bone under [{address}]: {err}");
                    err
                })?;
                log::debug!("added bone {id} under [{address}]");
                Ok(Some(id))
            }
        }
    }

    fn finish_adding(&mut self, parent: &Address, ids: &mut IdCounter) -> Result<BoneId, SkeletonError> {
        let parent_position = self.root.bone_position(parent)?;
        self.root
            .add_bone(parent, self.mouse_position - parent_position, ids)
    }

    /// Endpoints of the drag preview: the parent's translational position
    /// and the pointer. `None` while idle.
    pub fn preview_line(&self) -> Result<Option<(Vector, Vector)>, SkeletonError> {
        match &self.phase {
            CreatePhase::Idle => Ok(None),
            CreatePhase::AddingBone { address } => {
                let origin = self.root.bone_position(address)?;
                Ok(Some((origin, self.mouse_position)))
            }
        }
    }

    /// Render the Create screen. Rotation formulas are evaluated with a zero
    /// wave sample.
    pub fn frame(&self, cfg: &Config, formulas: &mut FormulaEngine) -> Result<Frame, SkeletonError> {
        let pose = kinematics::pose(&self.root, 0.0, formulas);
        let mut primitives = pose.primitives(&BoneStyle::from_config(cfg));
        if let Some((from, to)) = self.preview_line()? {
            primitives.push(Primitive::Line {
                from,
                to,
                stroke: Stroke::new(cfg.palette.preview.clone(), 1.0),
            });
        }
        Ok(Frame {
            view_box: cfg.view_box,
            primitives,
            dump: dump::to_pretty_json(&self.root),
            listing: dump::listing(&self.root),
            status: pose.failures,
            wave_panel: None,
        })
    }
}
