//! Skelemation Core (engine-agnostic)
//!
//! A 2D bone-tree editor and animator with no rendering dependency. Hosts
//! feed pointer and clock events into a [`Studio`] and draw the [`Frame`] it
//! returns: lines, clickable anchors tagged with bone [`Address`]es, and a
//! wave panel.
//!
//! The Create screen grows the tree by dragging out of anchors. The Animate
//! screen rotates bones with small expressions evaluated against a periodic
//! wave.

pub mod address;
pub mod animate;
pub mod bone;
pub mod config;
pub mod create;
pub mod dump;
pub mod error;
pub mod formula;
pub mod ids;
pub mod kinematics;
pub mod outputs;
pub mod router;
pub mod seed;
pub mod vector;

// Re-exports for hosts
pub use address::Address;
pub use animate::{AnimateEvent, SkeletonAnimator};
pub use bone::{Bone, BonePatch, IDENTITY_FORMULA};
pub use config::{Config, ConfigError, FormulaLimits, Palette};
pub use create::{CreateEvent, CreatePhase, SkeletonCreator};
pub use error::SkeletonError;
pub use formula::{FormulaEngine, FormulaError};
pub use ids::{BoneId, IdCounter};
pub use kinematics::{pose, Pose, PosedBone};
pub use outputs::{FormulaFailure, Frame, Primitive, SelectedBonePanel, Stroke, WavePanel};
pub use router::{ActiveMode, ActiveModeMut, ModeKind, Studio, StudioEvent};
pub use seed::{parse_skeleton_json, Seed};
pub use vector::Vector;
