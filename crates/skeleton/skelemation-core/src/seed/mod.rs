//! Seeds for the initial skeleton of a session.

use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::error::SkeletonError;

/// Built-in standing figure: torso, head, two arms and two legs.
pub const FIGURE_JSON: &str = include_str!("figure.json");

/// Where the first tree of a session comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Seed {
    /// The built-in figure.
    #[default]
    Figure,
    /// A bare root bone at the origin.
    Origin,
    /// A caller-supplied tree.
    Skeleton { root: Bone },
}

impl Seed {
    /// Produce the root bone, checking that ids are unique.
    pub fn build(&self) -> Result<Bone, SkeletonError> {
        match self {
            Seed::Figure => figure(),
            Seed::Origin => Ok(Bone::origin()),
            Seed::Skeleton { root } => {
                root.validate_unique_ids()?;
                Ok(root.clone())
            }
        }
    }
}

/// Parse a skeleton from seed JSON and validate it.
pub fn parse_skeleton_json(s: &str) -> Result<Bone, SkeletonError> {
    let root: Bone = serde_json::from_str(s).map_err(|e| SkeletonError::SeedParse {
        reason: e.to_string(),
    })?;
    root.validate_unique_ids()?;
    Ok(root)
}

/// The built-in figure as a tree.
pub fn figure() -> Result<Bone, SkeletonError> {
    parse_skeleton_json(FIGURE_JSON)
}
