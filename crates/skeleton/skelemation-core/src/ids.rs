//! Bone identifiers and the session-wide id counter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bone::Bone;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneId(pub u32);

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic allocator for [`BoneId`]s.
///
/// One counter lives for the whole session and is shared by every tree that
/// grows bones, so an id handed out once is never handed out again. Once
/// `u32::MAX` has been handed out the counter is exhausted and stays so.
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: Option<u32>,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: Some(0) }
    }
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { next: Some(first) }
    }

    /// Counter for a session seeded with `root`.
    ///
    /// Starts at the number of bones in the seed, or one past the largest
    /// seed id when ids are sparse. A seed already holding `u32::MAX` yields
    /// an exhausted counter.
    pub fn starting_after(root: &Bone) -> Self {
        let count = u32::try_from(root.bone_count()).unwrap_or(u32::MAX);
        Self {
            next: root.max_id().0.checked_add(1).map(|past_max| count.max(past_max)),
        }
    }

    /// Hand out the next id, or `None` once every `u32` has been used.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<BoneId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(BoneId(id))
    }

    /// The id the next call to [`IdCounter::next`] will return.
    #[inline]
    pub fn peek(&self) -> Option<BoneId> {
        self.next.map(BoneId)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
