//! Address parsing and formatting.
//!
//! An address is the list of bone ids from the root's children down to a
//! target bone. The root itself is the empty address.
//!
//! Encoding (used for anchor tags handed to the renderer):
//!   "3,7,9" -> [3, 7, 9]
//!   ""      -> [] (the root)
//!
//! Addresses are the only handle the outside world holds on a bone; lookups
//! always walk down from the root again.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SkeletonError;
use crate::ids::BoneId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address(Vec<BoneId>);

impl Address {
    /// The root's address.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(ids: Vec<BoneId>) -> Self {
        Self(ids)
    }

    /// Parse the comma-joined encoding described above.
    pub fn parse(s: &str) -> Result<Self, SkeletonError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut ids = Vec::new();
        for segment in trimmed.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(SkeletonError::InvalidAddress {
                    input: s.to_string(),
                    reason: "empty segment".to_string(),
                });
            }
            let id = segment
                .parse::<u32>()
                .map_err(|e| SkeletonError::InvalidAddress {
                    input: s.to_string(),
                    reason: format!("segment '{segment}': {e}"),
                })?;
            ids.push(BoneId(id));
        }
        Ok(Self(ids))
    }

    /// Address of the child `id` under this address.
    pub fn child(&self, id: BoneId) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id);
        Self(ids)
    }

    /// Address of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) => Some(Self(rest.to_vec())),
            None => None,
        }
    }

    /// Id of the addressed bone, or `None` for the root.
    pub fn last(&self) -> Option<BoneId> {
        self.0.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> &[BoneId] {
        &self.0
    }
}

impl From<Vec<u32>> for Address {
    fn from(ids: Vec<u32>) -> Self {
        Self(ids.into_iter().map(BoneId).collect())
    }
}

impl From<&[u32]> for Address {
    fn from(ids: &[u32]) -> Self {
        Self(ids.iter().copied().map(BoneId).collect())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = SkeletonError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

// Serde support: serialize as the anchor-tag string, deserialize from it
impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(de::Error::custom)
    }
}
