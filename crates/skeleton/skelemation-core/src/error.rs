//! Error types for tree and seed operations.

use crate::address::Address;
use crate::config::ConfigError;
use crate::ids::BoneId;

/// Failures of the bone tree model.
///
/// These describe broken invariants (an address that no longer resolves, a
/// seed with clashing ids) rather than user mistakes; hosts are expected to
/// treat them as defects. Formula failures live in
/// [`FormulaError`](crate::formula::FormulaError) and never surface here.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SkeletonError {
    /// An address step had no child with the requested id.
    #[error("address [{address}] does not resolve: no child with id {missing}")]
    AddressNotFound { address: Address, missing: BoneId },

    /// Anchor tag text that is not a comma-joined list of ids.
    #[error("invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Two bones in one tree share an id.
    #[error("duplicate bone id {id} in skeleton")]
    DuplicateBoneId { id: BoneId },

    /// Every `u32` bone id has already been handed out this session.
    #[error("bone ids exhausted: no id left to allocate")]
    IdsExhausted,

    /// Seed JSON could not be parsed.
    #[error("seed parse error: {reason}")]
    SeedParse { reason: String },

    /// Session configuration rejected by [`Config::validate`](crate::config::Config::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
