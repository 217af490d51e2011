//! The recursive bone tree and address-based lookup/mutation.
//!
//! Bones hold no parent pointers; every lookup walks down from the root
//! following an [`Address`]. The tree only grows: bones are appended, never
//! removed or re-parented.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::SkeletonError;
use crate::ids::{BoneId, IdCounter};
use crate::vector::Vector;

/// Rotation formula meaning "inherit the parent's rotation unchanged".
pub const IDENTITY_FORMULA: &str = "a";

fn default_rotation_formula() -> String {
    IDENTITY_FORMULA.to_string()
}

/// A node of the skeleton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: BoneId,
    /// Displacement from the parent bone (never absolute).
    pub vector: Vector,
    /// `"a"` or an expression over `a` (rest angle) and `s` (wave sample).
    #[serde(rename = "rotationFormula", default = "default_rotation_formula")]
    pub rotation_formula: String,
    /// Insertion order is traversal and render order.
    #[serde(default)]
    pub children: Vec<Bone>,
}

/// Field-level overwrite applied by [`Bone::update_bone`]. `None` leaves the
/// field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BonePatch {
    #[serde(default, rename = "rotationFormula")]
    pub rotation_formula: Option<String>,
    #[serde(default)]
    pub vector: Option<Vector>,
}

impl BonePatch {
    pub fn with_rotation_formula(formula: impl Into<String>) -> Self {
        Self {
            rotation_formula: Some(formula.into()),
            ..Default::default()
        }
    }

    pub fn with_vector(vector: Vector) -> Self {
        Self {
            vector: Some(vector),
            ..Default::default()
        }
    }
}

impl Bone {
    /// Leaf bone with the identity formula.
    pub fn new(id: BoneId, vector: Vector) -> Self {
        Self {
            id,
            vector,
            rotation_formula: default_rotation_formula(),
            children: Vec::new(),
        }
    }

    /// A root sitting at the origin with no children.
    pub fn origin() -> Self {
        Self::new(BoneId(0), Vector::ZERO)
    }

    /// True when this bone inherits its parent's rotation unchanged.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.rotation_formula == IDENTITY_FORMULA
    }

    /// Direct child with the given id.
    pub fn child(&self, id: BoneId) -> Option<&Bone> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Resolve `address` starting at this bone (the root).
    pub fn find_bone(&self, address: &Address) -> Result<&Bone, SkeletonError> {
        let mut bone = self;
        for id in address.ids() {
            bone = bone
                .child(*id)
                .ok_or_else(|| SkeletonError::AddressNotFound {
                    address: address.clone(),
                    missing: *id,
                })?;
        }
        Ok(bone)
    }

    pub fn find_bone_mut(&mut self, address: &Address) -> Result<&mut Bone, SkeletonError> {
        let mut bone = self;
        for id in address.ids() {
            bone = bone
                .children
                .iter_mut()
                .find(|c| c.id == *id)
                .ok_or_else(|| SkeletonError::AddressNotFound {
                    address: address.clone(),
                    missing: *id,
                })?;
        }
        Ok(bone)
    }

    /// Every bone visited while resolving `address`, root first and the
    /// addressed bone last.
    pub fn bones_on_address(&self, address: &Address) -> Result<Vec<&Bone>, SkeletonError> {
        let mut bones = Vec::with_capacity(address.depth() + 1);
        let mut bone = self;
        bones.push(bone);
        for id in address.ids() {
            bone = bone
                .child(*id)
                .ok_or_else(|| SkeletonError::AddressNotFound {
                    address: address.clone(),
                    missing: *id,
                })?;
            bones.push(bone);
        }
        Ok(bones)
    }

    /// Sum of the vectors along `address`.
    ///
    /// Purely translational: rotation formulas are ignored. Used only to
    /// place the drag preview in Create mode; posed positions come from
    /// [`crate::kinematics`].
    pub fn bone_position(&self, address: &Address) -> Result<Vector, SkeletonError> {
        Ok(self
            .bones_on_address(address)?
            .into_iter()
            .map(|b| b.vector)
            .sum())
    }

    /// Append a new identity-formula leaf under the bone at `parent`.
    ///
    /// The id is drawn from `ids` only once the parent has resolved, so a
    /// failed call consumes nothing. An exhausted counter leaves the tree
    /// unchanged.
    pub fn add_bone(
        &mut self,
        parent: &Address,
        vector: Vector,
        ids: &mut IdCounter,
    ) -> Result<BoneId, SkeletonError> {
        let parent_bone = self.find_bone_mut(parent)?;
        let id = ids.next().ok_or(SkeletonError::IdsExhausted)?;
        parent_bone.children.push(Bone::new(id, vector));
        Ok(id)
    }

    /// Overwrite the fields present in `patch` on the bone at `address`.
    pub fn update_bone(&mut self, address: &Address, patch: BonePatch) -> Result<(), SkeletonError> {
        let bone = self.find_bone_mut(address)?;
        if let Some(formula) = patch.rotation_formula {
            bone.rotation_formula = formula;
        }
        if let Some(vector) = patch.vector {
            bone.vector = vector;
        }
        Ok(())
    }

    /// Pre-order walk yielding each bone with its address.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(Address::root(), self)],
        }
    }

    pub fn bone_count(&self) -> usize {
        1 + self.children.iter().map(Bone::bone_count).sum::<usize>()
    }

    pub fn max_id(&self) -> BoneId {
        self.children
            .iter()
            .map(Bone::max_id)
            .fold(self.id, |acc, id| acc.max(id))
    }

    /// Reject trees in which two bones share an id.
    pub fn validate_unique_ids(&self) -> Result<(), SkeletonError> {
        let mut seen = HashSet::with_capacity(self.bone_count());
        for (_, bone) in self.walk() {
            if !seen.insert(bone.id) {
                return Err(SkeletonError::DuplicateBoneId { id: bone.id });
            }
        }
        Ok(())
    }
}

/// Iterator returned by [`Bone::walk`].
pub struct Walk<'a> {
    stack: Vec<(Address, &'a Bone)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Address, &'a Bone);

    fn next(&mut self) -> Option<Self::Item> {
        let (address, bone) = self.stack.pop()?;
        for child in bone.children.iter().rev() {
            self.stack.push((address.child(child.id), child));
        }
        Some((address, bone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Bone {
        let mut root = Bone::origin();
        let mut a = Bone::new(BoneId(1), Vector::new(0.0, -10.0));
        a.children.push(Bone::new(BoneId(2), Vector::new(0.0, -10.0)));
        root.children.push(a);
        root.children.push(Bone::new(BoneId(3), Vector::new(5.0, 5.0)));
        root
    }

    #[test]
    fn find_bone_returns_last_id() {
        let root = chain();
        assert_eq!(root.find_bone(&Address::root()).unwrap().id, BoneId(0));
        assert_eq!(root.find_bone(&Address::from(vec![1, 2])).unwrap().id, BoneId(2));
    }

    #[test]
    fn find_bone_reports_missing_step() {
        let root = chain();
        let err = root.find_bone(&Address::from(vec![1, 9])).unwrap_err();
        assert_eq!(
            err,
            SkeletonError::AddressNotFound {
                address: Address::from(vec![1, 9]),
                missing: BoneId(9),
            }
        );
    }

    #[test]
    fn bones_on_address_includes_root() {
        let root = chain();
        let ids: Vec<_> = root
            .bones_on_address(&Address::from(vec![1, 2]))
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![BoneId(0), BoneId(1), BoneId(2)]);
    }

    #[test]
    fn bone_position_sums_vectors() {
        let root = chain();
        assert_eq!(root.bone_position(&Address::root()).unwrap(), Vector::ZERO);
        assert_eq!(
            root.bone_position(&Address::from(vec![1, 2])).unwrap(),
            Vector::new(0.0, -20.0)
        );
    }

    #[test]
    fn add_bone_failure_consumes_no_id() {
        let mut root = chain();
        let mut ids = IdCounter::starting_after(&root);
        let before = ids.peek();
        assert!(root
            .add_bone(&Address::from(vec![7]), Vector::ZERO, &mut ids)
            .is_err());
        assert_eq!(ids.peek(), before);
        assert_eq!(root.bone_count(), 4);
    }

    #[test]
    fn update_bone_overwrites_present_fields_only() {
        let mut root = chain();
        let addr = Address::from(vec![3]);
        root.update_bone(&addr, BonePatch::with_rotation_formula("a + s"))
            .unwrap();
        let bone = root.find_bone(&addr).unwrap();
        assert_eq!(bone.rotation_formula, "a + s");
        assert_eq!(bone.vector, Vector::new(5.0, 5.0));
    }

    #[test]
    fn vector_patch_moves_subtree_and_keeps_formula() {
        let mut root = chain();
        let addr = Address::from(vec![1]);
        root.update_bone(&addr, BonePatch::with_rotation_formula("s"))
            .unwrap();
        root.update_bone(&addr, BonePatch::with_vector(Vector::new(4.0, -3.0)))
            .unwrap();
        let bone = root.find_bone(&addr).unwrap();
        assert_eq!(bone.vector, Vector::new(4.0, -3.0));
        assert_eq!(bone.rotation_formula, "s");
        assert_eq!(
            root.bone_position(&Address::from(vec![1, 2])).unwrap(),
            Vector::new(4.0, -13.0)
        );
        assert!(root
            .update_bone(&Address::from(vec![9]), BonePatch::with_vector(Vector::ZERO))
            .is_err());
    }

    #[test]
    fn exhausted_counter_leaves_tree_unchanged() {
        let mut root = chain();
        let mut ids = IdCounter::starting_at(u32::MAX);
        root.add_bone(&Address::root(), Vector::new(1.0, 1.0), &mut ids)
            .unwrap();
        let before = root.clone();
        assert_eq!(
            root.add_bone(&Address::root(), Vector::new(2.0, 2.0), &mut ids),
            Err(SkeletonError::IdsExhausted)
        );
        assert_eq!(root, before);
        assert!(ids.is_exhausted());
    }

    #[test]
    fn walk_is_pre_order() {
        let root = chain();
        let order: Vec<String> = root.walk().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, vec!["", "1", "1,2", "3"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut root = chain();
        root.children.push(Bone::new(BoneId(2), Vector::ZERO));
        assert_eq!(
            root.validate_unique_ids(),
            Err(SkeletonError::DuplicateBoneId { id: BoneId(2) })
        );
    }

    #[test]
    fn json_defaults_fill_formula_and_children() {
        let bone: Bone = serde_json::from_str(r#"{"id":4,"vector":{"x":1,"y":2}}"#).unwrap();
        assert!(bone.is_identity());
        assert!(bone.children.is_empty());
    }
}
