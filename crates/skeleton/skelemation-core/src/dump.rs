//! Debug text for the tree shown next to the drawing surface.

use std::fmt::Write as _;

use crate::bone::Bone;

/// Pretty-printed JSON of the tree, in the seed schema.
pub fn to_pretty_json(root: &Bone) -> String {
    match serde_json::to_string_pretty(root) {
        Ok(json) => json,
        // Bone only holds numbers and strings; this arm is unreachable in practice.
        Err(err) => format!("<unserializable skeleton: {err}>"),
    }
}

/// One line per bone in pre-order: `[address] (x, y) formula`.
pub fn listing(root: &Bone) -> String {
    let mut out = String::new();
    for (address, bone) in root.walk() {
        let indent = address.depth() * 2;
        let _ = writeln!(
            out,
            "{:indent$}[{}] #{} ({:.2}, {:.2}) {}",
            "",
            address,
            bone.id,
            bone.vector.x,
            bone.vector.y,
            bone.rotation_formula,
            indent = indent
        );
    }
    out
}
