//! Node hierarchy reconstruction from parent references.

use crate::error::{Error, IResult};

use super::Scene;

/// Resolve a mesh's 1-based parent reference into an arena index.
///
/// A mesh may only reference an earlier record as its parent (0 = scene
/// root). Self and forward references violate the container's ordering
/// guarantee and abort the build rather than producing a cyclic or dangling
/// hierarchy.
pub fn resolve_parent(index: usize, parent_ref: u16) -> IResult<Option<usize>> {
    match parent_ref as usize {
        0 => Ok(None),
        parent if parent <= index => Ok(Some(parent - 1)),
        _ => Err(Error::MalformedHierarchy { mesh: index, parent_ref }),
    }
}

impl Scene {
    /// Indices of nodes attached directly to the scene root.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| index)
    }

    /// Indices of the direct children of the node at `parent`.
    pub fn children_of(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.parent == Some(parent))
            .map(|(index, _)| index)
    }
}
