//! Derived scene views built from a decoded [`Model`](crate::model::Model):
//! node hierarchy, renderer-ready geometry, resolved materials.
//!
//! A [`Scene`] is built once per decode and handed to the external renderer,
//! which owns its runtime lifetime from then on.

/// Geometry assembly from detail-level data
pub mod geometry;
/// Node hierarchy reconstruction
pub mod graph;
/// The high-level loading pipeline and its collaborator boundaries
pub mod loader;
/// Material resolution into renderer-agnostic descriptions
pub mod material;

use crate::error::IResult;
use crate::model::Model;

use self::geometry::NodeGeometry;
use self::loader::TextureSource;
use self::material::ResolvedMaterial;

/// A reconstructed scene: an arena of nodes with parent-index edges.
///
/// Nodes appear in source-record order, so a parent always precedes its
/// children. The external renderer adapts this arena into its own node
/// representation at the boundary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub nodes: Vec<Node>,
}

/// One scene node. Every mesh record yields a node; geometry-less nodes are
/// pure transform anchors (attachment points etc.).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub name: String,
    /// Arena index of the parent node; `None` = child of the scene root.
    pub parent: Option<usize>,
    pub translation: [f32; 3],
    /// Quaternion, (x, y, z, w).
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub geometry: Option<NodeGeometry>,
    /// One resolved material per geometry submesh; empty when there is no
    /// geometry or the model carries no materials.
    pub materials: Vec<ResolvedMaterial>,
}

/// Build a scene from a decoded model in one left-to-right pass.
///
/// Parent-before-child ordering is guaranteed by the container's parent
/// reference invariant, so each node's parent is already in the arena when
/// the node is created.
pub fn build_scene(model: &Model, textures: &dyn TextureSource) -> IResult<Scene> {
    let mut nodes = Vec::with_capacity(model.meshes.len());

    for (index, mesh) in model.meshes.iter().enumerate() {
        let parent = graph::resolve_parent(index, mesh.parent_ref)?;
        let geometry = geometry::assemble_geometry(mesh, model.materials.len());
        let materials = match &geometry {
            Some(geometry) if !model.materials.is_empty() => geometry
                .submeshes
                .iter()
                .map(|submesh| {
                    material::resolve_material(&model.materials[submesh.material_index], textures)
                })
                .collect(),
            _ => Vec::new(),
        };

        nodes.push(Node {
            name: mesh.name.clone(),
            parent,
            translation: mesh.position,
            rotation: mesh.rotation,
            scale: mesh.scale,
            geometry,
            materials,
        });
    }

    Ok(Scene { nodes })
}
