//! Renderer-ready geometry assembly from a mesh's detail-level data.

use crate::model::Mesh;

/// Geometry for one node: parallel vertex attribute arrays plus one index
/// partition per face group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Vertical axis negated relative to the container's convention.
    pub uvs: Vec<[f32; 2]>,
    pub submeshes: Vec<Submesh>,
}

/// One geometry partition, tagged with its resolved material index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Submesh {
    /// Flattened triangle indices into the node's vertex arrays.
    pub indices: Vec<u32>,
    /// Index into the model's material table, clamped into range.
    pub material_index: usize,
}

/// Clamp a face group's 1-based material reference into `[0, count - 1]`.
///
/// Out-of-range references are a defined policy, not an error: values below
/// the valid range land on the first material, values past the end on the
/// last. Only meaningful when the material table is non-empty.
pub fn clamp_material_index(material_ref: u16, material_count: usize) -> usize {
    (material_ref as usize)
        .saturating_sub(1)
        .min(material_count.saturating_sub(1))
}

/// Assemble renderer-ready geometry from a mesh's highest-detail LOD.
///
/// Returns `None` for meshes without renderable data: no standard body
/// (dummies, unknown variants), instanced meshes, or an empty LOD list.
/// The node itself is unaffected either way.
pub fn assemble_geometry(mesh: &Mesh, material_count: usize) -> Option<NodeGeometry> {
    let body = mesh.payload.standard_body()?;
    if body.instanced {
        return None;
    }
    let lod = body.lods.first()?;

    let mut positions = Vec::with_capacity(lod.vertices.len());
    let mut normals = Vec::with_capacity(lod.vertices.len());
    let mut uvs = Vec::with_capacity(lod.vertices.len());
    for vertex in &lod.vertices {
        positions.push(vertex.position);
        normals.push(vertex.normal);
        // The container's UV vertical axis points the other way.
        uvs.push([vertex.uv[0], -vertex.uv[1]]);
    }

    let submeshes = lod
        .face_groups
        .iter()
        .map(|group| Submesh {
            indices: group
                .faces
                .iter()
                .flat_map(|&[a, b, c]| [u32::from(a), u32::from(b), u32::from(c)])
                .collect(),
            material_index: clamp_material_index(group.material_ref, material_count),
        })
        .collect();

    Some(NodeGeometry {
        positions,
        normals,
        uvs,
        submeshes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FaceGroup, Lod, Mesh, MeshKind, MeshPayload, StandardMesh, Vertex, VisualKind,
    };

    fn mesh_with_payload(payload: MeshPayload) -> Mesh {
        Mesh {
            name: "m".to_string(),
            parent_ref: 0,
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
            kind: MeshKind::Standard,
            visual_kind: VisualKind::Standard,
            payload,
        }
    }

    fn quad_lod() -> Lod {
        let vertex = |x: f32, uv: [f32; 2]| Vertex {
            position: [x, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv,
        };
        Lod {
            vertices: vec![
                vertex(0.0, [0.1, 0.2]),
                vertex(1.0, [0.3, 0.4]),
                vertex(2.0, [0.5, 0.6]),
                vertex(3.0, [0.7, 0.8]),
            ],
            face_groups: vec![
                FaceGroup {
                    material_ref: 1,
                    faces: vec![[0, 1, 2]],
                },
                FaceGroup {
                    material_ref: 9,
                    faces: vec![[1, 2, 3], [0, 2, 3]],
                },
            ],
        }
    }

    #[test]
    fn uv_vertical_axis_is_flipped() {
        let mesh = mesh_with_payload(MeshPayload::Standard(StandardMesh {
            instanced: false,
            lods: vec![quad_lod()],
        }));
        let geometry = assemble_geometry(&mesh, 2).unwrap();
        assert_eq!(geometry.uvs[0], [0.1, -0.2]);
        assert_eq!(geometry.uvs[3], [0.7, -0.8]);
    }

    #[test]
    fn one_submesh_per_face_group_with_flattened_indices() {
        let mesh = mesh_with_payload(MeshPayload::Standard(StandardMesh {
            instanced: false,
            lods: vec![quad_lod()],
        }));
        let geometry = assemble_geometry(&mesh, 2).unwrap();
        assert_eq!(geometry.positions.len(), 4);
        assert_eq!(geometry.submeshes.len(), 2);
        assert_eq!(geometry.submeshes[0].indices, vec![0, 1, 2]);
        assert_eq!(geometry.submeshes[1].indices, vec![1, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn material_references_clamp_into_range() {
        // Two materials: ref 1 -> 0, ref 9 -> last.
        let mesh = mesh_with_payload(MeshPayload::Standard(StandardMesh {
            instanced: false,
            lods: vec![quad_lod()],
        }));
        let geometry = assemble_geometry(&mesh, 2).unwrap();
        assert_eq!(geometry.submeshes[0].material_index, 0);
        assert_eq!(geometry.submeshes[1].material_index, 1);

        // Unset sentinel (0) also lands on the first material.
        assert_eq!(clamp_material_index(0, 2), 0);
        assert_eq!(clamp_material_index(0, 0), 0);
    }

    #[test]
    fn instanced_mesh_produces_no_geometry() {
        let mesh = mesh_with_payload(MeshPayload::Standard(StandardMesh {
            instanced: true,
            lods: vec![quad_lod()],
        }));
        assert_eq!(assemble_geometry(&mesh, 2), None);
    }

    #[test]
    fn empty_lod_list_produces_no_geometry() {
        let mesh = mesh_with_payload(MeshPayload::Standard(StandardMesh {
            instanced: false,
            lods: vec![],
        }));
        assert_eq!(assemble_geometry(&mesh, 2), None);
    }

    #[test]
    fn single_morph_uses_nested_standard_mesh() {
        let mesh = mesh_with_payload(MeshPayload::SingleMorph(StandardMesh {
            instanced: false,
            lods: vec![quad_lod()],
        }));
        assert!(assemble_geometry(&mesh, 2).is_some());
    }

    #[test]
    fn payload_less_mesh_produces_no_geometry() {
        let mesh = mesh_with_payload(MeshPayload::None);
        assert_eq!(assemble_geometry(&mesh, 2), None);
    }
}
