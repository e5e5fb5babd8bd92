//! Decoded 4DS container records.
//!
//! A [`Model`] is the direct, immutable image of one container file: an
//! ordered mesh table and an ordered material table. On-disk references into
//! both tables are 1-based, with 0 as the "none" sentinel (no parent / no
//! material). Nothing here makes hierarchy or rendering decisions; those
//! live in [`crate::scene`].

use std::time::Duration;

/// The container decoder
pub mod decode;

#[cfg(test)]
pub(crate) mod fixtures;

/// A fully decoded model container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

/// One mesh record from the container's mesh table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub name: String,
    /// 0 = root; otherwise a 1-based index into the mesh table, always
    /// referring to an earlier entry.
    pub parent_ref: u16,
    pub position: [f32; 3],
    /// Quaternion, (x, y, z, w).
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub kind: MeshKind,
    pub visual_kind: VisualKind,
    pub payload: MeshPayload,
}

/// Mesh kind tag. Unrecognized tags keep their raw value; the record still
/// decodes its common header and participates in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeshKind {
    Standard,
    /// Transform anchor with no visual data (attachment points etc.).
    Dummy,
    Unknown(u8),
}

impl MeshKind {
    pub const STANDARD: u8 = 0x01;
    pub const DUMMY: u8 = 0x06;

    pub fn from_raw(raw: u8) -> Self {
        if raw == Self::STANDARD {
            MeshKind::Standard
        } else if raw == Self::DUMMY {
            MeshKind::Dummy
        } else {
            MeshKind::Unknown(raw)
        }
    }
}

/// Visual kind tag, refining [`MeshKind::Standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualKind {
    Standard,
    /// Wraps one nested standard mesh as its geometry source.
    SingleMorph,
    Unknown(u8),
}

impl VisualKind {
    pub const STANDARD: u8 = 0x00;
    pub const SINGLE_MORPH: u8 = 0x05;

    pub fn from_raw(raw: u8) -> Self {
        if raw == Self::STANDARD {
            VisualKind::Standard
        } else if raw == Self::SINGLE_MORPH {
            VisualKind::SingleMorph
        } else {
            VisualKind::Unknown(raw)
        }
    }
}

/// Variant payload of a mesh record.
///
/// `None` covers every kind/visual-kind combination without renderable data:
/// dummies, unknown tags, and future variants. Such meshes are valid nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeshPayload {
    Standard(StandardMesh),
    /// The nested standard mesh supplying a single-morph visual's geometry.
    SingleMorph(StandardMesh),
    None,
}

impl MeshPayload {
    /// The standard mesh body carrying this payload's geometry, if any.
    pub fn standard_body(&self) -> Option<&StandardMesh> {
        match self {
            MeshPayload::Standard(body) | MeshPayload::SingleMorph(body) => Some(body),
            MeshPayload::None => None,
        }
    }
}

/// Body shared by standard and single-morph payloads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardMesh {
    /// Instanced meshes share geometry with another record and generate none
    /// of their own.
    pub instanced: bool,
    /// Detail levels, highest first. Only `lods[0]` is consumed today.
    pub lods: Vec<Lod>,
}

/// One detail level: a vertex buffer plus material-partitioned face groups.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lod {
    pub vertices: Vec<Vertex>,
    pub face_groups: Vec<FaceGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// As stored in the container; the assembler flips the vertical axis.
    pub uv: [f32; 2],
}

/// A partition of a LOD's triangles sharing one material reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceGroup {
    /// 1-based index into the material table; 0 = unmapped.
    pub material_ref: u16,
    /// Triangle index triples into the owning LOD's vertex buffer.
    pub faces: Vec<[u16; 3]>,
}

/// Material flag bits, as stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialFlags(pub u32);

impl MaterialFlags {
    pub const COLORKEY: u32 = 0x2000_0000;
    pub const TEXTURE_DIFFUSE: u32 = 0x0004_0000;
    pub const ANIMATED_TEXTURE_DIFFUSE: u32 = 0x0400_0000;
    pub const ANIMATED_TEXTURE_ALPHA: u32 = 0x0200_0000;

    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits != 0
    }
}

/// One material record from the container's material table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub flags: MaterialFlags,
    /// 1.0 = fully opaque.
    pub transparency: f32,
    /// Number of animated-texture frames; 0 when not animated.
    pub anim_sequence_length: u32,
    /// Delay between animated-texture frames.
    pub frame_period: Duration,
    pub diffuse_map_name: Option<String>,
    pub alpha_map_name: Option<String>,
}

impl Material {
    /// A designated color is treated as fully transparent (cutout).
    pub fn is_color_keyed(&self) -> bool {
        self.flags.contains(MaterialFlags::COLORKEY)
    }

    /// The diffuse map is the material's image source.
    pub fn has_diffuse_texture(&self) -> bool {
        self.flags.contains(MaterialFlags::TEXTURE_DIFFUSE)
    }

    /// Either animated-texture flag is set.
    pub fn is_animated(&self) -> bool {
        self.flags
            .contains(MaterialFlags::ANIMATED_TEXTURE_DIFFUSE | MaterialFlags::ANIMATED_TEXTURE_ALPHA)
    }
}
