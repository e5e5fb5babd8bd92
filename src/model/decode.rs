//! Decoder for the 4DS model container.
//!
//! Layout (all little-endian): a mesh count followed by that many mesh
//! records, then a material count followed by that many material records.
//! Each mesh record carries a payload byte length, making it
//! self-delimiting: records with unrecognized kind/visual-kind tags decode
//! their common header and skip the payload window without desynchronizing
//! the stream. Bytes after the material table are ignored.

use std::time::Duration;

use winnow::Parser;
use winnow::binary::{le_f32, le_u16, le_u32, u8};
use winnow::combinator::repeat;
use winnow::error::{ContextError, ErrMode};
use winnow::token::take;

use crate::data::parser_utils::{WResult, parse_pstr, parse_quat, parse_uv, parse_vec3};
use crate::error::{Error, IResult};
use crate::model::{
    FaceGroup, Lod, Material, MaterialFlags, Mesh, MeshKind, MeshPayload, Model, StandardMesh,
    Vertex, VisualKind,
};

fn eod(end: usize, remaining: usize, context: &'static str) -> Error {
    Error::UnexpectedEndOfData {
        offset: end - remaining,
        context,
    }
}

/// Decode a whole container into a [`Model`].
///
/// Pure function of the byte stream: decoding the same bytes twice yields
/// structurally identical models. Truncation or corruption aborts the whole
/// decode; no partial `Model` is returned.
pub fn decode_model(data: &[u8]) -> IResult<Model> {
    let input = &mut &data[..];
    let end = data.len();

    let mesh_count = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh count"))?;
    let mut meshes = Vec::with_capacity(mesh_count as usize);
    for _ in 0..mesh_count {
        meshes.push(decode_mesh(input, end)?);
    }

    let material_count = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "material count"))?;
    let mut materials = Vec::with_capacity(material_count as usize);
    for _ in 0..material_count {
        materials.push(decode_material(input, end)?);
    }

    Ok(Model { meshes, materials })
}

/// Decode one mesh record: common header, then a variant payload selected by
/// the kind/visual-kind tags. Unrecognized tag combinations keep the header
/// (the node still participates in hierarchy reconstruction) and skip the
/// payload window.
fn decode_mesh(input: &mut &[u8], end: usize) -> IResult<Mesh> {
    let name = parse_pstr(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh name"))?;
    let parent_ref = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh parent reference"))?;
    let position = parse_vec3(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh position"))?;
    let rotation = parse_quat(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh rotation"))?;
    let scale = parse_vec3(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh scale"))?;
    let kind_raw = u8
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh kind"))?;
    let visual_raw = u8
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh visual kind"))?;
    let payload_len = le_u32
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh payload length"))?;

    let window_start = end - input.len();
    let payload_bytes: &[u8] = take(payload_len as usize)
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "mesh payload"))?;

    let kind = MeshKind::from_raw(kind_raw);
    let visual_kind = VisualKind::from_raw(visual_raw);

    // Trailing bytes inside a known payload window are tolerated; a window
    // too short for its own declared counts is not.
    let payload = match (kind, visual_kind) {
        (MeshKind::Standard, VisualKind::Standard) => {
            MeshPayload::Standard(decode_standard_body(payload_bytes, window_start)?)
        }
        (MeshKind::Standard, VisualKind::SingleMorph) => {
            MeshPayload::SingleMorph(decode_standard_body(payload_bytes, window_start)?)
        }
        _ => MeshPayload::None,
    };

    Ok(Mesh {
        name,
        parent_ref,
        position,
        rotation,
        scale,
        kind,
        visual_kind,
        payload,
    })
}

/// Decode a standard mesh body from its payload window.
///
/// `base` is the window's absolute offset in the file, used for error
/// reporting only.
fn decode_standard_body(window: &[u8], base: usize) -> IResult<StandardMesh> {
    let end = base + window.len();
    let input = &mut &window[..];

    let instanced = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "instancing flag"))?
        != 0;
    let lod_count = u8
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "LOD count"))?;

    let mut lods = Vec::with_capacity(lod_count as usize);
    for _ in 0..lod_count {
        lods.push(decode_lod(input, end)?);
    }

    Ok(StandardMesh { instanced, lods })
}

fn decode_lod(input: &mut &[u8], end: usize) -> IResult<Lod> {
    let vertex_count = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "LOD vertex count"))?;
    let vertices: Vec<_> = repeat(vertex_count as usize, parse_vertex)
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "LOD vertices"))?;

    let group_count = u8
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "face group count"))?;
    let mut face_groups = Vec::with_capacity(group_count as usize);
    for _ in 0..group_count {
        face_groups.push(decode_face_group(input, end, vertices.len())?);
    }

    Ok(Lod {
        vertices,
        face_groups,
    })
}

fn parse_vertex(input: &mut &[u8]) -> WResult<Vertex> {
    let position = parse_vec3(input)?;
    let normal = parse_vec3(input)?;
    let uv = parse_uv(input)?;
    Ok(Vertex {
        position,
        normal,
        uv,
    })
}

fn parse_face(input: &mut &[u8]) -> WResult<[u16; 3]> {
    let a = le_u16.parse_next(input)?;
    let b = le_u16.parse_next(input)?;
    let c = le_u16.parse_next(input)?;
    Ok([a, b, c])
}

fn decode_face_group(input: &mut &[u8], end: usize, vertex_count: usize) -> IResult<FaceGroup> {
    let face_count = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "face count"))?;
    let faces: Vec<[u16; 3]> = repeat(face_count as usize, parse_face)
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "faces"))?;
    let material_ref = le_u16
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "face group material reference"))?;

    // Validate here so the assembler can index the vertex buffer unchecked.
    for face in &faces {
        for &index in face {
            if index as usize >= vertex_count {
                return Err(Error::MalformedRecord {
                    detail: format!("face index {index} out of range for {vertex_count} vertices"),
                });
            }
        }
    }

    Ok(FaceGroup {
        material_ref,
        faces,
    })
}

/// Decode one material record. Animation fields are present only when an
/// animated-texture flag is set; empty map names mean "no map".
fn decode_material(input: &mut &[u8], end: usize) -> IResult<Material> {
    let flags = MaterialFlags(
        le_u32
            .parse_next(input)
            .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "material flags"))?,
    );
    let transparency = le_f32
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "material transparency"))?
        .clamp(0.0, 1.0);

    let (anim_sequence_length, frame_period) = if flags.contains(
        MaterialFlags::ANIMATED_TEXTURE_DIFFUSE | MaterialFlags::ANIMATED_TEXTURE_ALPHA,
    ) {
        let length = le_u32
            .parse_next(input)
            .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "animation sequence length"))?;
        let period_ms = le_u32
            .parse_next(input)
            .map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "animation frame period"))?;
        (length, Duration::from_millis(u64::from(period_ms)))
    } else {
        (0, Duration::ZERO)
    };

    let diffuse = parse_pstr(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "diffuse map name"))?;
    let alpha = parse_pstr(input).map_err(|_: ErrMode<ContextError>| eod(end, input.len(), "alpha map name"))?;

    Ok(Material {
        flags,
        transparency,
        anim_sequence_length,
        frame_period,
        diffuse_map_name: (!diffuse.is_empty()).then_some(diffuse),
        alpha_map_name: (!alpha.is_empty()).then_some(alpha),
    })
}
