//! Test-only helpers for building container byte streams.

use crate::model::{MaterialFlags, MeshKind, VisualKind};

/// Little-endian byte-stream writer mirroring the container grammar.
pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub(crate) fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn pstr(&mut self, s: &str) {
        self.u8(s.len() as u8);
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub(crate) fn vec3(&mut self, v: [f32; 3]) {
        for c in v {
            self.f32(c);
        }
    }

    pub(crate) fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) {
        self.vec3(position);
        self.vec3(normal);
        self.f32(uv[0]);
        self.f32(uv[1]);
    }

    /// Write a full mesh record: common header (identity rotation, unit
    /// scale), payload length, payload bytes.
    pub(crate) fn mesh_header(
        &mut self,
        name: &str,
        parent_ref: u16,
        position: [f32; 3],
        kind: u8,
        visual_kind: u8,
        payload: &[u8],
    ) {
        self.pstr(name);
        self.u16(parent_ref);
        self.vec3(position);
        for c in [0.0, 0.0, 0.0, 1.0] {
            self.f32(c);
        }
        self.vec3([1.0, 1.0, 1.0]);
        self.u8(kind);
        self.u8(visual_kind);
        self.u32(payload.len() as u32);
        self.buf.extend_from_slice(payload);
    }

    /// Build a standard payload: one LOD with a three-vertex triangle (every
    /// vertex gets `uv`) and one face group per material reference.
    pub(crate) fn standard_payload(instanced: bool, uv: [f32; 2], material_refs: &[u16]) -> Vec<u8> {
        let mut w = Writer::new();
        w.u16(instanced as u16);
        w.u8(1); // one LOD
        w.u16(3);
        w.vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], uv);
        w.vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], uv);
        w.vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], uv);
        w.u8(material_refs.len() as u8);
        for &material_ref in material_refs {
            w.u16(1); // one face
            w.u16(0);
            w.u16(1);
            w.u16(2);
            w.u16(material_ref);
        }
        w.into_bytes()
    }
}

/// A three-mesh linear chain: "base" (standard, one-triangle geometry,
/// material 1) <- "arm" (dummy) <- "tip" (unknown kind, skipped payload),
/// plus one diffuse-textured material named `door01.bmp`.
///
/// Mesh `i` sits at position `[i+1, 0, 0]` so transform propagation is
/// observable end to end.
pub(crate) fn chain_model_bytes() -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(3);

    let mut payload = Writer::new();
    payload.u16(0); // not instanced
    payload.u8(1); // one LOD
    payload.u16(3);
    payload.vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.25, 0.5]);
    payload.vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
    payload.vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.75]);
    payload.u8(1); // one face group
    payload.u16(1); // one face
    payload.u16(0);
    payload.u16(1);
    payload.u16(2);
    payload.u16(1); // material ref
    w.mesh_header(
        "base",
        0,
        [1.0, 0.0, 0.0],
        MeshKind::STANDARD,
        VisualKind::STANDARD,
        &payload.into_bytes(),
    );

    w.mesh_header("arm", 1, [2.0, 0.0, 0.0], MeshKind::DUMMY, 0, &[]);
    w.mesh_header("tip", 2, [3.0, 0.0, 0.0], 0x42, 0, &[0xAB; 5]);

    w.u16(1);
    w.u32(MaterialFlags::TEXTURE_DIFFUSE);
    w.f32(1.0);
    w.pstr("door01.bmp");
    w.pstr("");

    w.into_bytes()
}
