//! Material resolution into renderer-agnostic descriptions.

use std::time::Duration;

use tracing::warn;

use crate::model::{Material, MaterialFlags};

use super::loader::{MAPS_DIR, TextureSource};

/// How a material's transparency is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    Opaque,
    /// Smooth alpha blending with a uniform tint alpha.
    AlphaBlend,
    /// A designated color is fully transparent. Takes precedence over
    /// blending when both would apply.
    Cutout,
}

/// A resolved texture reference. Pixel decoding happens outside this crate;
/// `color_key` records the flag the image decoder must be called with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureRef {
    pub path: String,
    pub color_key: bool,
}

/// One surviving frame of an animated texture sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationFrame {
    /// Position in the source sequence. Gaps left by unresolvable frames are
    /// preserved; later frames are not renumbered.
    pub index: u32,
    pub texture: TextureRef,
}

/// Animated texture descriptor, driven by an external per-frame ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureAnimation {
    pub frames: Vec<AnimationFrame>,
    pub frame_period: Duration,
}

/// Renderer-agnostic material description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedMaterial {
    pub blend_mode: BlendMode,
    /// At most one image in the base case; `None` renders untextured.
    pub texture: Option<TextureRef>,
    /// Uniform tint alpha, present only when alpha-blending.
    pub tint_alpha: Option<u8>,
    pub animation: Option<TextureAnimation>,
}

/// Resolve one material record against the texture source.
///
/// Missing textures and frames are absorbed here: they are logged and the
/// description simply omits the image, never failing the load.
pub fn resolve_material(material: &Material, textures: &dyn TextureSource) -> ResolvedMaterial {
    let color_key = material.is_color_keyed();

    let blend_mode = if color_key {
        BlendMode::Cutout
    } else if material.transparency < 1.0 {
        BlendMode::AlphaBlend
    } else {
        BlendMode::Opaque
    };

    let map_name = if material.has_diffuse_texture() {
        material.diffuse_map_name.as_deref()
    } else {
        material.alpha_map_name.as_deref()
    };

    let texture = map_name.and_then(|name| {
        let path = format!("{MAPS_DIR}/{name}");
        let resolved = textures.load(&path, color_key);
        if resolved.is_none() {
            warn!(%path, "texture not found; material renders untextured");
        }
        resolved
    });

    let tint_alpha = (blend_mode == BlendMode::AlphaBlend)
        .then(|| (material.transparency * 255.0).round() as u8);

    let animation = if material.is_animated() {
        resolve_animation(material, textures, color_key)
    } else {
        None
    };

    ResolvedMaterial {
        blend_mode,
        texture,
        tint_alpha,
        animation,
    }
}

/// Resolve an animated texture sequence.
///
/// The source map name carries a two-digit frame suffix in its stem; frame
/// `k`'s candidate name is the stem minus those two characters, then `"0"`,
/// then `k`, then the extension (`door01.bmp`, frame 3 -> `door03.bmp`).
/// Frames that don't resolve are skipped without renumbering the rest.
fn resolve_animation(
    material: &Material,
    textures: &dyn TextureSource,
    color_key: bool,
) -> Option<TextureAnimation> {
    let name = if material.flags.contains(MaterialFlags::ANIMATED_TEXTURE_DIFFUSE) {
        material.diffuse_map_name.as_deref()
    } else {
        material.alpha_map_name.as_deref()
    }?;

    let Some((stem, extension)) = name.rsplit_once('.') else {
        warn!(name, "animated map name has no extension; skipping animation");
        return None;
    };
    // Cut before the last two characters of the stem.
    let Some((cut, _)) = stem.char_indices().rev().nth(1) else {
        warn!(name, "animated map stem too short for a frame suffix; skipping animation");
        return None;
    };
    let base = &stem[..cut];

    let mut frames = Vec::new();
    for index in 0..material.anim_sequence_length {
        let path = format!("{MAPS_DIR}/{base}0{index}.{extension}");
        match textures.load(&path, color_key) {
            Some(texture) => frames.push(AnimationFrame { index, texture }),
            None => warn!(%path, "animated texture frame not found; skipping"),
        }
    }

    Some(TextureAnimation {
        frames,
        frame_period: material.frame_period,
    })
}
