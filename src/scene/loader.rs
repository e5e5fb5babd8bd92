//! The high-level loading pipeline and its collaborator boundaries.
//!
//! [`SceneLoader`] runs the whole pipeline for one logical path: cache
//! lookup, byte-source read, container decode, scene build, cache insert.
//! The pipeline is synchronous and single-threaded end to end; the byte
//! source is opened, fully consumed, and released on every exit path.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;

use rootcause::Report;
use tracing::debug;
use vfs::VfsPath;

use crate::Rc;
use crate::error::Error;
use crate::model::decode::decode_model;

use super::material::TextureRef;
use super::{Scene, build_scene};

/// Directory under the VFS root where texture maps live.
pub const MAPS_DIR: &str = "maps";

/// Image-decode collaborator boundary.
///
/// `color_key` must be passed explicitly on every call for color-keyed
/// materials; there is no ambient toggle. Returning `None` is an accepted
/// outcome: the material renders untextured.
pub trait TextureSource {
    fn load(&self, path: &str, color_key: bool) -> Option<TextureRef>;
}

/// Texture source that probes for file existence under a VFS root.
///
/// Pixel decoding stays outside this crate; the renderer decodes the
/// referenced images itself, honoring each reference's `color_key` flag.
pub struct VfsTextureSource {
    root: VfsPath,
}

impl VfsTextureSource {
    pub fn new(root: &VfsPath) -> Self {
        Self { root: root.clone() }
    }
}

impl TextureSource for VfsTextureSource {
    fn load(&self, path: &str, color_key: bool) -> Option<TextureRef> {
        let file = self.root.join(path).ok()?;
        if file.exists().ok()? {
            Some(TextureRef {
                path: path.to_string(),
                color_key,
            })
        } else {
            None
        }
    }
}

/// Cache collaborator: at most one built scene per distinct logical path.
///
/// Populated on first build, invalidated by the caller, never implicit. A
/// hit short-circuits the entire pipeline and returns the previously built
/// scene unchanged.
pub trait SceneCache {
    fn get(&self, path: &str) -> Option<Rc<Scene>>;
    fn put(&self, path: &str, scene: Rc<Scene>);
}

/// In-memory cache with no eviction.
#[derive(Default)]
pub struct MemorySceneCache {
    entries: Mutex<HashMap<String, Rc<Scene>>>,
}

impl SceneCache for MemorySceneCache {
    fn get(&self, path: &str) -> Option<Rc<Scene>> {
        self.entries
            .lock()
            .expect("scene cache lock poisoned")
            .get(path)
            .cloned()
    }

    fn put(&self, path: &str, scene: Rc<Scene>) {
        self.entries
            .lock()
            .expect("scene cache lock poisoned")
            .insert(path.to_string(), scene);
    }
}

/// The decode-and-reconstruct pipeline, bound to one VFS root.
pub struct SceneLoader<T = VfsTextureSource> {
    vfs: VfsPath,
    textures: T,
}

impl SceneLoader<VfsTextureSource> {
    /// Loader resolving both models and textures against `vfs`.
    pub fn new(vfs: &VfsPath) -> Self {
        Self {
            vfs: vfs.clone(),
            textures: VfsTextureSource::new(vfs),
        }
    }
}

impl<T: TextureSource> SceneLoader<T> {
    /// Loader with a custom texture source.
    pub fn with_texture_source(vfs: &VfsPath, textures: T) -> Self {
        Self {
            vfs: vfs.clone(),
            textures,
        }
    }

    /// Load the scene for a logical model path, or fetch it from the cache.
    ///
    /// Structural failures (unavailable source, truncated or corrupt stream,
    /// malformed hierarchy) abort the whole call; asset-level gaps are
    /// absorbed during material resolution. Failed paths are not cached and
    /// not retried here.
    pub fn load_scene(&self, path: &str, cache: &impl SceneCache) -> Result<Rc<Scene>, Report<Error>> {
        if let Some(scene) = cache.get(path) {
            debug!(path, "scene cache hit");
            return Ok(scene);
        }

        let bytes = self.read_source(path)?;
        let model = decode_model(&bytes)?;
        debug!(
            path,
            meshes = model.meshes.len(),
            materials = model.materials.len(),
            "decoded model"
        );
        let scene = Rc::new(build_scene(&model, &self.textures)?);
        cache.put(path, Rc::clone(&scene));
        Ok(scene)
    }

    fn read_source(&self, path: &str) -> Result<Vec<u8>, Error> {
        let unavailable = |detail: String| Error::SourceUnavailable {
            path: path.to_string(),
            detail,
        };
        let file = self.vfs.join(path).map_err(|e| unavailable(e.to_string()))?;
        let mut bytes = Vec::new();
        file.open_file()
            .map_err(|e| unavailable(e.to_string()))?
            .read_to_end(&mut bytes)
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(bytes)
    }
}
