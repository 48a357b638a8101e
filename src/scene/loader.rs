//! Asynchronous model loading
//!
//! A [`ModelLoader`] produces a [`ModelInfo`] for a URL; [`spawn_load`] runs
//! it on the runtime and publishes the outcome into a [`ModelSlot`] that the
//! frame loop reads synchronously.
//!
//! [`GltfLoader`] reads glTF 2.0 assets, binary (`.glb`) or JSON (`.gltf`),
//! and reports what the scene contains. Mesh and DRACO decoding belong to
//! the rendering engine.

use async_trait::async_trait;
use gltf::Gltf;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::Transform;
use crate::error::LoadError;

/// Extension name of DRACO-compressed primitives
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// What a loaded model contains
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub url: String,
    pub byte_length: usize,
    pub generator: Option<String>,
    pub nodes: usize,
    pub meshes: usize,
    pub materials: usize,
    /// Primitives are DRACO-compressed and need a decoder in the renderer
    pub draco_compressed: bool,
}

/// A model placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub info: ModelInfo,
    pub transform: Transform,
}

/// Completion state of the target model
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded(Model),
    Failed(String),
}

/// Shared slot the load task writes once and the frame loop reads
#[derive(Debug, Clone, Default)]
pub struct ModelSlot {
    state: Arc<RwLock<LoadState>>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), LoadState::Loaded(_))
    }

    /// Current transform of the model, if loaded
    pub fn transform(&self) -> Option<Transform> {
        match &*self.state.read() {
            LoadState::Loaded(model) => Some(model.transform),
            _ => None,
        }
    }

    /// Run `f` against the loaded model; returns `None` while pending or failed
    pub fn with_model_mut<R>(&self, f: impl FnOnce(&mut Model) -> R) -> Option<R> {
        match &mut *self.state.write() {
            LoadState::Loaded(model) => Some(f(model)),
            _ => None,
        }
    }

    pub fn set_loaded(&self, model: Model) {
        *self.state.write() = LoadState::Loaded(model);
    }

    pub fn set_failed(&self, reason: impl Into<String>) {
        *self.state.write() = LoadState::Failed(reason.into());
    }
}

/// Source of model assets
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<ModelInfo, LoadError>;
}

/// Loads glTF assets from the local filesystem
#[derive(Debug, Default, Clone)]
pub struct GltfLoader;

#[async_trait]
impl ModelLoader for GltfLoader {
    async fn load(&self, url: &str) -> Result<ModelInfo, LoadError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path);
        inspect_gltf(url, &bytes)
    }
}

/// Summarize a glTF document, binary or JSON
///
/// Validation is skipped: a file that requires DRACO fails the validator's
/// extension check, but decoding it is the renderer's concern.
pub fn inspect_gltf(url: &str, bytes: &[u8]) -> Result<ModelInfo, LoadError> {
    let gltf = Gltf::from_slice_without_validation(bytes)?;

    let draco_compressed = gltf
        .extensions_used()
        .chain(gltf.extensions_required())
        .any(|ext| ext == DRACO_EXTENSION);

    Ok(ModelInfo {
        url: url.to_string(),
        byte_length: bytes.len(),
        generator: gltf.as_json().asset.generator.clone(),
        nodes: gltf.nodes().len(),
        meshes: gltf.meshes().len(),
        materials: gltf.materials().len(),
        draco_compressed,
    })
}

/// Load `url` in the background and publish the result into `slot`
///
/// On success the model is placed at `initial`. On failure the error is
/// logged and the slot is marked failed; controls then have no effect.
pub fn spawn_load(
    loader: Arc<dyn ModelLoader>,
    url: String,
    slot: ModelSlot,
    initial: Transform,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match loader.load(&url).await {
            Ok(info) => {
                info!(
                    "✅ Model loaded: {} ({} nodes, {} meshes{})",
                    info.url,
                    info.nodes,
                    info.meshes,
                    if info.draco_compressed { ", DRACO" } else { "" }
                );
                slot.set_loaded(Model {
                    info,
                    transform: initial,
                });
            }
            Err(e) => {
                error!("An error happened while loading {}: {}", url, e);
                slot.set_failed(e.to_string());
            }
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use glam::Vec3;

    const GLB_MAGIC: u32 = 0x4654_6C67;
    const CHUNK_JSON: u32 = 0x4E4F_534A;

    /// Build a GLB container around a JSON document
    pub(crate) fn make_glb(json: &str) -> Vec<u8> {
        let mut chunk = json.as_bytes().to_vec();
        while chunk.len() % 4 != 0 {
            chunk.push(b' ');
        }
        let total = 12 + 8 + chunk.len();

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&chunk);
        out
    }

    const SNOWMAN_JSON: &str = r#"{
        "asset": {"version": "2.0", "generator": "Sketchfab-12.66.0"},
        "extensionsUsed": ["KHR_draco_mesh_compression"],
        "extensionsRequired": ["KHR_draco_mesh_compression"],
        "nodes": [{}, {}, {}],
        "meshes": [{"primitives": []}],
        "materials": [{}, {}]
    }"#;

    #[test]
    fn test_inspect_binary_gltf() {
        let bytes = make_glb(SNOWMAN_JSON);
        let info = inspect_gltf("snowman.glb", &bytes).unwrap();
        assert_eq!(info.nodes, 3);
        assert_eq!(info.meshes, 1);
        assert_eq!(info.materials, 2);
        assert!(info.draco_compressed);
        assert_eq!(info.generator.as_deref(), Some("Sketchfab-12.66.0"));
        assert_eq!(info.byte_length, bytes.len());
    }

    #[test]
    fn test_inspect_json_gltf() {
        let info = inspect_gltf("snowman.gltf", SNOWMAN_JSON.as_bytes()).unwrap();
        assert_eq!(info.nodes, 3);
        assert_eq!(info.meshes, 1);
        assert_eq!(info.materials, 2);
        assert!(info.draco_compressed);
    }

    #[test]
    fn test_inspect_without_draco() {
        let info = inspect_gltf("box.glb", &make_glb(r#"{"asset":{"version":"2.0"}}"#)).unwrap();
        assert!(!info.draco_compressed);
        assert_eq!(info.nodes, 0);
        assert!(info.generator.is_none());
    }

    #[test]
    fn test_corrupt_container_rejected() {
        let bytes = make_glb(SNOWMAN_JSON);
        let cut = &bytes[..bytes.len() - 8];
        assert!(matches!(inspect_gltf("x", cut), Err(LoadError::Gltf(_))));

        let mut wrong_version = make_glb(SNOWMAN_JSON);
        wrong_version[4] = 1;
        assert!(matches!(inspect_gltf("x", &wrong_version), Err(LoadError::Gltf(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(inspect_gltf("x", b"{not json"), Err(LoadError::Gltf(_))));
        assert!(matches!(
            inspect_gltf("x", &make_glb("{not json")),
            Err(LoadError::Gltf(_))
        ));
    }

    #[tokio::test]
    async fn test_bundled_default_model_loads() {
        let url = crate::config::ModelConfig::default().url;
        let info = GltfLoader.load(&url).await.unwrap();
        assert_eq!(info.nodes, 4);
        assert_eq!(info.meshes, 2);
        assert_eq!(info.materials, 2);
        assert!(!info.draco_compressed);
    }

    #[test]
    fn test_slot_ignores_mutation_until_loaded() {
        let slot = ModelSlot::new();
        assert_eq!(slot.state(), LoadState::Pending);
        assert!(slot.with_model_mut(|m| m.transform.scale = 5.0).is_none());

        slot.set_failed("boom");
        assert!(slot.with_model_mut(|m| m.transform.scale = 5.0).is_none());
        assert_eq!(slot.state(), LoadState::Failed("boom".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_load_publishes_model() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snowman.glb");
        std::fs::write(&path, make_glb(SNOWMAN_JSON)).unwrap();

        let slot = ModelSlot::new();
        let initial = Transform::new(Vec3::new(0.0, 0.5, -1.0), 1.0);
        spawn_load(
            Arc::new(GltfLoader),
            path.to_string_lossy().to_string(),
            slot.clone(),
            initial,
        )
        .await
        .unwrap();

        assert!(slot.is_loaded());
        assert_eq!(slot.transform(), Some(initial));
    }

    #[tokio::test]
    async fn test_spawn_load_failure_marks_slot() {
        let slot = ModelSlot::new();
        spawn_load(
            Arc::new(GltfLoader),
            "/nonexistent/model.glb".to_string(),
            slot.clone(),
            Transform::default(),
        )
        .await
        .unwrap();

        assert!(matches!(slot.state(), LoadState::Failed(_)));
        assert!(slot.transform().is_none());
    }
}
