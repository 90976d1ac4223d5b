//! Asset cache for the active game type.
//!
//! Assets are addressed by name and loaded relative to the cache's
//! directory. A JSON manifest lists the assets a game type preloads:
//!
//! ```json
//! { "assets": [ { "name": "player", "path": "Textures/player.png", "kind": "texture" } ] }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Sound,
    Font,
    Shader,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unsupported asset kind {kind:?} for '{name}'")]
    Unsupported { name: String, kind: AssetKind },
    #[error("failed to read asset '{name}' from {path}: {source}")]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub kind: AssetKind,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    assets: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    path: String,
    kind: AssetKind,
}

#[derive(Debug, Default)]
pub struct AssetCache {
    directory: PathBuf,
    assets: HashMap<String, Asset>,
}

impl AssetCache {
    /// Empty cache rooted at the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory relative asset paths are resolved against.
    ///
    /// Already cached assets are kept.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
        debug!("Asset directory set to {}", self.directory.display());
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Loads `relative_path` under the asset directory and caches it as
    /// `name`, replacing any asset already cached under that name.
    ///
    /// # Arguments
    ///
    /// * `name` - Key the asset is cached under
    /// * `relative_path` - File path relative to the asset directory
    /// * `kind` - Only textures and sounds are loadable
    ///
    /// # Errors
    ///
    /// [`AssetError::Unsupported`] for other kinds, [`AssetError::Io`] if the
    /// file cannot be read.
    pub fn load_asset(
        &mut self,
        name: &str,
        relative_path: &str,
        kind: AssetKind,
    ) -> Result<&Asset, AssetError> {
        if !matches!(kind, AssetKind::Texture | AssetKind::Sound) {
            return Err(AssetError::Unsupported {
                name: name.to_string(),
                kind,
            });
        }

        let path = self.directory.join(relative_path);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;

        debug!("Loaded {:?} '{}' ({} bytes)", kind, name, bytes.len());
        let asset = Asset { kind, path, bytes };
        self.assets.insert(name.to_string(), asset);
        Ok(&self.assets[name])
    }

    /// Cached asset registered as `name`.
    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    /// Drops the asset registered as `name`.
    ///
    /// # Returns
    ///
    /// `true` if an asset was cached under that name.
    pub fn unload(&mut self, name: &str) -> bool {
        self.assets.remove(name).is_some()
    }

    pub fn unload_all(&mut self) {
        if !self.assets.is_empty() {
            debug!("Unloading {} assets", self.assets.len());
        }
        self.assets.clear();
    }

    /// Loads every asset listed in the manifest at `path`.
    ///
    /// A missing manifest loads nothing. Entries that fail to load are
    /// logged and skipped; the return value counts the ones that loaded.
    pub fn load_manifest(&mut self, path: &Path) -> Result<usize, AssetError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("⚠️ Asset manifest not found: {}", path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(AssetError::Io {
                    name: "manifest".to_string(),
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| AssetError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;

        let mut loaded = 0;
        for entry in &manifest.assets {
            match self.load_asset(&entry.name, &entry.path, entry.kind) {
                Ok(_) => loaded += 1,
                Err(e) => warn!("⚠️ Skipping asset: {}", e),
            }
        }

        info!(
            "📦 Loaded {}/{} assets from {}",
            loaded,
            manifest.assets.len(),
            path.display()
        );
        Ok(loaded)
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn asset_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Textures")).unwrap();
        std::fs::write(dir.path().join("Textures/player.png"), b"\x89PNG").unwrap();
        std::fs::write(dir.path().join("jump.wav"), b"RIFF").unwrap();
        dir
    }

    #[test]
    fn test_load_get_unload() {
        let dir = asset_dir();
        let mut cache = AssetCache::new();
        cache.set_directory(dir.path());

        let asset = cache
            .load_asset("player", "Textures/player.png", AssetKind::Texture)
            .unwrap();
        assert_eq!(asset.bytes, b"\x89PNG");
        cache.load_asset("jump", "jump.wav", AssetKind::Sound).unwrap();
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get("jump").unwrap().kind, AssetKind::Sound);
        assert!(cache.unload("jump"));
        assert!(!cache.unload("jump"));
        assert!(cache.get("jump").is_none());

        cache.unload_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file_and_unsupported_kind() {
        let dir = asset_dir();
        let mut cache = AssetCache::new();
        cache.set_directory(dir.path());

        assert!(matches!(
            cache.load_asset("ghost", "missing.png", AssetKind::Texture),
            Err(AssetError::Io { .. })
        ));
        assert!(matches!(
            cache.load_asset("font", "Textures/player.png", AssetKind::Font),
            Err(AssetError::Unsupported { .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_manifest_skips_failures() {
        let dir = asset_dir();
        let manifest = dir.path().join("game_config.json");
        std::fs::write(
            &manifest,
            r#"{
                "assets": [
                    { "name": "player", "path": "Textures/player.png", "kind": "texture" },
                    { "name": "jump", "path": "jump.wav", "kind": "sound" },
                    { "name": "ghost", "path": "missing.wav", "kind": "sound" },
                    { "name": "lit", "path": "lit.hlsl", "kind": "shader" }
                ]
            }"#,
        )
        .unwrap();

        let mut cache = AssetCache::new();
        cache.set_directory(dir.path());

        assert_eq!(cache.load_manifest(&manifest).unwrap(), 2);
        assert!(cache.get("player").is_some());
        assert!(cache.get("ghost").is_none());
    }

    #[test]
    fn test_missing_manifest_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let mut cache = AssetCache::new();
        cache.set_directory(dir.path());

        assert_eq!(
            cache
                .load_manifest(&dir.path().join("Config/game_config.json"))
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("game_config.json");
        std::fs::write(&manifest, "{ not json").unwrap();

        let mut cache = AssetCache::new();
        assert!(matches!(
            cache.load_manifest(&manifest),
            Err(AssetError::Manifest { .. })
        ));
    }
}
