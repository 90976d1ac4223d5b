//! Ordered registry of loaded systems and their batch lifecycle.

use std::env::consts::{DLL_EXTENSION, DLL_PREFIX};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, error, info, warn};

use crate::backend::{ModuleBackend, NativeBackend};
use crate::contract::bind_contract;
use crate::error::SystemError;
use crate::instance::SystemInstance;
use crate::module::DynamicModule;

/// Lifecycle state of one registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Created, not yet initialized.
    Loaded,
    /// `initialize` returned true.
    Initialized,
    /// `initialize` returned false.
    Failed,
    /// `shutdown` has run; the entry is waiting to be unloaded.
    ShutDown,
}

/// Snapshot of a loaded system.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub name: String,
    pub path: PathBuf,
    pub state: SystemState,
    pub loaded_at: SystemTime,
}

/// One loaded system: its instance, the module that created it, and the
/// name cached at load time.
///
/// `instance` is declared before `module` so that even an implicit drop
/// destroys the instance while its library is still mapped.
struct RegistryEntry<B: ModuleBackend> {
    instance: SystemInstance,
    module: DynamicModule<B>,
    name: String,
    path: PathBuf,
    state: SystemState,
    loaded_at: SystemTime,
}

impl<B: ModuleBackend> RegistryEntry<B> {
    fn shutdown(&mut self) {
        if self.state != SystemState::ShutDown {
            self.instance.shutdown();
            self.state = SystemState::ShutDown;
            debug!("System {} shut down", self.name);
        }
    }

    /// Shutdown if still pending, destroy the instance, then close the
    /// module. The order is fixed: the destroy function lives in the module.
    fn teardown(mut self) {
        self.shutdown();

        let RegistryEntry {
            instance,
            mut module,
            name,
            ..
        } = self;

        drop(instance);
        module.unload();
        info!("System {} unloaded", name);
    }

    fn info(&self) -> SystemInfo {
        SystemInfo {
            name: self.name.clone(),
            path: self.path.clone(),
            state: self.state,
            loaded_at: self.loaded_at,
        }
    }
}

/// Owns every loaded system in load order and drives their lifecycle.
///
/// A session looks like:
///
/// ```rust,no_run
/// use system_runtime::SystemRegistry;
///
/// let mut systems = SystemRegistry::new();
/// systems.load_system("Systems/librendering.so")?;
/// systems.load_system("Systems/libphysics.so")?;
///
/// if systems.initialize_all() {
///     for _ in 0..60 {
///         systems.update_all(1.0 / 60.0);
///     }
/// }
///
/// systems.shutdown_all();
/// systems.unload_all();
/// # Ok::<(), system_runtime::SystemError>(())
/// ```
///
/// Everything runs on the caller's thread. The registry holds raw instance
/// pointers and is neither `Send` nor `Sync`.
pub struct SystemRegistry<B: ModuleBackend = NativeBackend> {
    backend: B,
    entries: Vec<RegistryEntry<B>>,
}

impl SystemRegistry<NativeBackend> {
    /// Registry backed by the platform loader.
    pub fn new() -> Self {
        Self::with_backend(NativeBackend)
    }
}

impl Default for SystemRegistry<NativeBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ModuleBackend> SystemRegistry<B> {
    /// Creates an empty registry that loads libraries through `backend`.
    ///
    /// # Arguments
    ///
    /// * `backend` - Loading context shared by every module this registry
    ///   opens. Tests pass an in-process backend here; the engine uses
    ///   [`SystemRegistry::new`].
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            entries: Vec::new(),
        }
    }

    /// Load a system library and register its instance.
    ///
    /// Opens the module, resolves `CreateInstance` and `DestroyInstance`,
    /// creates the instance and appends it after every system loaded so
    /// far. Returns the name the system reports.
    ///
    /// # Errors
    ///
    /// - [`SystemError::ModuleLoad`] if the library cannot be opened
    /// - [`SystemError::SymbolResolution`] if either contract symbol is missing
    /// - [`SystemError::Instantiation`] if `CreateInstance` returns null
    ///
    /// On error the registry is unchanged and the module is closed.
    pub fn load_system(&mut self, path: impl AsRef<Path>) -> Result<String, SystemError> {
        let path = path.as_ref();
        info!("Loading system from: {}", path.display());

        // From here on any early return drops `module`, which closes it.
        let mut module = DynamicModule::new(self.backend.clone());
        module.load(path)?;

        let instance = bind_contract(&module)?.instantiate()?;

        let name = instance.name();
        if name.is_empty() {
            warn!("System loaded from {} reports an empty name", path.display());
        }

        self.entries.push(RegistryEntry {
            instance,
            module,
            name: name.clone(),
            path: path.to_path_buf(),
            state: SystemState::Loaded,
            loaded_at: SystemTime::now(),
        });

        info!("Loaded system: {} from {}", name, path.display());
        Ok(name)
    }

    /// Load every system library found directly inside `directory`.
    ///
    /// Candidates are files with the platform's library extension, loaded in
    /// file-name order. A non-empty `whitelist` restricts loading to the
    /// listed file stems (with or without the platform's `lib` prefix).
    /// Individual failures are logged and skipped; a missing directory
    /// loads nothing.
    ///
    /// Returns how many systems were loaded.
    pub fn load_systems_from_directory(
        &mut self,
        directory: impl AsRef<Path>,
        whitelist: &[String],
    ) -> Result<usize, SystemError> {
        let directory = directory.as_ref();

        if !directory.exists() {
            warn!("System directory does not exist: {}", directory.display());
            return Ok(0);
        }

        let read_error = |source| SystemError::Directory {
            path: directory.to_path_buf(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == DLL_EXTENSION) {
                candidates.push(path);
            }
        }
        candidates.sort();

        let mut loaded_count = 0;
        for path in candidates {
            if !is_whitelisted(&path, whitelist) {
                debug!("Skipping system not in whitelist: {}", path.display());
                continue;
            }

            match self.load_system(&path) {
                Ok(_) => loaded_count += 1,
                Err(e) => error!("Failed to load system from {}: {}", path.display(), e),
            }
        }

        info!("Loaded {} systems from {}", loaded_count, directory.display());
        Ok(loaded_count)
    }

    /// Shut down, destroy and unload the first system named `name`.
    ///
    /// Returns `false` without touching the registry if no such system is
    /// loaded.
    pub fn unload_system(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|entry| entry.name == name) {
            Some(index) => {
                info!("Unloading system: {}", name);
                self.entries.remove(index).teardown();
                true
            }
            None => {
                debug!("Unload requested for unknown system: {}", name);
                false
            }
        }
    }

    /// Destroy and unload every system, most recently loaded first.
    ///
    /// Systems that have not been shut down yet are shut down immediately
    /// before their destruction, so every instance sees exactly one
    /// `shutdown` whether or not [`shutdown_all`](Self::shutdown_all) ran
    /// first.
    pub fn unload_all(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        info!("Unloading {} systems", self.entries.len());
        while let Some(entry) = self.entries.pop() {
            entry.teardown();
        }
    }

    /// Initialize systems in load order, stopping at the first failure.
    ///
    /// Systems initialized before the failing one stay initialized; nothing
    /// is rolled back. Already initialized or shut down systems are skipped,
    /// so systems loaded later can be brought up with another call.
    pub fn initialize_all(&mut self) -> bool {
        self.try_initialize_all().is_ok()
    }

    /// [`initialize_all`](Self::initialize_all) reporting which system failed.
    pub fn try_initialize_all(&mut self) -> Result<(), SystemError> {
        for entry in &mut self.entries {
            if matches!(entry.state, SystemState::Initialized | SystemState::ShutDown) {
                continue;
            }

            if entry.instance.initialize() {
                entry.state = SystemState::Initialized;
                info!("System {} initialized", entry.name);
            } else {
                entry.state = SystemState::Failed;
                error!("Failed to initialize system: {}", entry.name);
                return Err(SystemError::InitializationFailed {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Advance every system by `delta_time` seconds, in load order.
    pub fn update_all(&mut self, delta_time: f64) {
        for entry in &mut self.entries {
            entry.instance.update(delta_time);
        }
    }

    /// Shut down every system that has not been shut down yet, in load order.
    pub fn shutdown_all(&mut self) {
        info!("Shutting down {} systems", self.entries.len());
        for entry in &mut self.entries {
            entry.shutdown();
        }
    }

    /// First system loaded under `name`.
    pub fn get_system(&self, name: &str) -> Option<&SystemInstance> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.instance)
    }

    /// Like [`get_system`](Self::get_system), but a missing system is an error.
    pub fn require_system(&self, name: &str) -> Result<&SystemInstance, SystemError> {
        self.get_system(name)
            .ok_or_else(|| SystemError::NotFound(name.to_string()))
    }

    /// Returns `true` if a system reporting `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Lifecycle state of the first system loaded under `name`.
    pub fn state_of(&self, name: &str) -> Option<SystemState> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.state)
    }

    /// Names of all loaded systems, in load order.
    pub fn system_names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Snapshot of every loaded system, in load order.
    ///
    /// # Returns
    ///
    /// One [`SystemInfo`] per entry with its name, library path, lifecycle
    /// state and load time. The snapshot does not track later changes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use system_runtime::SystemRegistry;
    ///
    /// let systems = SystemRegistry::new();
    /// assert!(systems.system_info().is_empty());
    /// assert_eq!(systems.len(), 0);
    /// assert!(!systems.contains("PhysicsSystem"));
    /// ```
    pub fn system_info(&self) -> Vec<SystemInfo> {
        self.entries.iter().map(RegistryEntry::info).collect()
    }

    /// Number of loaded systems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: ModuleBackend> Drop for SystemRegistry<B> {
    fn drop(&mut self) {
        self.unload_all();
    }
}

impl<B: ModuleBackend> fmt::Debug for SystemRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("systems", &self.system_names())
            .finish()
    }
}

fn is_whitelisted(path: &Path, whitelist: &[String]) -> bool {
    if whitelist.is_empty() {
        return true;
    }

    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return false;
    };
    let bare = stem.strip_prefix(DLL_PREFIX).unwrap_or(stem);

    whitelist.iter().any(|allowed| allowed == stem || allowed == bare)
}
