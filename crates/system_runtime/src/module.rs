//! Ownership of a single OS-loaded library handle.

use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::backend::{ModuleBackend, NativeBackend};
use crate::error::SystemError;

/// One loaded shared library.
///
/// The handle is either absent (unloaded) or valid (loaded). It is released
/// by [`DynamicModule::unload`] or, at the latest, when the module is
/// dropped, so early returns on a failure path can never leak it.
pub struct DynamicModule<B: ModuleBackend = NativeBackend> {
    backend: B,
    handle: Option<B::Library>,
    path: Option<PathBuf>,
}

impl<B: ModuleBackend> DynamicModule<B> {
    /// Create an unloaded module bound to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handle: None,
            path: None,
        }
    }

    /// Open the library at `path`.
    ///
    /// A module that is already loaded releases its current handle first.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SystemError> {
        let path = path.as_ref();

        if self.handle.is_some() {
            debug!("Module already loaded, releasing it before loading {}", path.display());
            self.unload();
        }

        let library = self
            .backend
            .open(path)
            .map_err(|reason| SystemError::ModuleLoad {
                path: path.to_path_buf(),
                reason,
            })?;

        debug!("Opened module: {}", path.display());
        self.handle = Some(library);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Release the handle if one is held. Safe to call repeatedly.
    pub fn unload(&mut self) {
        if let Some(library) = self.handle.take() {
            self.backend.close(library);
            if let Some(path) = self.path.take() {
                debug!("Closed module: {}", path.display());
            }
        }
    }

    /// Raw address of an exported symbol.
    ///
    /// `None` when the module is not loaded or the symbol is absent. No type
    /// checking happens here; interpreting the address is the caller's
    /// responsibility.
    pub fn resolve_symbol(&self, name: &str) -> Option<*const c_void> {
        let library = self.handle.as_ref()?;
        let address = self.backend.symbol(library, name);
        trace!("Resolved symbol {} -> {:?}", name, address);
        address
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Path of the currently loaded library.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for DynamicModule<NativeBackend> {
    fn default() -> Self {
        Self::new(NativeBackend)
    }
}

impl<B: ModuleBackend> Drop for DynamicModule<B> {
    fn drop(&mut self) {
        self.unload();
    }
}

impl<B: ModuleBackend> fmt::Debug for DynamicModule<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicModule")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
