//! Process-scoped library loading context.
//!
//! Opening a shared library and resolving symbols is process-global OS
//! state. Instead of reaching for it ambiently, every [`DynamicModule`] and
//! [`SystemRegistry`] is handed a backend value that performs those
//! operations. The engine uses [`NativeBackend`]; tests inject an in-process
//! backend that counts open handles.
//!
//! [`DynamicModule`]: crate::DynamicModule
//! [`SystemRegistry`]: crate::SystemRegistry

use std::ffi::c_void;
use std::path::Path;

use libloading::Library;
use tracing::warn;

/// Opens libraries, resolves symbols and releases handles.
pub trait ModuleBackend: Clone {
    /// An open library handle.
    type Library;

    /// Open the library at `path`, returning the OS diagnostic on failure.
    fn open(&self, path: &Path) -> Result<Self::Library, String>;

    /// Address of the exported symbol `name`, or `None` if it is absent.
    fn symbol(&self, library: &Self::Library, name: &str) -> Option<*const c_void>;

    /// Release a handle returned by [`ModuleBackend::open`].
    fn close(&self, library: Self::Library);
}

/// Backend over the platform loader (`dlopen` / `LoadLibrary`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl ModuleBackend for NativeBackend {
    type Library = Library;

    fn open(&self, path: &Path) -> Result<Library, String> {
        // Library initialisers run here; a system library is trusted code.
        unsafe { Library::new(path) }.map_err(|e| e.to_string())
    }

    fn symbol(&self, library: &Library, name: &str) -> Option<*const c_void> {
        // Requesting the symbol as a data pointer yields its raw address
        // without committing to a function signature.
        let symbol = unsafe { library.get::<*const c_void>(name.as_bytes()) }.ok()?;
        let address = *symbol;
        (!address.is_null()).then_some(address)
    }

    fn close(&self, library: Library) {
        if let Err(e) = library.close() {
            warn!("Failed to close module: {}", e);
        }
    }
}
