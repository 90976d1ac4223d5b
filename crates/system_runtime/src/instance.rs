use std::ffi::CStr;
use std::fmt;
use std::ptr::NonNull;

use system_api::{DestroyInstanceFn, RawSystem};

/// A live system instance paired with the destroy function of the module
/// that created it.
///
/// Dropping the instance calls that destroy function. The owning module
/// must still be loaded at that point, which the registry guarantees by
/// dropping the instance before unloading the module.
pub struct SystemInstance {
    raw: NonNull<RawSystem>,
    destroy: DestroyInstanceFn,
}

impl SystemInstance {
    /// # Safety
    ///
    /// `raw` must be a live instance returned by the `CreateInstance` of the
    /// module that also exported `destroy`, and ownership of it must pass to
    /// the returned value.
    pub(crate) unsafe fn from_raw(raw: NonNull<RawSystem>, destroy: DestroyInstanceFn) -> Self {
        Self { raw, destroy }
    }

    /// The name the system reports for itself.
    pub fn name(&self) -> String {
        unsafe {
            let raw = self.raw.as_ref();
            let name = ((*raw.vtable).name)(raw.state);
            if name.is_null() {
                return String::new();
            }
            CStr::from_ptr(name).to_string_lossy().into_owned()
        }
    }

    pub(crate) fn initialize(&mut self) -> bool {
        unsafe {
            let raw = self.raw.as_ref();
            ((*raw.vtable).initialize)(raw.state)
        }
    }

    pub(crate) fn update(&mut self, delta_time: f64) {
        unsafe {
            let raw = self.raw.as_ref();
            ((*raw.vtable).update)(raw.state, delta_time);
        }
    }

    pub(crate) fn shutdown(&mut self) {
        unsafe {
            let raw = self.raw.as_ref();
            ((*raw.vtable).shutdown)(raw.state);
        }
    }
}

impl Drop for SystemInstance {
    fn drop(&mut self) {
        unsafe { (self.destroy)(self.raw.as_ptr()) };
    }
}

impl fmt::Debug for SystemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemInstance")
            .field("name", &self.name())
            .field("raw", &self.raw)
            .finish()
    }
}
