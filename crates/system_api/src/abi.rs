//! Binary contract between the engine and a system library.
//!
//! A loadable library exports exactly two C-linkage functions:
//!
//! - `CreateInstance() -> *mut RawSystem` allocates a new instance. A null
//!   return means instantiation failed.
//! - `DestroyInstance(*mut RawSystem)` frees an instance previously returned
//!   by `CreateInstance` of the *same* library. Passing anything else, or the
//!   same pointer twice, is undefined behaviour.
//!
//! The instance itself is an opaque state pointer paired with a
//! [`SystemVTable`] of `extern "C"` thunks, so the host never depends on the
//! Rust layout of the plugin's types.

use std::ffi::{c_char, c_void, CString};

use crate::System;

/// Exported name of the creation function. Exact match, case-sensitive.
pub const CREATE_INSTANCE_SYMBOL: &str = "CreateInstance";

/// Exported name of the destruction function. Exact match, case-sensitive.
pub const DESTROY_INSTANCE_SYMBOL: &str = "DestroyInstance";

/// Signature of `CreateInstance`.
pub type CreateInstanceFn = unsafe extern "C" fn() -> *mut RawSystem;

/// Signature of `DestroyInstance`.
pub type DestroyInstanceFn = unsafe extern "C" fn(*mut RawSystem);

/// Function table for one concrete system type.
#[repr(C)]
pub struct SystemVTable {
    pub initialize: unsafe extern "C" fn(state: *mut c_void) -> bool,
    pub update: unsafe extern "C" fn(state: *mut c_void, delta_time: f64),
    pub shutdown: unsafe extern "C" fn(state: *mut c_void),
    /// Returns a NUL-terminated name that stays valid until the instance is
    /// destroyed.
    pub name: unsafe extern "C" fn(state: *const c_void) -> *const c_char,
}

/// Opaque instance handle handed across the library boundary.
#[repr(C)]
pub struct RawSystem {
    pub vtable: *const SystemVTable,
    pub state: *mut c_void,
}

/// Plugin-side storage behind `RawSystem::state`.
struct Hosted<T> {
    system: T,
    name: CString,
}

impl RawSystem {
    /// Box `system` and wrap it in a heap-allocated `RawSystem`.
    ///
    /// The returned pointer must be released with
    /// [`RawSystem::destroy_boxed`] using the same `T`, from the same
    /// library that created it.
    pub fn new_boxed<T: System>(system: T) -> *mut RawSystem {
        // Interior NULs cannot be represented; the name degrades to empty.
        let name = CString::new(system.name()).unwrap_or_default();
        let state = Box::into_raw(Box::new(Hosted { system, name })) as *mut c_void;

        Box::into_raw(Box::new(RawSystem {
            vtable: &SystemVTable {
                initialize: initialize_thunk::<T>,
                update: update_thunk::<T>,
                shutdown: shutdown_thunk::<T>,
                name: name_thunk::<T>,
            },
            state,
        }))
    }

    /// Free an instance created by [`RawSystem::new_boxed`]. Null is ignored.
    ///
    /// # Safety
    ///
    /// `raw` must come from `new_boxed::<T>` in this library and must not
    /// have been destroyed already.
    pub unsafe fn destroy_boxed<T: System>(raw: *mut RawSystem) {
        if raw.is_null() {
            return;
        }

        let raw = Box::from_raw(raw);
        drop(Box::from_raw(raw.state as *mut Hosted<T>));
    }
}

unsafe extern "C" fn initialize_thunk<T: System>(state: *mut c_void) -> bool {
    let hosted = &mut *(state as *mut Hosted<T>);
    hosted.system.initialize()
}

unsafe extern "C" fn update_thunk<T: System>(state: *mut c_void, delta_time: f64) {
    let hosted = &mut *(state as *mut Hosted<T>);
    hosted.system.update(delta_time);
}

unsafe extern "C" fn shutdown_thunk<T: System>(state: *mut c_void) {
    let hosted = &mut *(state as *mut Hosted<T>);
    hosted.system.shutdown();
}

unsafe extern "C" fn name_thunk<T: System>(state: *const c_void) -> *const c_char {
    let hosted = &*(state as *const Hosted<T>);
    hosted.name.as_ptr()
}
