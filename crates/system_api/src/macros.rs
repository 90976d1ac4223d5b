/// Export the contract symbols for a system type.
///
/// Generates the two C-linkage functions the engine resolves after opening
/// the library:
///
/// - `CreateInstance()` constructs the type through [`Default`] and returns
///   it as a [`RawSystem`](crate::RawSystem). If construction panics the
///   panic is caught at the boundary and a null pointer is returned, which
///   the host reports as an instantiation failure.
/// - `DestroyInstance(instance)` frees an instance returned by
///   `CreateInstance` of this library.
///
/// Call it exactly once per `cdylib`:
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct PhysicsSystem { /* ... */ }
///
/// impl system_api::System for PhysicsSystem { /* ... */ }
///
/// system_api::export_system!(PhysicsSystem);
/// ```
#[macro_export]
macro_rules! export_system {
    ($system_type:ty) => {
        /// Contract entry point: allocate a new system instance.
        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn CreateInstance() -> *mut $crate::RawSystem {
            match ::std::panic::catch_unwind(|| {
                <$system_type as ::std::default::Default>::default()
            }) {
                Ok(system) => $crate::RawSystem::new_boxed(system),
                Err(_) => {
                    eprintln!(
                        "{}: system construction panicked",
                        ::std::stringify!($system_type)
                    );
                    ::std::ptr::null_mut()
                }
            }
        }

        /// Contract entry point: free an instance created by `CreateInstance`.
        ///
        /// # Safety
        ///
        /// `instance` must come from this library's `CreateInstance` and must
        /// not have been destroyed already.
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn DestroyInstance(instance: *mut $crate::RawSystem) {
            $crate::RawSystem::destroy_boxed::<$system_type>(instance);
        }
    };
}
