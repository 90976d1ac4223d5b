//! Binding a loaded module to the two-function system contract.
//!
//! This is the only place resolved addresses are reinterpreted as function
//! signatures.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use system_api::{
    CreateInstanceFn, DestroyInstanceFn, CREATE_INSTANCE_SYMBOL, DESTROY_INSTANCE_SYMBOL,
};

use crate::backend::ModuleBackend;
use crate::error::SystemError;
use crate::instance::SystemInstance;
use crate::module::DynamicModule;

/// Typed contract functions of one module. Borrowing the module keeps the
/// functions from outliving the handle they came from.
pub(crate) struct Contract<'m> {
    create: CreateInstanceFn,
    destroy: DestroyInstanceFn,
    path: PathBuf,
    _module: PhantomData<&'m ()>,
}

/// Resolve `CreateInstance` and `DestroyInstance` from `module`.
pub(crate) fn bind_contract<B: ModuleBackend>(
    module: &DynamicModule<B>,
) -> Result<Contract<'_>, SystemError> {
    let path = module.path().map(Path::to_path_buf).unwrap_or_default();

    let create = resolve(module, &path, CREATE_INSTANCE_SYMBOL)?;
    let destroy = resolve(module, &path, DESTROY_INSTANCE_SYMBOL)?;

    // SAFETY: both symbols are exported under the contract's names, which
    // the contract defines to have exactly these signatures. A library that
    // exports them with other signatures violates the contract; that cannot
    // be detected at runtime.
    let (create, destroy) = unsafe {
        (
            std::mem::transmute::<*const c_void, CreateInstanceFn>(create),
            std::mem::transmute::<*const c_void, DestroyInstanceFn>(destroy),
        )
    };

    Ok(Contract {
        create,
        destroy,
        path,
        _module: PhantomData,
    })
}

fn resolve<B: ModuleBackend>(
    module: &DynamicModule<B>,
    path: &Path,
    symbol: &'static str,
) -> Result<*const c_void, SystemError> {
    module
        .resolve_symbol(symbol)
        .ok_or_else(|| SystemError::SymbolResolution {
            path: path.to_path_buf(),
            symbol,
        })
}

impl Contract<'_> {
    /// Call `CreateInstance` and bind the result to this module's destroy
    /// function.
    pub(crate) fn instantiate(&self) -> Result<SystemInstance, SystemError> {
        let raw = unsafe { (self.create)() };
        let raw = NonNull::new(raw).ok_or_else(|| SystemError::Instantiation {
            path: self.path.clone(),
        })?;

        // SAFETY: `raw` was just returned by this module's CreateInstance and
        // `destroy` is the same module's DestroyInstance.
        Ok(unsafe { SystemInstance::from_raw(raw, self.destroy) })
    }
}
