//! Dynamic system runtime for the Itchio2D engine.
//!
//! Loads independently compiled system libraries through the fixed
//! two-function contract defined in [`system_api`], drives them through
//! their lifecycle in load order, and tears them down so that every instance
//! is destroyed by the library that allocated it before that library is
//! closed.
//!
//! - [`DynamicModule`] owns one OS library handle.
//! - [`SystemInstance`] is a created instance bound to its module's destroy
//!   function.
//! - [`SystemRegistry`] owns the ordered set of loaded systems and exposes
//!   the batch operations the engine's frame driver calls.
//! - [`ModuleBackend`] is the explicit loading context; [`NativeBackend`]
//!   talks to the platform loader.

mod backend;
mod contract;
mod error;
mod instance;
mod module;
mod registry;

pub use backend::{ModuleBackend, NativeBackend};
pub use error::SystemError;
pub use instance::SystemInstance;
pub use module::DynamicModule;
pub use registry::{SystemInfo, SystemRegistry, SystemState};

pub use system_api::{CREATE_INSTANCE_SYMBOL, DESTROY_INSTANCE_SYMBOL};
