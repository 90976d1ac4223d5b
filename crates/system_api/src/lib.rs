//! # Itchio2D System API
//!
//! The plugin-facing half of the dynamic system runtime. A *system* is an
//! independently compiled shared library (rendering, physics, AI, ...) that
//! the engine discovers and drives at runtime without knowing its concrete
//! type at build time.
//!
//! A system crate:
//!
//! 1. builds as a `cdylib`,
//! 2. implements [`System`] for one type that also implements [`Default`],
//! 3. calls [`export_system!`] once with that type.
//!
//! The macro emits the two contract symbols the host resolves by name,
//! `CreateInstance` and `DestroyInstance`. Everything the host touches goes
//! through the `#[repr(C)]` types in [`abi`], so no Rust trait-object layout
//! ever crosses the library boundary.
//!
//! ## Example
//!
//! ```rust
//! use system_api::{export_system, System};
//!
//! #[derive(Default)]
//! struct CounterSystem {
//!     ticks: u64,
//! }
//!
//! impl System for CounterSystem {
//!     fn name(&self) -> &str {
//!         "CounterSystem"
//!     }
//!
//!     fn update(&mut self, _delta_time: f64) {
//!         self.ticks += 1;
//!     }
//! }
//!
//! export_system!(CounterSystem);
//! ```

pub mod abi;
mod macros;

pub use abi::{
    CreateInstanceFn, DestroyInstanceFn, RawSystem, SystemVTable, CREATE_INSTANCE_SYMBOL,
    DESTROY_INSTANCE_SYMBOL,
};

/// Capability set every dynamically loaded system implements.
///
/// The host calls these in a fixed order for each instance:
/// `initialize` once, `update` once per frame tick, `shutdown` once, and
/// then the instance is destroyed through the library's `DestroyInstance`.
/// All calls happen on the host's frame thread; implementations do not need
/// to be thread-safe.
pub trait System: 'static {
    /// Stable, non-empty identifier used by the host for lookup.
    ///
    /// Must return the same value for the lifetime of the instance. The host
    /// reads it once right after creation.
    fn name(&self) -> &str;

    /// One-time setup. Returning `false` stops the host's batch
    /// initialization; the only calls a failed instance will still receive
    /// are `shutdown` and destruction.
    fn initialize(&mut self) -> bool {
        true
    }

    /// Advance the system by `delta_time` seconds. May be zero, never
    /// negative.
    fn update(&mut self, delta_time: f64);

    /// Release internal resources before the instance is destroyed.
    fn shutdown(&mut self) {}
}
