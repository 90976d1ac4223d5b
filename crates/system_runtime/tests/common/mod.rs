//! In-process stand-ins for system libraries.
//!
//! `InProcessBackend` maps paths to symbol tables of `extern "C"` functions
//! compiled into the test binary and counts open handles. Every contract
//! call and every module close is appended to a per-thread event log so
//! tests can assert on exact ordering.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use system_api::{CreateInstanceFn, DestroyInstanceFn, RawSystem, System};
use system_runtime::{ModuleBackend, CREATE_INSTANCE_SYMBOL, DESTROY_INSTANCE_SYMBOL};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

pub fn record(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

/// Drain the event log.
pub fn take_events() -> Vec<String> {
    EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

/// Compile-time identity of a test system.
pub trait Label: 'static {
    const NAME: &'static str;
    const INIT_OK: bool = true;
}

pub struct Alpha;
pub struct Beta;
pub struct Gamma;
pub struct Faulty;

impl Label for Alpha {
    const NAME: &'static str = "A";
}

impl Label for Beta {
    const NAME: &'static str = "B";
}

impl Label for Gamma {
    const NAME: &'static str = "C";
}

impl Label for Faulty {
    const NAME: &'static str = "Faulty";
    const INIT_OK: bool = false;
}

/// A system that records every call it receives.
pub struct Recorder<L> {
    _label: PhantomData<L>,
}

impl<L: Label> System for Recorder<L> {
    fn name(&self) -> &str {
        L::NAME
    }

    fn initialize(&mut self) -> bool {
        record(format!("init:{}", L::NAME));
        L::INIT_OK
    }

    fn update(&mut self, _delta_time: f64) {
        record(format!("update:{}", L::NAME));
    }

    fn shutdown(&mut self) {
        record(format!("shutdown:{}", L::NAME));
    }
}

pub unsafe extern "C" fn create<L: Label>() -> *mut RawSystem {
    record(format!("create:{}", L::NAME));
    RawSystem::new_boxed(Recorder::<L> {
        _label: PhantomData,
    })
}

pub unsafe extern "C" fn destroy<L: Label>(raw: *mut RawSystem) {
    record(format!("destroy:{}", L::NAME));
    RawSystem::destroy_boxed::<Recorder<L>>(raw);
}

pub unsafe extern "C" fn create_null() -> *mut RawSystem {
    std::ptr::null_mut()
}

pub unsafe extern "C" fn destroy_nothing(_raw: *mut RawSystem) {}

#[derive(Default)]
struct BackendState {
    libraries: HashMap<PathBuf, HashMap<&'static str, usize>>,
    open_handles: usize,
    total_opens: usize,
}

/// Backend whose libraries live inside the test binary.
#[derive(Clone, Default)]
pub struct InProcessBackend {
    state: Rc<RefCell<BackendState>>,
}

impl InProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` openable, exporting exactly `symbols`.
    pub fn register(&self, path: impl Into<PathBuf>, symbols: &[(&'static str, *const c_void)]) {
        let table = symbols
            .iter()
            .map(|(name, address)| (*name, *address as usize))
            .collect();
        self.state.borrow_mut().libraries.insert(path.into(), table);
    }

    /// Register a library exporting the full contract for `L`.
    pub fn register_system<L: Label>(&self, path: impl Into<PathBuf>) {
        self.register(
            path,
            &[
                (CREATE_INSTANCE_SYMBOL, create_address(create::<L>)),
                (DESTROY_INSTANCE_SYMBOL, destroy_address(destroy::<L>)),
            ],
        );
    }

    pub fn open_handles(&self) -> usize {
        self.state.borrow().open_handles
    }

    pub fn total_opens(&self) -> usize {
        self.state.borrow().total_opens
    }
}

pub fn create_address(function: CreateInstanceFn) -> *const c_void {
    function as *const c_void
}

pub fn destroy_address(function: DestroyInstanceFn) -> *const c_void {
    function as *const c_void
}

impl ModuleBackend for InProcessBackend {
    type Library = PathBuf;

    fn open(&self, path: &Path) -> Result<PathBuf, String> {
        let mut state = self.state.borrow_mut();
        if !state.libraries.contains_key(path) {
            return Err(format!(
                "{}: cannot open shared object file: No such file or directory",
                path.display()
            ));
        }
        state.open_handles += 1;
        state.total_opens += 1;
        Ok(path.to_path_buf())
    }

    fn symbol(&self, library: &PathBuf, name: &str) -> Option<*const c_void> {
        let state = self.state.borrow();
        state
            .libraries
            .get(library)?
            .get(name)
            .map(|address| *address as *const c_void)
    }

    fn close(&self, library: PathBuf) {
        self.state.borrow_mut().open_handles -= 1;
        record(format!("close:{}", library.display()));
    }
}
