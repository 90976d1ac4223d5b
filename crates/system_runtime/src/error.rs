use std::path::PathBuf;

/// Errors produced while loading and driving dynamic systems.
///
/// Load-time variants leave no partial state behind: by the time one is
/// returned the library it refers to has already been closed.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// The path does not resolve to a loadable library.
    #[error("Failed to load module {}: {reason}", path.display())]
    ModuleLoad { path: PathBuf, reason: String },

    /// A required contract symbol is not exported by the library.
    #[error("Module {} does not export required symbol `{symbol}`", path.display())]
    SymbolResolution { path: PathBuf, symbol: &'static str },

    /// `CreateInstance` returned a null instance.
    #[error("CreateInstance in {} returned a null instance", path.display())]
    Instantiation { path: PathBuf },

    /// A system's `initialize` reported failure.
    #[error("System {name} failed to initialize")]
    InitializationFailed { name: String },

    /// No loaded system has the requested name.
    #[error("System not found: {0}")]
    NotFound(String),

    /// A system directory could not be scanned.
    #[error("Failed to read system directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
