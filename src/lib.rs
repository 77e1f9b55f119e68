//! # figstore
//!
//! Provenance-tracking configuration store that aggregates values from
//! command-line arguments, environment variables and INI, JSON, XML and TOML
//! text.
//!
//! ## Overview
//!
//! A [`FigStore`](core::FigStore) maps each key to the full, append-only
//! history of values it has held, together with the source that produced each
//! one. Consumers read the current value; operators can audit the chain.
//!
//! - **One call, ordered sources**: within a single `load`, the first source
//!   to produce a key wins (e.g. CLI over environment over file defaults)
//! - **Later calls override**: a later `load` or `set` always becomes the
//!   current value, while earlier values stay in the history
//! - **No partial loads**: sources are drained before the store is locked; any
//!   error aborts the whole call
//! - **Thread-safe**: one internal lock, never held during source I/O
//!
//! ## Quick Start
//!
//! ```rust
//! use figstore::prelude::*;
//!
//! # fn main() -> figstore::error::Result<()> {
//! let store = FigStore::new();
//!
//! let cli = ArgsSource::new(["--port=9090"]);
//! let env = EnvSource::new([("APP_PORT", "8080"), ("APP_HOST", "0.0.0.0")])
//!     .with_prefix("APP_")
//!     .remap_keys(|k| k.to_lowercase());
//! let defaults = StructuredSource::json(r#"{"port": 80, "host": "localhost", "workers": 4}"#)?;
//!
//! store.load(&[&cli, &env, &defaults])?;
//!
//! assert_eq!(store.get("port")?.as_str(), Some("9090"));
//! assert_eq!(store.get("host")?.as_str(), Some("0.0.0.0"));
//! assert_eq!(store.get("workers")?.as_str(), Some("4"));
//!
//! // Runtime tweak: a later call always wins
//! store.set("workers", 8);
//! assert_eq!(store.history("workers").len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `toml` (default): TOML documents via the `toml` crate

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod parse;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Fig, FigStore, Loader, SourceId, Table, Value};
    pub use crate::error::{ConfigError, ParseErrorKind, Result};
    pub use crate::sources::{
        ArgsSource, EnvSource, Filter, Format, IniSource, MemorySource, Remap, Rename, Source,
        SourceExt, StructuredSource,
    };
}
