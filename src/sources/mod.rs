//! Configuration source implementations.

mod args;
mod config_source;
mod env;
mod ini;
mod memory;
mod structured;
mod transform;

pub use args::ArgsSource;
pub use config_source::{Pair, Pairs, Source};
pub use env::EnvSource;
pub use ini::IniSource;
pub use memory::MemorySource;
pub use structured::{Format, StructuredSource};
pub use transform::{Filter, Remap, Rename, SourceExt};
