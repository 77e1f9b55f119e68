//! Core store types: values, history entries, loading and the store itself.

mod fig;
mod loader;
mod store;
mod value;

pub use fig::{Fig, SourceId};
pub use loader::Loader;
pub use store::FigStore;
pub use value::{Table, Value};
