//! Configuration source trait.

use crate::core::{SourceId, Value};
use crate::error::Result;

/// A single key/value pair produced by a source.
pub type Pair = (String, Value);

/// Lazy sequence of pairs yielded by [`Source::pairs`].
///
/// Items are `Result`s so that sources which parse while iterating (such as
/// command-line arguments) can report errors mid-stream.
pub type Pairs<'a> = Box<dyn Iterator<Item = Result<Pair>> + 'a>;

/// Trait for configuration sources.
///
/// Implement this trait to feed custom origins (databases, remote services, ...)
/// into a [`FigStore`](crate::core::FigStore). Sources never touch the store
/// directly: a `load` call drains them into a transient map before taking the
/// store lock.
///
/// All built-in sources are restartable: calling `pairs` again yields the
/// same sequence.
pub trait Source: Send + Sync {
    /// Produce this source's key/value pairs in order.
    fn pairs(&self) -> Pairs<'_>;

    /// Provenance tag recorded on every value this source contributes.
    fn id(&self) -> SourceId;
}

impl<S: Source + ?Sized> Source for &S {
    fn pairs(&self) -> Pairs<'_> {
        (**self).pairs()
    }

    fn id(&self) -> SourceId {
        (**self).id()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn pairs(&self) -> Pairs<'_> {
        (**self).pairs()
    }

    fn id(&self) -> SourceId {
        (**self).id()
    }
}
