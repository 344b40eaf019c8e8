pub mod injector;
pub mod registry;

mod core;
mod handle;
mod holder;
mod index;

use crate::util::any::AsAny;

pub use handle::Context;

/// Anything a context can store.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}
