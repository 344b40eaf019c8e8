use std::error::Error;

use crate::bean::Bean;
use crate::container::injector::{InjectorError, TypedInjector};

/// A [`Bean`] that the context can construct on its own.
///
/// Usually, you don't need to implement the [`Component`] trait manually,
/// because the [`component`] macro derives it from the `impl` block holding
/// the constructor. In case that you really want to write the implementation
/// on your own, take a look at the following code snippet:
///
/// ```rust
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use minidi::prelude::*;
/// # use minidi::bean::Component;
/// #
/// trait Inferior: Send + Sync {
///     fn foo(&self) -> i32;
/// }
///
/// struct SuperiorWithCtor {
///     saved_foo: i32,
/// }
///
/// impl Bean for SuperiorWithCtor {}
///
/// impl Component for SuperiorWithCtor {
///     type Error = Infallible;
///
///     fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
///     where
///         I: TypedInjector + ?Sized,
///     {
///         let inferior: Arc<dyn Inferior> = injector.resolve()?;
///         Ok(Ok(Self { saved_foo: inferior.foo() }))
///     }
/// }
/// ```
///
/// The constructor marked `#[inject]` is an associated function, and the
/// macro only accepts inherent `impl` blocks. Both of these fail to compile:
///
/// ```compile_fail
/// use minidi::prelude::*;
///
/// #[derive(Bean)]
/// struct Counter(i32);
///
/// #[component]
/// impl Counter {
///     #[inject]
///     fn new(&self) -> Self {
///         Self(self.0)
///     }
/// }
/// ```
///
/// ```compile_fail
/// use minidi::prelude::*;
///
/// #[derive(Bean)]
/// struct Counter(i32);
///
/// #[component]
/// impl Default for Counter {
///     fn default() -> Self {
///         Self(0)
///     }
/// }
/// ```
///
/// [`component`]: crate::component
pub trait Component: Bean {
    /// The error occurred in construction after all dependencies are
    /// retrieved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Retrieves the constructor's dependencies from the injector and creates
    /// the bean.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved or the bean
    /// declares several injectable constructors.
    ///
    /// Returns an inner error [`Component::Error`] wrapped in the outer [`Ok`]
    /// if the constructor itself fails.
    fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
    where
        I: TypedInjector + ?Sized;
}
