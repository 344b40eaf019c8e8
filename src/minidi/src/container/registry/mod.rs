use crate::bean::{Bean, Component};
use crate::container::injector::InjectorError;

/// The mutating side of a context: adding beans and sealing the registry.
pub trait Registry: Send + Sync {
    /// Adds an already created bean. Its dependencies are injected lazily,
    /// when it's first resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is frozen or already holds a bean of
    /// type `T`.
    fn register_instance<T>(&self, bean: T) -> Result<(), InjectorError>
    where
        T: Bean;

    /// Constructs a bean of type `T` right away, resolving its constructor
    /// arguments from the registry, and adds it.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is frozen, a constructor argument
    /// can't be resolved, the constructor fails or a bean of type `T` is
    /// already registered.
    ///
    /// Only concrete types can be constructed, so a trait object is rejected
    /// at compile time:
    ///
    /// ```compile_fail
    /// use minidi::prelude::*;
    ///
    /// trait Inferior: Send + Sync {}
    ///
    /// let context = Context::new();
    /// context.register_class::<dyn Inferior>().unwrap();
    /// ```
    fn register_class<T>(&self) -> Result<(), InjectorError>
    where
        T: Component;

    /// Rejects every later registration. Freezing twice is harmless.
    fn freeze(&self);

    fn is_frozen(&self) -> bool;
}
