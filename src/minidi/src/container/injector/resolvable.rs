use std::sync::Arc;

use crate::bean::Autowired;
use crate::container::injector::{InjectorError, TypedInjector};

/// A dependency shape that can be produced by an injector.
///
/// Both `#[resource]` fields and `#[inject]` constructor arguments are
/// resolved through this trait, so the declared type alone decides how the
/// dependency is looked up:
///
/// - `Arc<C>` and [`Autowired<C>`] require exactly one bean providing `C`;
/// - `Option<Arc<C>>` is `None` when no bean provides `C`, but still fails
///   when several do or when the bean fails to initialize;
/// - `Vec<Arc<C>>` gathers every bean providing `C`, possibly none.
pub trait Resolvable: Sized {
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized;
}

impl<C> Resolvable for Arc<C>
where
    C: ?Sized + 'static,
{
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        injector.resolve_one::<C>()
    }
}

impl<C> Resolvable for Option<Arc<C>>
where
    C: ?Sized + 'static,
{
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        match injector.resolve_one::<C>() {
            Ok(object) => Ok(Some(object)),
            // A missing transitive dependency is still an error.
            Err(InjectorError::BeanNotFound { capability }) if capability.is::<C>() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl<C> Resolvable for Autowired<C>
where
    C: ?Sized + 'static,
{
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        injector.resolve_one::<C>().map(Autowired::wired)
    }
}

impl<C> Resolvable for Vec<Arc<C>>
where
    C: ?Sized + 'static,
{
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        injector.resolve_many::<C>()
    }
}
