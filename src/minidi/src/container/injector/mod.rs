mod resolvable;

use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::key::{self, CapabilityKey};

pub use resolvable::Resolvable;

/// A type-erased source of beans.
///
/// Each successful lookup yields a `Box<dyn Any>` holding an `Arc<C>`, where
/// `C` is the capability identified by the key. Prefer the generic methods of
/// [`TypedInjector`], which are available on every [`Injector`].
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    /// Looks up the only bean providing `key`, initializing it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no bean or more than one bean provides `key`, or if
    /// the bean fails to initialize.
    fn dyn_resolve_one(&self, key: &CapabilityKey) -> Result<Box<dyn Any>, InjectorError>;

    /// Looks up every bean providing `key` in registration order, initializing
    /// them if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if any matching bean fails to initialize.
    fn dyn_resolve_many(&self, key: &CapabilityKey) -> Result<Vec<Box<dyn Any>>, InjectorError>;
}

pub trait TypedInjector: Injector {
    fn resolve_one<C>(&self) -> Result<Arc<C>, InjectorError>
    where
        C: ?Sized + 'static,
    {
        let object = self.dyn_resolve_one(&key::of::<C>())?;
        Ok(downcast_view(object))
    }

    fn resolve_many<C>(&self) -> Result<Vec<Arc<C>>, InjectorError>
    where
        C: ?Sized + 'static,
    {
        let objects = self.dyn_resolve_many(&key::of::<C>())?;
        Ok(objects.into_iter().map(downcast_view).collect())
    }

    fn resolve<R>(&self) -> Result<R, InjectorError>
    where
        R: Resolvable,
    {
        R::resolve(self)
    }
}

impl<T> TypedInjector for T where T: Injector {}

impl TypedInjector for dyn Injector + '_ {}

fn downcast_view<C>(object: Box<dyn Any>) -> Arc<C>
where
    C: ?Sized + 'static,
{
    match object.downcast::<Arc<C>>() {
        Ok(view) => *view,
        Err(_) => unreachable!("the object's type should be `Arc<C>`"),
    }
}

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum InjectorError {
    #[snafu(display("the context already holds a bean of type {bean}"))]
    DuplicateBean { bean: &'static str },
    #[snafu(display("bean {bean} uses an unsupported injection directive: {reason}"))]
    Unsupported { bean: &'static str, reason: String },
    #[snafu(display("the requested bean of type {capability} has not been found"))]
    BeanNotFound { capability: CapabilityKey },
    #[snafu(display(
        "ambiguous definition for {capability}, conflicting beans are: {}",
        candidates.join(", ")
    ))]
    AmbiguousBean {
        capability: CapabilityKey,
        candidates: Vec<&'static str>,
    },
    #[snafu(display("bean {bean} declares {count} injectable constructors, expected at most one"))]
    AmbiguousConstructor { bean: &'static str, count: usize },
    #[snafu(display("modifications are not allowed for a frozen injection context"))]
    FrozenRegistry,
    #[snafu(display("could not initialize the bean {bean} which depends on itself somehow"))]
    CyclicDependency { bean: &'static str },
    #[snafu(display("the bean {bean} is unusable since its initialization panicked"))]
    PoisonedBean { bean: &'static str },
    #[snafu(display("could not construct the bean {bean}"))]
    ObjectConstruction {
        bean: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
    #[snafu(display("post-construct hook {hook} of bean {bean} failed"))]
    PostConstruct {
        bean: &'static str,
        hook: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
    #[snafu(display("module {module} fails to configure the context"))]
    ModuleInner {
        module: &'static str,
        source: Box<InjectorError>,
    },
    #[snafu(display("aggregated module errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<InjectorError> },
}

impl InjectorError {
    /// Creates an [`InjectorError::Unsupported`] for bean `bean`.
    pub fn unsupported(bean: &'static str, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            bean,
            reason: reason.into(),
        }
    }

    /// Creates an [`InjectorError::AmbiguousConstructor`] for bean `bean`.
    pub fn ambiguous_constructor(bean: &'static str, count: usize) -> Self {
        Self::AmbiguousConstructor { bean, count }
    }

    /// Creates an [`InjectorError::PostConstruct`] wrapping the hook's error.
    pub fn post_construct<E>(bean: &'static str, hook: &'static str, err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::PostConstruct {
            bean,
            hook,
            source: Arc::from(err.into()),
        }
    }
}

struct AggregatedDisplayer<'a> {
    errors: &'a [InjectorError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [InjectorError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
        }
        Ok(())
    }
}
