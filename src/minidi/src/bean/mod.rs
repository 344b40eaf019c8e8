mod autowired;
mod component;
mod hook;

use std::any::{self, Any};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::injector::{Injector, InjectorError, TypedInjector};
use crate::container::Managed;
use crate::key::{self, CapabilityKey};
use crate::util::any::AsAny;

pub use autowired::Autowired;
pub use component::Component;
pub use hook::HookOutcome;

/// A singleton managed by a [`Context`].
///
/// The trait is the wiring description of a bean: which capabilities it can
/// be looked up by, how its dependencies are injected once it is first
/// resolved, and which hooks run afterwards. Usually it's derived:
///
/// ```rust
/// use minidi::prelude::*;
///
/// trait Inferior: Send + Sync {
///     fn foo(&self) -> i32;
/// }
///
/// trait Superior: Send + Sync {
///     fn bar(&self) -> i32;
/// }
///
/// #[derive(Default, Bean)]
/// #[bean(provides(dyn Inferior))]
/// struct InferiorImpl;
///
/// impl Inferior for InferiorImpl {
///     fn foo(&self) -> i32 {
///         1
///     }
/// }
///
/// #[derive(Default, Bean)]
/// #[bean(provides(dyn Superior))]
/// struct SuperiorImpl {
///     #[resource]
///     inferior: Autowired<dyn Inferior>,
/// }
///
/// impl Superior for SuperiorImpl {
///     fn bar(&self) -> i32 {
///         10 + self.inferior.foo()
///     }
/// }
///
/// let context = Context::new();
/// context.register_instance(SuperiorImpl::default()).unwrap();
/// context.register_instance(InferiorImpl).unwrap();
///
/// let superior = context.resolve_one::<dyn Superior>().unwrap();
/// assert_eq!(superior.bar(), 11);
/// ```
///
/// A post-construct hook takes nothing but `&mut self`, so a hook with
/// parameters is rejected when the derived code is compiled:
///
/// ```compile_fail
/// use minidi::prelude::*;
///
/// #[derive(Default, Bean)]
/// #[bean(post_construct(init))]
/// struct Configured {
///     retries: u32,
/// }
///
/// impl Configured {
///     fn init(&mut self, retries: u32) {
///         self.retries = retries;
///     }
/// }
/// ```
///
/// [`Context`]: crate::container::Context
pub trait Bean: Managed + Sized {
    /// Declares the trait objects this bean can be resolved as. The concrete
    /// type is always a capability and need not be declared.
    fn capabilities(_capabilities: &mut Capabilities<Self>) {}

    /// Resolves the bean's dependencies and stores them in `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved.
    fn inject<I>(&mut self, _injector: &I) -> Result<(), InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        Ok(())
    }

    /// Runs after every dependency has been injected, exactly once per
    /// successful initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if a hook fails.
    fn post_construct(&mut self) -> Result<(), InjectorError> {
        Ok(())
    }
}

/// The capability set of a bean of type `T`.
pub struct Capabilities<T>
where
    T: Bean,
{
    entries: Vec<Capability>,
    _marker: PhantomData<T>,
}

impl<T> Capabilities<T>
where
    T: Bean,
{
    pub(crate) fn collect() -> Self {
        let mut capabilities = Self {
            entries: Vec::new(),
            _marker: PhantomData,
        };
        capabilities.provide::<T>(|this| this);
        T::capabilities(&mut capabilities);
        capabilities
    }

    /// Declares `C` as a capability. `cast` is normally `|this| this`, which
    /// relies on the unsizing coercion from `Arc<T>` to `Arc<C>`.
    pub fn provide<C>(&mut self, cast: fn(Arc<T>) -> Arc<C>) -> &mut Self
    where
        C: ?Sized + 'static,
    {
        let key = key::of::<C>();
        if !self.contains(&key) {
            self.entries.push(Capability::new(key, cast));
        }
        self
    }

    pub fn contains(&self, key: &CapabilityKey) -> bool {
        self.entries.iter().any(|entry| entry.key == *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<Capability> {
        self.entries
    }
}

type Caster = Box<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> + Send + Sync>;

/// A type-erased capability of a registered bean.
pub(crate) struct Capability {
    key: CapabilityKey,
    cast: Caster,
}

impl Capability {
    fn new<T, C>(key: CapabilityKey, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: Bean,
        C: ?Sized + 'static,
    {
        let cast: Caster = Box::new(move |object| {
            object
                .downcast::<T>()
                .ok()
                .map(|this| -> Box<dyn Any> { Box::new(cast(this)) })
        });
        Self { key, cast }
    }

    pub(crate) fn key(&self) -> &CapabilityKey {
        &self.key
    }

    /// Views `object` as this capability, producing a boxed `Arc<C>`. Returns
    /// [`None`] if `object` isn't the bean type the capability belongs to.
    pub(crate) fn view(&self, object: Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> {
        (self.cast)(object)
    }
}

/// The object-safe face of [`Bean`] stored by bean holders.
pub(crate) trait ErasedBean: AsAny + Send + Sync {
    fn dyn_inject(&mut self, injector: &dyn Injector) -> Result<(), InjectorError>;

    fn dyn_post_construct(&mut self) -> Result<(), InjectorError>;
}

impl<T> ErasedBean for T
where
    T: Bean,
{
    fn dyn_inject(&mut self, injector: &dyn Injector) -> Result<(), InjectorError> {
        Bean::inject(self, injector)
    }

    fn dyn_post_construct(&mut self) -> Result<(), InjectorError> {
        Bean::post_construct(self)
    }
}

/// Fails the injection of a `#[resource(mapped_name = "...")]` field, since
/// beans are bound by type only.
///
/// # Errors
///
/// Always returns [`InjectorError::Unsupported`].
pub fn reject_mapped_name<T>(field: &'static str, mapped_name: &'static str) -> Result<(), InjectorError>
where
    T: Bean,
{
    Err(InjectorError::unsupported(
        any::type_name::<T>(),
        format!("field `{field}` requests mapped name `{mapped_name}`, only type-based binding is supported"),
    ))
}
