use std::any::{self, Any};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::debug;

use crate::bean::{Bean, Component};
use crate::container::core::ContextCore;
use crate::container::holder::BeanHolder;
use crate::container::injector::{Injector, InjectorError};
use crate::container::registry::Registry;
use crate::key::CapabilityKey;
use crate::module::Module;

/// A registry of singleton beans that resolves them by capability.
///
/// `Context` is a cheap handle: clones share the same beans. A bean asking for
/// `Arc<Context>` receives a handle to the context it lives in, which is never
/// registered as a bean itself.
///
/// A bean that keeps that handle forms a reference cycle with the context, so
/// neither the context nor any of its beans is ever dropped. Such beans should
/// only live in contexts that last for the whole program.
#[derive(Clone)]
pub struct Context {
    core: Arc<ContextCore>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            core: Arc::new(ContextCore::new()),
        }
    }

    /// Creates a context, lets `module` register its beans and freezes it.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the module, wrapped with the module's
    /// name.
    pub fn init<M>(module: M) -> Result<Self, InjectorError>
    where
        M: Module,
    {
        let context = Self::new();
        debug!(module = any::type_name::<M>(), "initializing context");
        module.setup(&context)?;
        context.freeze();
        debug!(beans = context.len(), "context initialized");
        Ok(context)
    }

    /// Returns the number of registered beans.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for Context {
    fn register_instance<T>(&self, bean: T) -> Result<(), InjectorError>
    where
        T: Bean,
    {
        self.core.register(BeanHolder::new(bean))
    }

    fn register_class<T>(&self) -> Result<(), InjectorError>
    where
        T: Component,
    {
        self.core.ensure_not_frozen()?;
        let bean = match T::construct(self)? {
            Ok(bean) => bean,
            Err(err) => {
                return Err(InjectorError::ObjectConstruction {
                    bean: any::type_name::<T>(),
                    source: Arc::from(err.into()),
                })
            }
        };
        self.register_instance(bean)
    }

    fn freeze(&self) {
        self.core.freeze();
    }

    fn is_frozen(&self) -> bool {
        self.core.is_frozen()
    }
}

impl Injector for Context {
    fn dyn_resolve_one(&self, key: &CapabilityKey) -> Result<Box<dyn Any>, InjectorError> {
        // The returned handle is strong; see the leak note on `Context`.
        if key.is::<Context>() {
            return Ok(Box::new(Arc::new(self.clone())));
        }
        self.core.resolve_one(key, self)
    }

    fn dyn_resolve_many(&self, key: &CapabilityKey) -> Result<Vec<Box<dyn Any>>, InjectorError> {
        self.core.resolve_many(key, self)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Eq for Context {}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Context")
            .field("beans", &self.len())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
