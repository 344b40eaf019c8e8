use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use snafu::prelude::*;
use tracing::{debug, trace};

use crate::container::holder::BeanHolder;
use crate::container::index::{CapabilityIndex, Lookup};
use crate::container::injector::{
    AmbiguousBeanSnafu, BeanNotFoundSnafu, DuplicateBeanSnafu, FrozenRegistrySnafu, Injector,
    InjectorError,
};
use crate::key::CapabilityKey;

pub struct ContextCore {
    state: RwLock<ContextState>,
}

impl ContextCore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ContextState::new()),
        }
    }

    pub fn register(&self, holder: BeanHolder) -> Result<(), InjectorError> {
        let mut state = self.state.write();
        ensure!(!state.frozen, FrozenRegistrySnafu);
        ensure!(
            !state
                .holders
                .iter()
                .any(|h| h.concrete_type() == holder.concrete_type()),
            DuplicateBeanSnafu {
                bean: holder.bean_name(),
            }
        );

        let bean = holder.bean_name();
        let holder = Arc::new(holder);
        state.index.insert(&holder);
        state.holders.push(holder);
        debug!(bean, total = state.holders.len(), "bean registered");
        Ok(())
    }

    pub fn ensure_not_frozen(&self) -> Result<(), InjectorError> {
        ensure!(!self.is_frozen(), FrozenRegistrySnafu);
        Ok(())
    }

    pub fn freeze(&self) {
        let mut state = self.state.write();
        if !state.frozen {
            state.frozen = true;
            debug!(beans = state.holders.len(), "context frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.state.read().frozen
    }

    pub fn len(&self) -> usize {
        self.state.read().holders.len()
    }

    pub fn resolve_one(
        &self,
        key: &CapabilityKey,
        injector: &dyn Injector,
    ) -> Result<Box<dyn Any>, InjectorError> {
        trace!(capability = %key, "resolving unique bean");
        let holder = self.find_unique_holder(key)?;
        holder.resolve(key, injector)
    }

    pub fn resolve_many(
        &self,
        key: &CapabilityKey,
        injector: &dyn Injector,
    ) -> Result<Vec<Box<dyn Any>>, InjectorError> {
        trace!(capability = %key, "resolving every matching bean");
        let holders = self.find_all_holders(key);
        holders
            .iter()
            .map(|holder| holder.resolve(key, injector))
            .collect()
    }

    fn find_unique_holder(&self, key: &CapabilityKey) -> Result<Arc<BeanHolder>, InjectorError> {
        let state = self.state.read();
        match state.index.lookup(key) {
            Lookup::Unique(holder) => Ok(Arc::clone(holder)),
            Lookup::Absent => BeanNotFoundSnafu { capability: *key }.fail(),
            Lookup::Ambiguous => AmbiguousBeanSnafu {
                capability: *key,
                candidates: state
                    .providers_of(key)
                    .map(|holder| holder.bean_name())
                    .collect::<Vec<_>>(),
            }
            .fail(),
        }
    }

    fn find_all_holders(&self, key: &CapabilityKey) -> Vec<Arc<BeanHolder>> {
        let state = self.state.read();
        match state.index.lookup(key) {
            Lookup::Absent => Vec::new(),
            Lookup::Unique(holder) => vec![Arc::clone(holder)],
            Lookup::Ambiguous => state.providers_of(key).cloned().collect(),
        }
    }
}

struct ContextState {
    holders: Vec<Arc<BeanHolder>>,
    index: CapabilityIndex,
    frozen: bool,
}

impl ContextState {
    fn new() -> Self {
        Self {
            holders: Vec::new(),
            index: CapabilityIndex::new(),
            frozen: false,
        }
    }

    fn providers_of<'a>(
        &'a self,
        key: &'a CapabilityKey,
    ) -> impl Iterator<Item = &'a Arc<BeanHolder>> + 'a {
        self.holders.iter().filter(move |holder| holder.provides(key))
    }
}

#[cfg(test)]
mod tests {
    use crate::bean::{Bean, Capabilities};
    use crate::container::injector::MockInjector;
    use crate::key;

    use super::*;

    trait Bar: Send + Sync {
        fn bar(&self) -> u32;
    }

    struct First;

    impl Bar for First {
        fn bar(&self) -> u32 {
            1
        }
    }

    impl Bean for First {
        fn capabilities(capabilities: &mut Capabilities<Self>) {
            capabilities.provide::<dyn Bar>(|this| this);
        }
    }

    struct Second;

    impl Bar for Second {
        fn bar(&self) -> u32 {
            2
        }
    }

    impl Bean for Second {
        fn capabilities(capabilities: &mut Capabilities<Self>) {
            capabilities.provide::<dyn Bar>(|this| this);
        }
    }

    fn view<C>(object: Box<dyn Any>) -> Arc<C>
    where
        C: ?Sized + 'static,
    {
        *object.downcast::<Arc<C>>().unwrap()
    }

    #[test]
    fn context_core_register_succeeds() {
        let core = ContextCore::new();
        assert_eq!(core.len(), 0);

        core.register(BeanHolder::new(First)).unwrap();
        core.register(BeanHolder::new(Second)).unwrap();
        assert_eq!(core.len(), 2);
    }

    #[test]
    fn context_core_register_fails_when_type_registered_twice() {
        let core = ContextCore::new();
        core.register(BeanHolder::new(First)).unwrap();

        assert!(matches!(
            core.register(BeanHolder::new(First)),
            Err(InjectorError::DuplicateBean { .. })
        ));
        assert_eq!(core.len(), 1);
    }

    #[test]
    fn context_core_register_fails_when_frozen() {
        let core = ContextCore::new();
        core.freeze();
        core.freeze();

        assert!(core.is_frozen());
        assert!(matches!(core.ensure_not_frozen(), Err(InjectorError::FrozenRegistry)));
        assert!(matches!(
            core.register(BeanHolder::new(First)),
            Err(InjectorError::FrozenRegistry)
        ));
        assert_eq!(core.len(), 0);
    }

    #[test]
    fn context_core_resolve_one_succeeds() {
        let core = ContextCore::new();
        core.register(BeanHolder::new(First)).unwrap();
        let injector = MockInjector::new();

        let bar = view::<dyn Bar>(core.resolve_one(&key::of::<dyn Bar>(), &injector).unwrap());
        assert_eq!(bar.bar(), 1);

        let again = view::<dyn Bar>(core.resolve_one(&key::of::<dyn Bar>(), &injector).unwrap());
        assert!(Arc::ptr_eq(&bar, &again));

        let first = view::<First>(core.resolve_one(&key::of::<First>(), &injector).unwrap());
        assert_eq!(first.bar(), 1);
    }

    #[test]
    fn context_core_resolve_one_fails_when_ambiguous() {
        let core = ContextCore::new();
        core.register(BeanHolder::new(First)).unwrap();
        core.register(BeanHolder::new(Second)).unwrap();
        let injector = MockInjector::new();

        let Err(InjectorError::AmbiguousBean { candidates, .. }) =
            core.resolve_one(&key::of::<dyn Bar>(), &injector)
        else {
            panic!("`dyn Bar` should be ambiguous");
        };
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].ends_with("First"));
        assert!(candidates[1].ends_with("Second"));
    }

    #[test]
    fn context_core_resolve_one_fails_when_bean_not_found() {
        let core = ContextCore::new();
        let injector = MockInjector::new();

        assert!(matches!(
            core.resolve_one(&key::of::<dyn Bar>(), &injector),
            Err(InjectorError::BeanNotFound { capability }) if capability.is::<dyn Bar>()
        ));
    }

    #[test]
    fn context_core_resolve_many_succeeds() {
        let core = ContextCore::new();
        let injector = MockInjector::new();
        assert!(core
            .resolve_many(&key::of::<dyn Bar>(), &injector)
            .unwrap()
            .is_empty());

        core.register(BeanHolder::new(Second)).unwrap();
        let bars = core.resolve_many(&key::of::<dyn Bar>(), &injector).unwrap();
        assert_eq!(bars.len(), 1);

        core.register(BeanHolder::new(First)).unwrap();
        let bars: Vec<u32> = core
            .resolve_many(&key::of::<dyn Bar>(), &injector)
            .unwrap()
            .into_iter()
            .map(|object| view::<dyn Bar>(object).bar())
            .collect();
        assert_eq!(bars, vec![2, 1]);
    }
}
