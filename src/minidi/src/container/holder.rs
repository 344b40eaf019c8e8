use std::any::{self, Any, TypeId};
use std::mem;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

use crate::bean::{Bean, Capabilities, Capability, ErasedBean};
use crate::container::injector::{CyclicDependencySnafu, Injector, InjectorError, PoisonedBeanSnafu};
use crate::key::CapabilityKey;
use crate::util::any::AsAny;

/// Wraps one registered bean together with its initialization state.
pub(super) struct BeanHolder {
    bean_name: &'static str,
    concrete: TypeId,
    capabilities: Vec<Capability>,
    state: Mutex<HolderState>,
}

impl BeanHolder {
    pub fn new<T>(bean: T) -> Self
    where
        T: Bean,
    {
        Self {
            bean_name: any::type_name::<T>(),
            concrete: TypeId::of::<T>(),
            capabilities: Capabilities::<T>::collect().into_entries(),
            state: Mutex::new(HolderState::Uninitialized(Box::new(bean))),
        }
    }

    pub fn bean_name(&self) -> &'static str {
        self.bean_name
    }

    pub fn concrete_type(&self) -> TypeId {
        self.concrete
    }

    pub fn capability_keys(&self) -> impl Iterator<Item = &CapabilityKey> {
        self.capabilities.iter().map(Capability::key)
    }

    pub fn provides(&self, key: &CapabilityKey) -> bool {
        self.capability_keys().any(|k| k == key)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(*self.state.lock(), HolderState::Initialized(_))
    }

    /// Initializes the bean if needed and returns it viewed as `key`.
    pub fn resolve(
        &self,
        key: &CapabilityKey,
        injector: &dyn Injector,
    ) -> Result<Box<dyn Any>, InjectorError> {
        let object = self.initialize(injector)?;
        Ok(self.view(key, object))
    }

    /// Injects the bean's dependencies and runs its post-construct hooks, or
    /// returns the shared bean if that already happened.
    ///
    /// On failure the bean goes back to the uninitialized state, keeping
    /// whatever was injected so far, and a later call tries again. If
    /// injection or a hook panics, the holder is poisoned instead: waiting
    /// threads and every later call get [`InjectorError::PoisonedBean`].
    pub fn initialize(
        &self,
        injector: &dyn Injector,
    ) -> Result<Arc<dyn Any + Send + Sync>, InjectorError> {
        let mut state = self.state.lock();

        match &mut *state {
            HolderState::Initialized(object) => return Ok(Arc::clone(object)),
            HolderState::Initializing(context) if context.is_run_by_current_thread() => {
                return CyclicDependencySnafu {
                    bean: self.bean_name,
                }
                .fail();
            }
            HolderState::Initializing(context) => {
                let receiver = context.register_waiter();
                drop(state);
                return self.wait_for_initialization(receiver);
            }
            HolderState::Poisoned => return self.poisoned(),
            HolderState::Uninitialized(_) => {}
        }

        let initializing = HolderState::Initializing(InitializationContext::new());
        let HolderState::Uninitialized(mut bean) = mem::replace(&mut *state, initializing) else {
            unreachable!("`state` should be checked to be uninitialized")
        };
        drop(state);

        debug!(bean = self.bean_name, "initializing bean");
        let guard = PoisonOnUnwind { holder: self };
        let res = bean
            .dyn_inject(injector)
            .and_then(|()| bean.dyn_post_construct());
        mem::forget(guard);

        let mut state = self.state.lock();
        match res {
            Ok(()) => {
                let object = <dyn ErasedBean as AsAny>::into_shared(bean);
                let initialized = HolderState::Initialized(Arc::clone(&object));
                let context = Self::leave_initializing(&mut state, initialized);
                drop(state);

                debug!(bean = self.bean_name, "bean initialized");
                context.notify(WaitResponse::Initialized(Arc::clone(&object)));
                Ok(object)
            }
            Err(err) => {
                let context = Self::leave_initializing(&mut state, HolderState::Uninitialized(bean));
                drop(state);

                debug!(bean = self.bean_name, error = %err, "bean initialization failed");
                context.notify(WaitResponse::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Views an initialized bean as capability `key`.
    pub fn view(&self, key: &CapabilityKey, object: Arc<dyn Any + Send + Sync>) -> Box<dyn Any> {
        self.capabilities
            .iter()
            .find(|capability| capability.key() == key)
            .and_then(|capability| capability.view(object))
            .unwrap_or_else(|| {
                unreachable!("bean {} should provide capability {key}", self.bean_name)
            })
    }

    fn leave_initializing(state: &mut HolderState, next: HolderState) -> InitializationContext {
        match mem::replace(state, next) {
            HolderState::Initializing(context) => context,
            _ => unreachable!("only the initializing thread should leave the initializing state"),
        }
    }

    fn wait_for_initialization(
        &self,
        receiver: Receiver<WaitResponse>,
    ) -> Result<Arc<dyn Any + Send + Sync>, InjectorError> {
        match receiver.recv() {
            Ok(WaitResponse::Initialized(object)) => Ok(object),
            Ok(WaitResponse::Failed(err)) => Err(err),
            // The initializing thread unwound without answering.
            Err(_) => self.poisoned(),
        }
    }

    fn poisoned<T>(&self) -> Result<T, InjectorError> {
        PoisonedBeanSnafu {
            bean: self.bean_name,
        }
        .fail()
    }
}

/// Poisons the holder if dropped while the initializing thread unwinds.
struct PoisonOnUnwind<'a> {
    holder: &'a BeanHolder,
}

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        let mut state = self.holder.state.lock();
        let previous = mem::replace(&mut *state, HolderState::Poisoned);
        drop(state);

        debug!(bean = self.holder.bean_name, "bean initialization panicked");
        if let HolderState::Initializing(context) = previous {
            context.notify(WaitResponse::Failed(InjectorError::PoisonedBean {
                bean: self.holder.bean_name,
            }));
        }
    }
}

enum HolderState {
    Uninitialized(Box<dyn ErasedBean>),
    Initializing(InitializationContext),
    Initialized(Arc<dyn Any + Send + Sync>),
    Poisoned,
}

struct InitializationContext {
    on_thread: ThreadId,
    waiters: Vec<Sender<WaitResponse>>,
}

impl InitializationContext {
    fn new() -> Self {
        Self {
            on_thread: thread::current().id(),
            waiters: Vec::new(),
        }
    }

    fn is_run_by_current_thread(&self) -> bool {
        thread::current().id() == self.on_thread
    }

    fn register_waiter(&mut self) -> Receiver<WaitResponse> {
        let (sender, receiver) = oneshot::channel();
        self.waiters.push(sender);
        receiver
    }

    fn notify(self, response: WaitResponse) {
        for sender in self.waiters {
            let _ = sender.send(response.clone());
        }
    }
}

#[derive(Clone)]
enum WaitResponse {
    Initialized(Arc<dyn Any + Send + Sync>),
    Failed(InjectorError),
}
