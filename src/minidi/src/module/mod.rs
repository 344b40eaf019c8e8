use std::any;

use crate::container::injector::InjectorError;
use crate::container::Context;

/// A unit of context configuration, usually registering a group of related
/// beans.
pub trait Module: 'static {
    /// Runs [`Module::configure`], attributing its error to this module.
    ///
    /// # Errors
    ///
    /// Returns [`InjectorError::ModuleInner`] if the configuration fails.
    fn setup(&self, context: &Context) -> Result<(), InjectorError> {
        self.configure(context)
            .map_err(|err| InjectorError::ModuleInner {
                module: any::type_name::<Self>(),
                source: Box::new(err),
            })
    }

    /// # Errors
    ///
    /// Returns an error if a bean can't be registered.
    fn configure(&self, context: &Context) -> Result<(), InjectorError>;
}

/// A module made of other modules.
///
/// Every module is set up in insertion order, even after one of them fails,
/// so that all problems are reported at once.
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    pub fn with<M>(mut self, module: M) -> Self
    where
        M: Module,
    {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, other: Configuration) -> Self {
        self.modules.extend(other.modules);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Configuration {
    fn setup(&self, context: &Context) -> Result<(), InjectorError> {
        self.configure(context)
    }

    fn configure(&self, context: &Context) -> Result<(), InjectorError> {
        let mut errors: Vec<_> = self
            .modules
            .iter()
            .filter_map(|module| module.setup(context).err())
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(InjectorError::Aggregated { errors }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bean::Bean;
    use crate::container::injector::TypedInjector;
    use crate::container::registry::Registry;

    use super::*;

    struct Port(u16);

    impl Bean for Port {}

    struct Host(&'static str);

    impl Bean for Host {}

    struct PortModule;

    impl Module for PortModule {
        fn configure(&self, context: &Context) -> Result<(), InjectorError> {
            context.register_instance(Port(8080))
        }
    }

    struct HostModule;

    impl Module for HostModule {
        fn configure(&self, context: &Context) -> Result<(), InjectorError> {
            context.register_instance(Host("localhost"))
        }
    }

    #[test]
    fn context_init_with_configuration_succeeds() {
        let configuration = Configuration::new()
            .with(PortModule)
            .compose(Configuration::new().with(HostModule));
        let context = Context::init(configuration).unwrap();

        assert!(context.is_frozen());
        assert_eq!(context.len(), 2);
        assert_eq!(context.resolve_one::<Port>().unwrap().0, 8080);
        assert_eq!(context.resolve_one::<Host>().unwrap().0, "localhost");
    }

    #[test]
    fn module_setup_fails_when_configure_fails() {
        let context = Context::new();
        context.freeze();

        let err = PortModule.setup(&context).unwrap_err();
        let InjectorError::ModuleInner { module, source } = err else {
            panic!("the error should be attributed to the module");
        };
        assert!(module.ends_with("PortModule"));
        assert!(matches!(*source, InjectorError::FrozenRegistry));
    }

    #[test]
    fn configuration_setup_fails_with_aggregated_errors() {
        let configuration = Configuration::new()
            .with(PortModule)
            .with(PortModule)
            .with(HostModule)
            .with(HostModule);

        let Err(InjectorError::Aggregated { errors }) = Context::init(configuration) else {
            panic!("both duplicates should be reported");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| matches!(err, InjectorError::ModuleInner { .. })));
    }

    #[test]
    fn configuration_setup_fails_with_single_error() {
        let configuration = Configuration::new().with(PortModule).with(PortModule);

        assert!(matches!(
            Context::init(configuration),
            Err(InjectorError::ModuleInner { .. })
        ));
    }
}
