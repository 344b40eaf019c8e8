use std::error::Error;

use crate::container::injector::InjectorError;

/// The return value of a post-construct hook.
///
/// Hooks may return nothing or a `Result<(), E>`; a failure is reported as
/// [`InjectorError::PostConstruct`].
pub trait HookOutcome {
    /// # Errors
    ///
    /// Returns an error if the hook failed.
    fn into_hook_result(self, bean: &'static str, hook: &'static str) -> Result<(), InjectorError>;
}

impl HookOutcome for () {
    fn into_hook_result(self, _bean: &'static str, _hook: &'static str) -> Result<(), InjectorError> {
        Ok(())
    }
}

impl<E> HookOutcome for Result<(), E>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    fn into_hook_result(self, bean: &'static str, hook: &'static str) -> Result<(), InjectorError> {
        self.map_err(|err| InjectorError::post_construct(bean, hook, err))
    }
}
