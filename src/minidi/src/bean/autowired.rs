use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::Deref;
use std::sync::Arc;

/// An injectable slot for a dependency of capability `C`.
///
/// A slot starts unwired and is filled when its bean is initialized. It
/// dereferences to the dependency, so a `#[resource]` field of type
/// `Autowired<dyn Trait>` is used as if it were the trait object itself.
pub struct Autowired<C>
where
    C: ?Sized,
{
    target: Option<Arc<C>>,
}

impl<C> Autowired<C>
where
    C: ?Sized,
{
    /// Creates an unwired slot.
    pub fn new() -> Self {
        Self { target: None }
    }

    /// Creates a slot already wired to `target`.
    pub fn wired(target: Arc<C>) -> Self {
        Self {
            target: Some(target),
        }
    }

    pub fn is_wired(&self) -> bool {
        self.target.is_some()
    }

    pub fn get(&self) -> Option<&Arc<C>> {
        self.target.as_ref()
    }

    pub fn into_inner(self) -> Option<Arc<C>> {
        self.target
    }
}

impl<C> Default for Autowired<C>
where
    C: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Autowired<C>
where
    C: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

/// # Panics
///
/// Dereferencing panics if the slot hasn't been wired yet, i.e. the owning
/// bean is used before it was resolved from its context.
impl<C> Deref for Autowired<C>
where
    C: ?Sized,
{
    type Target = C;

    fn deref(&self) -> &Self::Target {
        match &self.target {
            Some(target) => target,
            None => panic!(
                "dependency {} is used before it was injected",
                std::any::type_name::<C>()
            ),
        }
    }
}

impl<C> Debug for Autowired<C>
where
    C: ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Autowired")
            .field("target", &std::any::type_name::<C>())
            .field("wired", &self.is_wired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct Alice;

    impl Named for Alice {
        fn name(&self) -> &'static str {
            "alice"
        }
    }

    #[test]
    fn autowired_deref_succeeds_when_wired() {
        let slot: Autowired<dyn Named> = Autowired::wired(Arc::new(Alice));
        assert!(slot.is_wired());
        assert_eq!(slot.name(), "alice");
        assert!(slot.clone().into_inner().is_some());
    }

    #[test]
    #[should_panic(expected = "used before it was injected")]
    fn autowired_deref_panics_when_unwired() {
        let slot: Autowired<dyn Named> = Autowired::default();
        assert!(!slot.is_wired());
        let _ = slot.name();
    }
}
