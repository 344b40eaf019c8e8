use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

/// Identifies a capability, i.e. a type under which a bean can be looked up.
///
/// A capability is either the concrete type of a bean or a trait object type
/// such as `dyn Greeter` that the bean declares to provide. Two keys are equal
/// iff they refer to the same type; the stored name is only used for display.
#[derive(Clone, Copy)]
pub struct CapabilityKey {
    id: TypeId,
    name: &'static str,
}

impl CapabilityKey {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.id == TypeId::of::<T>()
    }
}

impl Debug for CapabilityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for CapabilityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Returns the key of capability `T`.
pub fn of<T>() -> CapabilityKey
where
    T: ?Sized + 'static,
{
    CapabilityKey {
        id: TypeId::of::<T>(),
        name: any::type_name::<T>(),
    }
}
