use std::any::Any;
use std::sync::Arc;

pub trait AsAny: Any {
    /// Moves a boxed value, possibly behind a trait object, into a shared
    /// `Arc` that can still be downcast to its concrete type.
    fn into_shared(self: Box<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    #[inline]
    fn into_shared(self: Box<Self>) -> Arc<dyn Any + Send + Sync> {
        let boxed: Box<dyn Any + Send + Sync> = self;
        Arc::from(boxed)
    }
}
