#![allow(clippy::new_without_default)]

pub mod bean;
pub mod container;
pub mod key;
pub mod module;
mod util;

pub use minidi_derive::{component, Bean};

pub mod prelude {
    pub use crate::bean::{Autowired, Bean};
    pub use crate::container::injector::{Injector, InjectorError, Resolvable, TypedInjector};
    pub use crate::container::registry::Registry;
    pub use crate::container::Context;
    pub use crate::key;
    pub use crate::module::{Configuration, Module};
    pub use crate::{component, Bean};
}
