use std::sync::Arc;

use minidi::prelude::*;

pub trait Inferior: Send + Sync {}

pub trait Marker: Send + Sync {}

#[derive(Default, Bean)]
#[bean(provides(dyn Inferior, dyn Marker))]
pub struct InferiorImpl;

impl Inferior for InferiorImpl {}

impl Marker for InferiorImpl {}

#[derive(Default, Bean)]
#[bean(post_construct(init))]
pub struct Base {
    #[resource]
    pub inferior: Autowired<dyn Inferior>,
}

impl Base {
    fn init(&mut self) {}
}

#[derive(Default, Bean)]
#[bean(provides(dyn Marker))]
#[bean(post_construct(check, warm_up))]
pub struct Derived {
    #[base]
    pub base: Base,
    #[resource]
    pub required: Option<Arc<dyn Inferior>>,
    #[resource]
    pub markers: Vec<Arc<dyn Marker>>,
    #[resource(mapped_name = "")]
    pub unnamed: Option<Arc<InferiorImpl>>,
    #[resource(mapped_name = "legacy")]
    pub legacy: Option<Arc<InferiorImpl>>,
    pub untouched: u32,
}

impl Marker for Derived {}

impl Derived {
    fn check(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn warm_up(&mut self) {}
}

#[derive(Bean)]
pub struct Tuple(#[resource] pub Autowired<dyn Marker>, pub u8);

#[derive(Bean)]
pub struct Generic<T: Send + Sync + 'static> {
    pub value: T,
}

fn main() {}
