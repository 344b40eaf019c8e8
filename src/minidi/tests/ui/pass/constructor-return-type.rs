use std::convert::Infallible;
use std::fmt;

use minidi::prelude::*;

#[derive(Bean)]
pub struct Test1;

#[component]
impl Test1 {
    #[inject]
    pub fn new() -> Self {
        todo!()
    }
}

#[derive(Bean)]
pub struct Test2;

#[component]
impl Test2 {
    #[inject]
    pub fn new() -> Test2 {
        todo!()
    }
}

#[derive(Bean)]
pub struct Test3;

#[component]
impl Test3 {
    #[inject]
    pub fn new() -> Result<Self, Infallible> {
        todo!()
    }
}

#[derive(Bean)]
pub struct Test4;

#[component]
impl Test4 {
    #[inject]
    pub fn new() -> Result<Test4, Infallible> {
        todo!()
    }
}

#[derive(Bean)]
pub struct Test5;

#[component]
impl Test5 {
    #[inject]
    pub fn new() -> std::result::Result<Test5, fmt::Error> {
        todo!()
    }
}

#[derive(Default, Bean)]
pub struct Test6;

#[component]
impl Test6 {}

#[derive(Bean)]
pub struct Test7;

#[component]
impl Test7 {
    #[inject]
    pub fn first() -> Self {
        todo!()
    }

    #[inject]
    pub fn second() -> Self {
        todo!()
    }
}

fn main() {}
