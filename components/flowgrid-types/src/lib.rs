#![deny(warnings)]

pub mod workflows;
