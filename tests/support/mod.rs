#![allow(dead_code)]

pub mod processor_stub;
pub mod redis_container;
