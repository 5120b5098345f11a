#![allow(dead_code)]

pub mod documents;
pub mod files;
