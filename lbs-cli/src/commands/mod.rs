//! CLI command implementations.

pub mod amap;
pub mod baidu;
pub mod common;
pub mod config;
pub mod convert;
pub mod qq;
pub mod tile;
