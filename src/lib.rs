pub mod config;
pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
