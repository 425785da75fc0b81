pub mod app;
pub mod bay;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fan;
pub mod logger;
pub mod model;
pub mod monitor;
pub mod rate;
pub mod render;
pub mod sampler;
pub mod smoothing;
