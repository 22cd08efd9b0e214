//! wattwatch Monitor
//!
//! Wires the gateway to the projection: configuration loading, the frame
//! pipeline, and the `Monitor` the `wattwatch` binary runs.

pub mod config;
pub mod monitor;
pub mod pipeline;

pub use config::{
    MonitorConfig, URL_ENV_VAR, load_config, load_config_from_str, load_default_config,
};
pub use monitor::Monitor;
pub use pipeline::{EventPipeline, PipelineStats};
