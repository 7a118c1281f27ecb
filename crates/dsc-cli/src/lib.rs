//! Driver for the `dsc` binary: loads a resolver declaration stream, freezes
//! it into a descriptor table and renders the result.
pub mod args;
pub mod driver;
pub mod stream;
pub mod tracing_config;
