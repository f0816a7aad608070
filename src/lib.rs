pub mod browser;
pub mod config;
pub mod ergast;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod season;
pub mod session;
pub mod standings;
pub mod stderr_buffer;
pub mod tui;

#[cfg(test)]
pub(crate) mod testutil;
