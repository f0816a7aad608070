pub mod client;
pub mod types;

pub use client::{Endpoints, ErgastClient, DEFAULT_BASE_URL};
