pub mod chain;
pub mod config;
pub mod error;
pub mod http;
pub mod persist;
pub mod rate_limit;
pub mod service;
pub mod util;
