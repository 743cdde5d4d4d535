//! HTTP request handlers

pub mod client;
pub mod common;
pub mod crossdomain;
pub mod health;
pub mod pixel;
pub mod server;
