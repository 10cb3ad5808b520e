//! httplet - minimal HTTP/1.x server
//!
//! Core library: a resumable request-head parser, the request/response
//! exchange model and a one-request-per-connection server.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
