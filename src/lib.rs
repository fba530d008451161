pub mod config;
pub mod context;
pub mod core;
pub mod database;
pub mod error;
pub mod handlers;
pub mod impls;
pub mod middlewares;
pub mod request;
pub mod response;
