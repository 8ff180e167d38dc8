pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod responder;
pub mod seed;
pub mod service;
pub mod state;
pub mod views;

pub use app::build_router;
