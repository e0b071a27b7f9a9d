pub mod alignment;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod web;

pub use error::{Error, Result};
