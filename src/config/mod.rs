//! Configuration loaded from the environment at startup.

pub mod app;
pub mod db;
pub mod env;
pub mod oauth;
pub mod session;
pub mod web;
