//! MacroAI core library
//!
//! Profile-driven nutrition target calculation plus AI-assisted food and
//! exercise logging over a durable, observable log store.

pub mod classifier;
pub mod db;
pub mod models;
pub mod session;
pub mod store;
pub mod targets;
