//! One thin handler module per resource. Handlers validate, call
//! repositories or the payments layer, and map results into JSON.

pub mod auth;
pub mod blog;
pub mod category;
pub mod health;
pub mod order;
pub mod product;
pub mod service;
pub mod variant;
pub mod webhook;
