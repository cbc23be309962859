pub mod alerts;
pub mod auth;
pub mod error;
pub mod event;
pub mod push;
