pub mod auth;
pub mod command;
pub mod health;
pub mod permissions;
pub mod roles;
