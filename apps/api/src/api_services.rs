mod database;
mod state_builder;

pub use database::connect_and_migrate;
pub use state_builder::{StorageHandle, build_app_state, open_storage};

#[cfg(test)]
pub use state_builder::assemble_app_state;
