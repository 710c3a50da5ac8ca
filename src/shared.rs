pub mod emit;
pub mod error;
pub mod events;
pub mod settings;
