pub mod clipboard;
pub mod window;
