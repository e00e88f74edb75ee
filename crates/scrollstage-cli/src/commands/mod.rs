pub mod config;
pub mod preview;
pub mod scene;
pub mod simulate;
