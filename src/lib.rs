pub mod config;
pub mod flash;
pub mod quiz;
pub mod render;
