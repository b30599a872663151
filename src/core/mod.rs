pub mod app;
pub mod config;
pub mod render;
pub mod segment;
pub mod thinking;
pub mod wav;
