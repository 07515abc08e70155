//! Core data models for the speed-dial button

pub mod config;
pub mod icon;
pub mod menu;

pub use config::*;
pub use icon::*;
pub use menu::*;
