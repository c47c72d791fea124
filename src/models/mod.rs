//! Shared data types and configuration

pub mod config;
pub mod tag;

pub use config::{Config, Direction, FontSize, ImageFormat, Margin, ShapeOptions};
pub use tag::{LanguageSystem, ScriptTag};
