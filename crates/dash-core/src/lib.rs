// ABOUTME: Shared types and configuration for dashpack.
// ABOUTME: Defines panel geometry, layout settings, and config file handling.

pub mod config;
pub mod geometry;

pub use config::{Config, ConfigError, LayoutConfig, ReflowSettings};
pub use geometry::{overlaps, GeometryError, Point, Position, Size};
