//! Domain value objects

mod theme;

pub use theme::Theme;
