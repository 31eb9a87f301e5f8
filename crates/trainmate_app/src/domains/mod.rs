//! Domain logic that does not talk to the gateway.
//!
//! - [`calories`]: daily calorie aggregation and chart points
//! - [`icons`]: category icon tags and workout glyphs

pub mod calories;
pub mod icons;

pub use calories::{CaloriesPerDay, ChartPoint, calculate_calories_per_day, chart_points};
pub use icons::{IconHandle, WorkoutGlyph, resolve_icon, workout_glyph};
