//! Icon lookups for category tags and workout rows.

use serde::Serialize;
use trainmate_client::IconTag;

/// Opaque identifier of a renderable icon (the Material icon name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IconHandle(&'static str);

impl IconHandle {
    pub const fn name(self) -> &'static str {
        self.0
    }
}

pub fn icon_for(tag: IconTag) -> IconHandle {
    IconHandle(match tag {
        IconTag::Dumbbell => "FitnessCenter",
        IconTag::Ball => "SportsSoccer",
        IconTag::Heart => "Favorite",
        IconTag::Basketball => "SportsBasketball",
        IconTag::Tennis => "SportsTennis",
        IconTag::Fight => "SportsKabaddi",
        IconTag::Martial => "SportsMartialArts",
        IconTag::Mma => "SportsMma",
        IconTag::Motorsports => "SportsMotorsports",
        IconTag::Hiking => "Hiking",
        IconTag::Sailing => "Sailing",
        IconTag::Skiing => "DownhillSkiing",
        IconTag::Pool => "Pool",
        IconTag::Skate => "Skateboarding",
        IconTag::Rugby => "SportsRugby",
        IconTag::Volleyball => "SportsVolleyball",
    })
}

/// Resolve a stored tag string. Unknown and empty tags have no icon.
pub fn resolve_icon(tag: &str) -> Option<IconHandle> {
    tag.parse::<IconTag>().ok().map(icon_for)
}

/// Options for the icon picker, in display order.
pub fn picker_options() -> impl Iterator<Item = (IconTag, IconHandle)> {
    IconTag::ALL.into_iter().map(|tag| (tag, icon_for(tag)))
}

/// Glyph shown next to a workout in the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkoutGlyph {
    Timer,
    Dumbbell,
    Bike,
    Trophy,
}

pub fn workout_glyph(exercise: &str) -> WorkoutGlyph {
    match exercise {
        "Running" => WorkoutGlyph::Timer,
        "Weightlifting" => WorkoutGlyph::Dumbbell,
        "Cycling" => WorkoutGlyph::Bike,
        _ => WorkoutGlyph::Trophy,
    }
}
