//! Entity shapes and the `TrainmateClient` gateway trait for the TrainMate API,
//! plus a reqwest-based implementation in [`http_client`].

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

pub mod config;
pub mod http_client;
pub mod observability;
pub mod utils;
pub mod validation;

#[derive(Debug, Error)]
pub enum TrainmateError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl TrainmateError {
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Status { status, body }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Status { .. } => "status",
        }
    }
}

/// Bearer credential of the signed-in user. Passed explicitly into every
/// gateway call.
#[derive(Clone, Debug)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into().into_boxed_str()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for AuthToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

/// Icon tags a category may carry. The set is closed; anything else renders
/// without an icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconTag {
    Dumbbell,
    Ball,
    Heart,
    Basketball,
    Tennis,
    Fight,
    Martial,
    Mma,
    Motorsports,
    Hiking,
    Sailing,
    Skiing,
    Pool,
    Skate,
    Rugby,
    Volleyball,
}

impl IconTag {
    /// Picker order.
    pub const ALL: [IconTag; 16] = [
        IconTag::Dumbbell,
        IconTag::Ball,
        IconTag::Heart,
        IconTag::Basketball,
        IconTag::Tennis,
        IconTag::Fight,
        IconTag::Martial,
        IconTag::Mma,
        IconTag::Motorsports,
        IconTag::Hiking,
        IconTag::Sailing,
        IconTag::Skiing,
        IconTag::Pool,
        IconTag::Skate,
        IconTag::Rugby,
        IconTag::Volleyball,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IconTag::Dumbbell => "Dumbbell",
            IconTag::Ball => "Ball",
            IconTag::Heart => "Heart",
            IconTag::Basketball => "Basketball",
            IconTag::Tennis => "Tennis",
            IconTag::Fight => "Fight",
            IconTag::Martial => "Martial",
            IconTag::Mma => "Mma",
            IconTag::Motorsports => "Motorsports",
            IconTag::Hiking => "Hiking",
            IconTag::Sailing => "Sailing",
            IconTag::Skiing => "Skiing",
            IconTag::Pool => "Pool",
            IconTag::Skate => "Skate",
            IconTag::Rugby => "Rugby",
            IconTag::Volleyball => "Volleyball",
        }
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconTag {
    type Err = TrainmateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| TrainmateError::InvalidInput(format!("unknown icon tag: {s:?}")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(deserialize_with = "deserialize_id")]
    pub category_id: String,
    pub name: String,
    /// Raw tag as stored by the server; see [`IconTag`].
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "isCustom", default)]
    pub is_custom: bool,
}

impl Category {
    pub fn icon_tag(&self) -> Option<IconTag> {
        self.icon.parse().ok()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(deserialize_with = "deserialize_id")]
    pub exercise_id: String,
    pub name: String,
    pub calories_per_hour: f64,
    #[serde(deserialize_with = "deserialize_id")]
    pub category_id: String,
    #[serde(default)]
    pub owner: String,
    /// System-provided exercises are public and read-only for the user.
    #[serde(default)]
    pub public: bool,
}

/// A logged workout as the server returns it. Fields the server may omit are
/// optional; see [`Workout::is_complete`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub exercise: Option<String>,
    /// Minutes.
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub calories: Option<f64>,
}

impl Workout {
    /// True when every field the history list shows is present and non-zero.
    pub fn is_complete(&self) -> bool {
        self.exercise.as_deref().is_some_and(|e| !e.is_empty())
            && self.duration.is_some_and(|d| d > 0.0)
            && self.date.as_deref().is_some_and(|d| !d.is_empty())
            && self.calories.is_some_and(|c| c > 0.0)
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(utils::parse_calendar_date)
    }
}

/// One `{ date, calories }` entry of the workout calories endpoint. Both
/// fields are kept as raw JSON so a malformed entry can be rejected on its own
/// instead of failing the whole response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CalorieRecord {
    #[serde(default)]
    pub date: serde_json::Value,
    #[serde(default, alias = "total_calories")]
    pub calories: serde_json::Value,
}

impl CalorieRecord {
    /// Pick `date` and `calories` (or `total_calories`) out of one raw entry.
    /// Returns `None` when the entry is not a JSON object.
    pub fn from_raw(item: serde_json::Value) -> Option<Self> {
        let serde_json::Value::Object(mut fields) = item else {
            return None;
        };
        let calories = match fields.remove("calories") {
            Some(v) if !v.is_null() => v,
            _ => fields.remove("total_calories").unwrap_or_default(),
        };
        Some(Self {
            date: fields.remove("date").unwrap_or_default(),
            calories,
        })
    }

    pub fn new(date: &str, calories: f64) -> Self {
        Self {
            date: serde_json::Value::String(date.to_string()),
            calories: serde_json::Number::from_f64(calories)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coach {
    #[serde(deserialize_with = "deserialize_id")]
    pub uid: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(rename = "fullName", alias = "full_name", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Kilograms.
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub weight: Option<f64>,
    /// Centimetres.
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub height: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
}

impl UserProfile {
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["fullName", "gender", "weight", "height", "birthday"];

    /// Names of required fields that are absent or empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let present = [
            self.full_name.as_deref().is_some_and(|s| !s.is_empty()),
            self.gender.as_deref().is_some_and(|s| !s.is_empty()),
            self.weight.is_some_and(|w| w != 0.0),
            self.height.is_some_and(|h| h != 0.0),
            self.birthday.as_deref().is_some_and(|s| !s.is_empty()),
        ];
        Self::REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "category name must not be empty"))]
    pub name: String,
    #[validate(custom = "validation::known_icon")]
    pub icon: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, message = "category name must not be empty"))]
    pub name: String,
    #[validate(custom = "validation::known_icon")]
    pub icon: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct NewExercise {
    #[validate(length(min = 1, message = "exercise name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1.0, message = "calories_per_hour must be at least 1"))]
    pub calories_per_hour: f64,
    #[validate(length(min = 1, message = "exercise must belong to a category"))]
    pub category_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct ExerciseUpdate {
    #[validate(length(min = 1, message = "exercise name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1.0, message = "calories_per_hour must be at least 1"))]
    pub calories_per_hour: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Validate)]
pub struct NewWorkout {
    #[validate(length(min = 1, message = "workout must reference an exercise"))]
    pub exercise_id: String,
    /// Exercise display name, denormalised for the history list.
    #[validate(length(min = 1, message = "workout must reference an exercise"))]
    pub exercise: String,
    /// Minutes.
    #[validate(range(min = 1, max = 1000, message = "duration must be between 1 and 1000 minutes"))]
    pub duration: u32,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(custom = "validation::known_gender")]
    pub gender: String,
    /// Kilograms.
    #[validate(range(min = 25, max = 300, message = "weight must be between 25 and 300 kg"))]
    pub weight: u32,
    /// Centimetres.
    #[validate(range(min = 120, max = 240, message = "height must be between 120 and 240 cm"))]
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email address is malformed"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "birthday is required"))]
    pub birthday: String,
}

/// Calories burned doing an exercise rated at `calories_per_hour` for
/// `duration_minutes`. The server computes the stored value the same way.
pub fn estimate_calories(calories_per_hour: f64, duration_minutes: u32) -> f64 {
    calories_per_hour * f64::from(duration_minutes) / 60.0
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    deserialize_opt_id(deserializer)?.ok_or_else(|| D::Error::custom("missing identifier"))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Numbers may arrive as JSON numbers, numeric strings, or empty strings.
fn deserialize_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

#[async_trait]
pub trait TrainmateClient: Send + Sync + 'static {
    // === Categories ===

    async fn get_categories(&self, auth: &AuthToken) -> Result<Vec<Category>, TrainmateError>;

    async fn create_category(
        &self,
        auth: &AuthToken,
        category: &NewCategory,
    ) -> Result<Category, TrainmateError>;

    async fn update_category(
        &self,
        auth: &AuthToken,
        category_id: &str,
        update: &CategoryUpdate,
    ) -> Result<(), TrainmateError>;

    async fn delete_category(&self, auth: &AuthToken, category_id: &str)
    -> Result<(), TrainmateError>;

    // === Exercises ===

    async fn get_exercises_for_category(
        &self,
        auth: &AuthToken,
        category_id: &str,
    ) -> Result<Vec<Exercise>, TrainmateError>;

    async fn create_exercise(
        &self,
        auth: &AuthToken,
        exercise: &NewExercise,
    ) -> Result<Exercise, TrainmateError>;

    async fn update_exercise(
        &self,
        auth: &AuthToken,
        exercise_id: &str,
        update: &ExerciseUpdate,
    ) -> Result<(), TrainmateError>;

    async fn delete_exercise(&self, auth: &AuthToken, exercise_id: &str)
    -> Result<(), TrainmateError>;

    // === Workouts ===

    /// List workouts between `start` and `end` (inclusive). Either bound may be open.
    async fn get_workouts(
        &self,
        auth: &AuthToken,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Workout>, TrainmateError>;

    async fn create_workout(
        &self,
        auth: &AuthToken,
        workout: &NewWorkout,
    ) -> Result<(), TrainmateError>;

    /// Per-workout `{ date, calories }` pairs for the calorie chart.
    async fn get_workout_calories(
        &self,
        auth: &AuthToken,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieRecord>, TrainmateError>;

    // === Coaches ===

    async fn get_coaches(&self, auth: &AuthToken) -> Result<Vec<Coach>, TrainmateError>;

    // === Profile ===

    async fn get_user_profile(&self, auth: &AuthToken) -> Result<UserProfile, TrainmateError>;

    async fn update_user_profile(
        &self,
        auth: &AuthToken,
        profile: &ProfileUpdate,
    ) -> Result<(), TrainmateError>;
}
