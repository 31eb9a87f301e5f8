//! Field checks shared by the HTTP client and the screens' forms.
//!
//! Payload rules live on the payload types as `#[derive(Validate)]`
//! attributes; this module holds the custom validators they reference and the
//! glue that turns `validator` reports into [`TrainmateError`]s.

use std::collections::BTreeMap;

use validator::{Validate, ValidationError};

use crate::{IconTag, TrainmateError};

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

fn rejection(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn known_icon(icon: &str) -> Result<(), ValidationError> {
    icon.parse::<IconTag>()
        .map(|_| ())
        .map_err(|_| rejection("icon", format!("unknown icon tag: {icon:?}")))
}

pub fn known_gender(gender: &str) -> Result<(), ValidationError> {
    if !GENDERS.contains(&gender) {
        return Err(rejection(
            "gender",
            format!("gender must be one of {}, got {gender:?}", GENDERS.join(", ")),
        ));
    }
    Ok(())
}

/// Run the payload's rules, folding every failure into one `InvalidInput`.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), TrainmateError> {
    payload
        .validate()
        .map_err(|err| TrainmateError::InvalidInput(err.to_string()))
}

/// First failure message per field, keyed by field name. Empty when valid.
pub fn field_errors<T: Validate>(payload: &T) -> BTreeMap<String, String> {
    let Err(errors) = payload.validate() else {
        return BTreeMap::new();
    };
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid ({})", first.code));
            Some((field.to_string(), message))
        })
        .collect()
}

/// Parse a whole number typed into a form field. Empty input is an error;
/// bounds are left to the payload's rules.
pub fn parse_whole(field: &str, raw: &str) -> Result<u32, TrainmateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TrainmateError::InvalidInput(format!("{field} is required")));
    }
    raw.parse().map_err(|_| {
        TrainmateError::InvalidInput(format!("{field} must be a whole number, got {raw:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewCategory, NewExercise, NewWorkout, ProfileUpdate};
    use chrono::NaiveDate;

    fn workout(duration: u32) -> NewWorkout {
        NewWorkout {
            exercise_id: "e1".into(),
            exercise: "Running".into(),
            duration,
            date: NaiveDate::from_ymd_opt(2024, 5, 12).expect("date"),
        }
    }

    fn profile(weight: u32, height: u32) -> ProfileUpdate {
        ProfileUpdate {
            full_name: "Ana".into(),
            gender: "female".into(),
            weight,
            height,
            email: None,
            birthday: "1990-01-01".into(),
        }
    }

    #[test]
    fn new_category_requires_name_and_known_icon() {
        let ok = NewCategory { name: "Court".into(), icon: "Tennis".into() };
        assert!(validate_payload(&ok).is_ok());

        let blank = NewCategory { name: String::new(), icon: "Tennis".into() };
        assert!(matches!(
            validate_payload(&blank),
            Err(TrainmateError::InvalidInput(_))
        ));

        let unknown = NewCategory { name: "Court".into(), icon: "Racket".into() };
        let errors = field_errors(&unknown);
        assert_eq!(errors.len(), 1);
        assert!(errors["icon"].contains("Racket"));
    }

    #[test]
    fn exercise_rate_must_be_at_least_one() {
        let mut ex = NewExercise {
            name: "Sprints".into(),
            calories_per_hour: 0.0,
            category_id: "c1".into(),
        };
        assert!(validate_payload(&ex).is_err());
        ex.calories_per_hour = 0.5;
        assert!(validate_payload(&ex).is_err());
        ex.calories_per_hour = 500.0;
        assert!(validate_payload(&ex).is_ok());
        ex.category_id.clear();
        assert!(field_errors(&ex).contains_key("category_id"));
    }

    #[test]
    fn workout_duration_bounds() {
        assert!(validate_payload(&workout(0)).is_err());
        assert!(validate_payload(&workout(1)).is_ok());
        assert!(validate_payload(&workout(1000)).is_ok());
        assert!(validate_payload(&workout(1001)).is_err());

        let mut unnamed = workout(30);
        unnamed.exercise.clear();
        assert!(field_errors(&unnamed).contains_key("exercise"));
    }

    #[test]
    fn weight_and_height_ranges() {
        assert!(field_errors(&profile(25, 240)).is_empty());
        assert!(field_errors(&profile(300, 120)).is_empty());

        let errors = field_errors(&profile(24, 241));
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["height", "weight"]
        );
        assert!(field_errors(&profile(301, 119)).contains_key("weight"));
    }

    #[test]
    fn profile_reports_each_failing_field() {
        let mut p = profile(70, 180);
        p.full_name.clear();
        p.gender = "Female".into();
        p.birthday.clear();
        p.email = Some("not-an-email".into());
        let errors = field_errors(&p);
        for field in ["full_name", "gender", "birthday", "email"] {
            assert!(errors.contains_key(field), "{field} should fail");
        }
        assert!(!errors.contains_key("weight"));
    }

    #[test]
    fn gender_must_be_listed() {
        assert!(known_gender("female").is_ok());
        assert!(known_gender("Female").is_err());
        assert!(known_gender("").is_err());
    }

    #[test]
    fn parse_whole_rejects_blank_and_text() {
        assert_eq!(parse_whole("weight", " 70 ").ok(), Some(70));
        assert!(parse_whole("weight", "").is_err());
        assert!(parse_whole("weight", "seventy").is_err());
        assert!(parse_whole("weight", "-3").is_err());
    }
}
