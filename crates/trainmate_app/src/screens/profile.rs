//! Profile editor.

use trainmate_client::{ProfileUpdate, UserProfile, validation};

use crate::error::{AppError, AppResult};
use crate::state::{InitOnce, LoadState, Session};

/// Profile form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub gender: String,
    /// Kilograms, as typed.
    pub weight: String,
    /// Centimetres, as typed.
    pub height: String,
    pub birthday: String,
}

impl ProfileForm {
    /// Prefill from a stored profile. Numbers are shown without decimals.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let number = |v: Option<f64>| v.map(|n| format!("{n:.0}")).unwrap_or_default();
        Self {
            full_name: profile.full_name.clone().unwrap_or_default(),
            gender: profile.gender.clone().unwrap_or_default(),
            weight: number(profile.weight),
            height: number(profile.height),
            birthday: profile.birthday.clone().unwrap_or_default(),
        }
    }
}

/// Per-field error messages from the last save attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileValidation {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub birthday: Option<String>,
}

impl ProfileValidation {
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    fn errors(&self) -> impl Iterator<Item = &str> {
        [
            &self.full_name,
            &self.gender,
            &self.weight,
            &self.height,
            &self.birthday,
        ]
        .into_iter()
        .filter_map(|e| e.as_deref())
    }

    /// Parse the typed numbers, then run the update's rules. A number that
    /// does not parse is reported as such instead of as out of range.
    fn check(form: &ProfileForm) -> (Self, Option<ProfileUpdate>) {
        let parsed = |field: &str, raw: &str| match validation::parse_whole(field, raw) {
            Ok(value) => (value, None),
            Err(e) => (0, Some(e.to_string())),
        };
        let (weight, weight_parse_err) = parsed("weight", &form.weight);
        let (height, height_parse_err) = parsed("height", &form.height);

        let update = ProfileUpdate {
            full_name: form.full_name.trim().to_string(),
            gender: form.gender.trim().to_string(),
            weight,
            height,
            email: None,
            birthday: form.birthday.trim().to_string(),
        };
        let mut errors = validation::field_errors(&update);
        let report = Self {
            full_name: errors.remove("full_name"),
            gender: errors.remove("gender"),
            weight: weight_parse_err.or_else(|| errors.remove("weight")),
            height: height_parse_err.or_else(|| errors.remove("height")),
            birthday: errors.remove("birthday"),
        };
        let update = report.is_ok().then_some(update);
        (report, update)
    }
}

pub struct ProfileScreen {
    session: Session,
    init: InitOnce,
    load_state: LoadState,
    profile: UserProfile,
    editing: bool,
    missing_fields: bool,
    validation: ProfileValidation,
}

impl ProfileScreen {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            init: InitOnce::default(),
            load_state: LoadState::Idle,
            profile: UserProfile::default(),
            editing: false,
            missing_fields: false,
            validation: ProfileValidation::default(),
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Email to display: the signed-in user's, else the one on the profile.
    pub fn email(&self) -> Option<&str> {
        self.session
            .user_email()
            .or(self.profile.email.as_deref())
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether the stored profile lacks required fields.
    pub fn has_missing_fields(&self) -> bool {
        self.missing_fields
    }

    pub fn validation(&self) -> &ProfileValidation {
        &self.validation
    }

    pub fn form(&self) -> ProfileForm {
        ProfileForm::from_profile(&self.profile)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Initial load. Runs once; later calls do nothing.
    pub async fn init(&mut self) -> AppResult<()> {
        if !self.init.claim() {
            return Ok(());
        }
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> AppResult<()> {
        self.load_state = LoadState::Loading;
        let result = self.fetch().await;
        self.load_state = LoadState::Loaded;
        let profile = result?;

        let missing = profile.missing_required_fields();
        if !missing.is_empty() {
            tracing::info!(missing = ?missing, "profile incomplete, opening editor");
            self.editing = true;
        }
        self.missing_fields = !missing.is_empty();
        self.profile = profile;
        Ok(())
    }

    async fn fetch(&self) -> AppResult<UserProfile> {
        let token = self.session.token()?;
        self.session
            .client()
            .get_user_profile(token)
            .await
            .map_err(|e| AppError::remote("get_user_profile", e))
    }

    /// Validate and submit the form. Every failing field is recorded in
    /// [`ProfileScreen::validation`] and nothing is sent.
    pub async fn save(&mut self, form: &ProfileForm) -> AppResult<()> {
        let (report, update) = ProfileValidation::check(form);
        let Some(mut update) = update else {
            let summary = report.errors().collect::<Vec<_>>().join("; ");
            self.validation = report;
            return Err(AppError::Validation(summary));
        };
        self.validation = ProfileValidation::default();
        update.email = self.email().map(str::to_string);

        let token = self.session.token()?;
        self.session
            .client()
            .update_user_profile(token, &update)
            .await
            .map_err(|e| AppError::remote("update_user_profile", e))?;

        tracing::info!("profile updated");
        self.profile = UserProfile {
            full_name: Some(update.full_name),
            gender: Some(update.gender),
            weight: Some(f64::from(update.weight)),
            height: Some(f64::from(update.height)),
            email: update.email,
            birthday: Some(update.birthday),
        };
        self.editing = false;
        self.missing_fields = false;
        Ok(())
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.validation = ProfileValidation::default();
    }

    pub fn log_out(&mut self) {
        self.session.sign_out();
        self.profile = UserProfile::default();
        self.editing = false;
        self.missing_fields = false;
        self.validation = ProfileValidation::default();
    }
}
