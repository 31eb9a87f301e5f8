//! Home dashboard: workout history, calorie chart and the add-workout flow.

use chrono::NaiveDate;
use serde::Serialize;
use trainmate_client::utils::format_day_month;
use trainmate_client::{Category, Coach, Exercise, NewWorkout, Workout, validation};

use crate::domains::calories::{
    CaloriesPerDay, ChartPoint, calculate_calories_per_day, chart_points,
};
use crate::domains::icons::{WorkoutGlyph, workout_glyph};
use crate::error::{AppError, AppResult};
use crate::state::{InitOnce, LoadState, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeDialog {
    #[default]
    Closed,
    Menu,
    AddWorkout,
    Filter,
    FilterDate,
    FilterCategory,
    FilterExercise,
}

/// Add-workout form as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub exercise_id: String,
    pub exercise: String,
    /// Minutes, as typed.
    pub duration: String,
    pub date: NaiveDate,
}

impl WorkoutDraft {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            exercise_id: String::new(),
            exercise: String::new(),
            duration: String::new(),
            date,
        }
    }

    fn to_new_workout(&self) -> AppResult<NewWorkout> {
        let duration =
            validation::parse_whole("duration", &self.duration).map_err(AppError::invalid)?;
        let workout = NewWorkout {
            exercise_id: self.exercise_id.clone(),
            exercise: self.exercise.clone(),
            duration,
            date: self.date,
        };
        validation::validate_payload(&workout).map_err(AppError::invalid)?;
        Ok(workout)
    }
}

/// One line of the workout history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRow {
    pub exercise: String,
    pub glyph: WorkoutGlyph,
    pub duration_minutes: f64,
    /// `dd/mm`, or the raw date when it cannot be parsed.
    pub date_label: String,
    pub calories: f64,
}

impl From<&Workout> for WorkoutRow {
    fn from(w: &Workout) -> Self {
        let exercise = w.exercise.clone().unwrap_or_default();
        let date_label = w
            .calendar_date()
            .map(format_day_month)
            .unwrap_or_else(|| w.date.clone().unwrap_or_default());
        Self {
            glyph: workout_glyph(&exercise),
            exercise,
            duration_minutes: w.duration.unwrap_or_default(),
            date_label,
            calories: w.calories.unwrap_or_default(),
        }
    }
}

pub struct HomeScreen {
    session: Session,
    today: NaiveDate,
    init: InitOnce,
    load_state: LoadState,
    workouts: Vec<Workout>,
    calories: CaloriesPerDay,
    chart: Vec<ChartPoint>,
    categories: Vec<Category>,
    selected_category: Option<String>,
    exercises: Vec<Exercise>,
    coaches: Vec<Coach>,
    selected_coach: Option<String>,
    draft: WorkoutDraft,
    dialog: HomeDialog,
}

impl HomeScreen {
    /// `today` bounds the history queries and seeds the add-workout date.
    pub fn new(session: Session, today: NaiveDate) -> Self {
        Self {
            session,
            today,
            init: InitOnce::default(),
            load_state: LoadState::Idle,
            workouts: Vec::new(),
            calories: CaloriesPerDay::default(),
            chart: Vec::new(),
            categories: Vec::new(),
            selected_category: None,
            exercises: Vec::new(),
            coaches: Vec::new(),
            selected_coach: None,
            draft: WorkoutDraft::on(today),
            dialog: HomeDialog::Closed,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Complete workouts, newest first.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn workout_rows(&self) -> Vec<WorkoutRow> {
        self.workouts.iter().map(WorkoutRow::from).collect()
    }

    pub fn calories_per_day(&self) -> &CaloriesPerDay {
        &self.calories
    }

    pub fn chart(&self) -> &[ChartPoint] {
        &self.chart
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn coaches(&self) -> &[Coach] {
        &self.coaches
    }

    pub fn selected_coach(&self) -> Option<&str> {
        self.selected_coach.as_deref()
    }

    pub fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    pub fn dialog(&self) -> HomeDialog {
        self.dialog
    }

    /// Initial load. Runs once; later calls do nothing. History, categories
    /// and coaches load independently; the first failure is returned after
    /// all three have been attempted.
    pub async fn init(&mut self) -> AppResult<()> {
        if !self.init.claim() {
            return Ok(());
        }
        self.load_state = LoadState::Loading;
        let history = self.load_history().await;
        let categories = self.load_categories().await;
        let coaches = self.load_coaches().await;
        self.load_state = LoadState::Loaded;
        history.and(categories).and(coaches)
    }

    /// Reload workouts and the calorie chart up to today.
    pub async fn load_history(&mut self) -> AppResult<()> {
        let workouts = self.load_workouts().await;
        let calories = self.load_calories().await;
        workouts.and(calories)
    }

    async fn load_workouts(&mut self) -> AppResult<()> {
        let token = self.session.token()?;
        let fetched = self
            .session
            .client()
            .get_workouts(token, None, Some(self.today))
            .await
            .map_err(|e| AppError::remote("get_workouts", e))?;
        let total = fetched.len();
        let mut complete: Vec<Workout> =
            fetched.into_iter().filter(Workout::is_complete).collect();
        if complete.len() < total {
            tracing::debug!(skipped = total - complete.len(), "dropping incomplete workouts");
        }
        // Newest first; undated entries sink to the bottom.
        complete.sort_by(|a, b| b.calendar_date().cmp(&a.calendar_date()));
        self.workouts = complete;
        Ok(())
    }

    async fn load_calories(&mut self) -> AppResult<()> {
        let token = self.session.token()?;
        let records = self
            .session
            .client()
            .get_workout_calories(token, None, Some(self.today))
            .await
            .map_err(|e| AppError::remote("get_workout_calories", e))?;
        let per_day = calculate_calories_per_day(&records);
        if !per_day.rejected().is_empty() {
            tracing::warn!(
                rejected = per_day.rejected().len(),
                "some calorie records were excluded from the chart"
            );
        }
        self.chart = chart_points(&per_day);
        self.calories = per_day;
        Ok(())
    }

    async fn load_categories(&mut self) -> AppResult<()> {
        let token = self.session.token()?;
        self.categories = self
            .session
            .client()
            .get_categories(token)
            .await
            .map_err(|e| AppError::remote("get_categories", e))?;
        Ok(())
    }

    async fn load_coaches(&mut self) -> AppResult<()> {
        let token = self.session.token()?;
        self.coaches = self
            .session
            .client()
            .get_coaches(token)
            .await
            .map_err(|e| AppError::remote("get_coaches", e))?;
        Ok(())
    }

    // === Add-workout form ===

    /// Pick a category and load its exercises. Clears any exercise already
    /// chosen from a previous category.
    pub async fn select_category(&mut self, category_id: &str) -> AppResult<()> {
        if !self.categories.iter().any(|c| c.category_id == category_id) {
            return Err(AppError::NotFound(format!("category {category_id}")));
        }
        self.selected_category = Some(category_id.to_string());
        self.draft.exercise_id.clear();
        self.draft.exercise.clear();
        let token = self.session.token()?;
        let exercises = self
            .session
            .client()
            .get_exercises_for_category(token, category_id)
            .await
            .map_err(|e| AppError::remote("get_exercises_for_category", e))?;
        self.exercises = exercises;
        Ok(())
    }

    pub fn select_exercise(&mut self, exercise_id: &str) -> AppResult<()> {
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .ok_or_else(|| AppError::NotFound(format!("exercise {exercise_id}")))?;
        self.draft.exercise_id = exercise.exercise_id.clone();
        self.draft.exercise = exercise.name.clone();
        Ok(())
    }

    pub fn select_coach(&mut self, uid: &str) -> AppResult<()> {
        if !self.coaches.iter().any(|c| c.uid == uid) {
            return Err(AppError::NotFound(format!("coach {uid}")));
        }
        self.selected_coach = Some(uid.to_string());
        Ok(())
    }

    pub fn set_duration(&mut self, minutes: &str) {
        self.draft.duration = minutes.to_string();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.draft.date = date;
    }

    /// Submit the draft. An invalid draft leaves everything as it is. A valid
    /// one is cleared and the dialogs close whether or not the remote call
    /// succeeds; on success the history is reloaded.
    pub async fn add_workout(&mut self) -> AppResult<()> {
        let new = self.draft.to_new_workout()?;
        let token = self.session.token()?.clone();
        self.draft = WorkoutDraft::on(self.today);

        let result = self
            .session
            .client()
            .create_workout(&token, &new)
            .await
            .map_err(|e| AppError::remote("create_workout", e));

        self.close_add_workout();
        self.close_dialog();
        result?;

        tracing::info!(
            exercise = %new.exercise,
            duration = new.duration,
            date = %new.date,
            "workout saved"
        );
        self.load_history().await
    }

    // === Dialogs ===

    pub fn open_menu(&mut self) {
        self.dialog = HomeDialog::Menu;
    }

    pub fn open_add_workout(&mut self) {
        self.dialog = HomeDialog::AddWorkout;
    }

    /// Leave the add-workout form for the menu, dropping the selection.
    pub fn close_add_workout(&mut self) {
        self.dialog = HomeDialog::Menu;
        self.selected_category = None;
        self.exercises.clear();
        self.selected_coach = None;
    }

    pub fn open_filter(&mut self) {
        self.dialog = HomeDialog::Filter;
    }

    pub fn open_filter_date(&mut self) {
        self.dialog = HomeDialog::FilterDate;
    }

    pub fn open_filter_category(&mut self) {
        self.dialog = HomeDialog::FilterCategory;
    }

    pub fn open_filter_exercise(&mut self) {
        self.dialog = HomeDialog::FilterExercise;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = HomeDialog::Closed;
    }
}
