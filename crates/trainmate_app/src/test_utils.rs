//! Shared test utilities: an in-memory `TrainmateClient` used by the screen tests.
#![cfg(test)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use trainmate_client::{
    AuthToken, CalorieRecord, Category, CategoryUpdate, Coach, Exercise, ExerciseUpdate,
    NewCategory, NewExercise, NewWorkout, ProfileUpdate, TrainmateClient, TrainmateError,
    UserProfile, Workout, estimate_calories,
};

use crate::state::Session;

#[derive(Default)]
pub struct MockState {
    pub categories: Vec<Category>,
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
    pub calories: Vec<CalorieRecord>,
    pub coaches: Vec<Coach>,
    pub profile: UserProfile,
    pub profile_updates: Vec<ProfileUpdate>,
    /// Operations that answer with a 500.
    pub fail: HashSet<&'static str>,
    /// Every operation invoked, in order.
    pub calls: Vec<&'static str>,
    pub next_id: u32,
}

impl MockState {
    fn enter(&mut self, op: &'static str) -> Result<(), TrainmateError> {
        self.calls.push(op);
        if self.fail.contains(op) {
            return Err(TrainmateError::from_status(500, format!("{op} failed")));
        }
        Ok(())
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

/// In-memory gateway backed by [`MockState`].
#[derive(Default)]
pub struct MockGateway {
    pub state: Mutex<MockState>,
}

impl MockGateway {
    pub async fn fail_on(&self, op: &'static str) {
        self.state.lock().await.fail.insert(op);
    }

    pub async fn recover(&self, op: &'static str) {
        self.state.lock().await.fail.remove(op);
    }

    pub async fn calls(&self, op: &'static str) -> usize {
        self.state.lock().await.calls.iter().filter(|c| **c == op).count()
    }
}

pub fn session_for(gateway: &Arc<MockGateway>) -> Session {
    Session::new(gateway.clone(), AuthToken::new("test-token"))
}

pub fn category(id: &str, name: &str, icon: &str, custom: bool) -> Category {
    Category {
        category_id: id.into(),
        name: name.into(),
        icon: icon.into(),
        owner: if custom { "u1".into() } else { "system".into() },
        is_custom: custom,
    }
}

pub fn exercise(id: &str, category_id: &str, name: &str, cph: f64, public: bool) -> Exercise {
    Exercise {
        exercise_id: id.into(),
        name: name.into(),
        calories_per_hour: cph,
        category_id: category_id.into(),
        owner: if public { "system".into() } else { "u1".into() },
        public,
    }
}

pub fn workout(id: &str, exercise: &str, duration: f64, date: &str, calories: f64) -> Workout {
    Workout {
        id: id.into(),
        exercise_id: Some(format!("ex-{exercise}")),
        exercise: Some(exercise.into()),
        duration: Some(duration),
        date: Some(date.into()),
        calories: Some(calories),
    }
}

fn within(date: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    let Some(date) = date else { return true };
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

#[async_trait]
impl TrainmateClient for MockGateway {
    async fn get_categories(&self, _auth: &AuthToken) -> Result<Vec<Category>, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_categories")?;
        Ok(s.categories.clone())
    }

    async fn create_category(
        &self,
        _auth: &AuthToken,
        category: &NewCategory,
    ) -> Result<Category, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("create_category")?;
        let id = s.fresh_id("c");
        let created = Category {
            category_id: id,
            name: category.name.clone(),
            icon: category.icon.clone(),
            owner: "u1".into(),
            is_custom: true,
        };
        s.categories.push(created.clone());
        Ok(created)
    }

    async fn update_category(
        &self,
        _auth: &AuthToken,
        category_id: &str,
        update: &CategoryUpdate,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("update_category")?;
        let c = s
            .categories
            .iter_mut()
            .find(|c| c.category_id == category_id)
            .ok_or_else(|| TrainmateError::NotFound(category_id.into()))?;
        c.name = update.name.clone();
        c.icon = update.icon.clone();
        Ok(())
    }

    async fn delete_category(
        &self,
        _auth: &AuthToken,
        category_id: &str,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("delete_category")?;
        s.categories.retain(|c| c.category_id != category_id);
        s.exercises.retain(|e| e.category_id != category_id);
        Ok(())
    }

    async fn get_exercises_for_category(
        &self,
        _auth: &AuthToken,
        category_id: &str,
    ) -> Result<Vec<Exercise>, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_exercises_for_category")?;
        Ok(s.exercises
            .iter()
            .filter(|e| e.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn create_exercise(
        &self,
        _auth: &AuthToken,
        exercise: &NewExercise,
    ) -> Result<Exercise, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("create_exercise")?;
        let id = s.fresh_id("e");
        let created = Exercise {
            exercise_id: id,
            name: exercise.name.clone(),
            calories_per_hour: exercise.calories_per_hour,
            category_id: exercise.category_id.clone(),
            owner: "u1".into(),
            public: false,
        };
        s.exercises.push(created.clone());
        Ok(created)
    }

    async fn update_exercise(
        &self,
        _auth: &AuthToken,
        exercise_id: &str,
        update: &ExerciseUpdate,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("update_exercise")?;
        let e = s
            .exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
            .ok_or_else(|| TrainmateError::NotFound(exercise_id.into()))?;
        e.name = update.name.clone();
        e.calories_per_hour = update.calories_per_hour;
        Ok(())
    }

    async fn delete_exercise(
        &self,
        _auth: &AuthToken,
        exercise_id: &str,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("delete_exercise")?;
        s.exercises.retain(|e| e.exercise_id != exercise_id);
        Ok(())
    }

    async fn get_workouts(
        &self,
        _auth: &AuthToken,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Workout>, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_workouts")?;
        Ok(s.workouts
            .iter()
            .filter(|w| within(w.calendar_date(), start, end))
            .cloned()
            .collect())
    }

    async fn create_workout(
        &self,
        _auth: &AuthToken,
        workout: &NewWorkout,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("create_workout")?;
        let cph = s
            .exercises
            .iter()
            .find(|e| e.exercise_id == workout.exercise_id)
            .map(|e| e.calories_per_hour)
            .unwrap_or_default();
        let calories = estimate_calories(cph, workout.duration);
        let id = s.fresh_id("w");
        let date = workout.date.format("%Y-%m-%d").to_string();
        s.workouts.push(Workout {
            id,
            exercise_id: Some(workout.exercise_id.clone()),
            exercise: Some(workout.exercise.clone()),
            duration: Some(f64::from(workout.duration)),
            date: Some(date.clone()),
            calories: Some(calories),
        });
        s.calories.push(CalorieRecord::new(&date, calories));
        Ok(())
    }

    async fn get_workout_calories(
        &self,
        _auth: &AuthToken,
        _start: Option<NaiveDate>,
        _end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieRecord>, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_workout_calories")?;
        Ok(s.calories.clone())
    }

    async fn get_coaches(&self, _auth: &AuthToken) -> Result<Vec<Coach>, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_coaches")?;
        Ok(s.coaches.clone())
    }

    async fn get_user_profile(&self, _auth: &AuthToken) -> Result<UserProfile, TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("get_user_profile")?;
        Ok(s.profile.clone())
    }

    async fn update_user_profile(
        &self,
        _auth: &AuthToken,
        profile: &ProfileUpdate,
    ) -> Result<(), TrainmateError> {
        let mut s = self.state.lock().await;
        s.enter("update_user_profile")?;
        s.profile_updates.push(profile.clone());
        let email = profile.email.clone().or_else(|| s.profile.email.clone());
        s.profile = UserProfile {
            full_name: Some(profile.full_name.clone()),
            gender: Some(profile.gender.clone()),
            weight: Some(f64::from(profile.weight)),
            height: Some(f64::from(profile.height)),
            email,
            birthday: Some(profile.birthday.clone()),
        };
        Ok(())
    }
}
