//! HTTP client implementation for the TrainMate API.
//!
//! This module provides a reqwest-based implementation of the [`TrainmateClient`](crate::TrainmateClient) trait.

use crate::observability::{record_failure, record_request, record_skipped};
use crate::utils::format_query_date;
use crate::{
    AuthToken, CalorieRecord, Category, CategoryUpdate, Coach, Exercise, ExerciseUpdate,
    NewCategory, NewExercise, NewWorkout, ProfileUpdate, TrainmateClient, TrainmateError,
    UserProfile, Workout, validation,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Client for the TrainMate API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestTrainmateClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestTrainmateClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the TrainMate API (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self, TrainmateError> {
        let client = reqwest::Client::builder().gzip(true).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_request(&self, auth: &AuthToken, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).bearer_auth(auth.expose())
    }

    fn post_request(&self, auth: &AuthToken, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).bearer_auth(auth.expose())
    }

    fn put_request(&self, auth: &AuthToken, url: &str) -> reqwest::RequestBuilder {
        self.client.put(url).bearer_auth(auth.expose())
    }

    fn delete_request(&self, auth: &AuthToken, url: &str) -> reqwest::RequestBuilder {
        self.client.delete(url).bearer_auth(auth.expose())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TrainmateError> {
        record_request(operation);
        let result = Self::send_json(request).await;
        if let Err(e) = &result {
            record_failure(operation, e);
        }
        result
    }

    /// Execute a request whose response body is ignored.
    async fn execute_empty(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), TrainmateError> {
        record_request(operation);
        let result = Self::send_checked(request).await.map(|_| ());
        if let Err(e) = &result {
            record_failure(operation, e);
        }
        result
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, TrainmateError> {
        let resp = Self::send_checked(request).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Send the request and turn non-2xx statuses into errors.
    async fn send_checked(
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TrainmateError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> TrainmateError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => TrainmateError::NotFound(body_snippet),
            401 | 403 => TrainmateError::Auth(body_snippet),
            400 | 422 => TrainmateError::InvalidInput(body_snippet),
            _ => TrainmateError::from_status(status, body_snippet),
        }
    }

    /// Decode list entries one at a time, dropping the ones that do not fit
    /// `T` so a single bad record cannot hide the rest.
    fn decode_each<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        items: Vec<serde_json::Value>,
    ) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!(operation, index, error = %e, "skipping undecodable record");
                    record_skipped(operation);
                    None
                }
            })
            .collect()
    }

    fn date_range_query(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = start {
            pairs.push(("startDate", format_query_date(start)));
        }
        if let Some(end) = end {
            pairs.push(("endDate", format_query_date(end)));
        }
        pairs
    }
}

#[async_trait]
impl TrainmateClient for ReqwestTrainmateClient {
    async fn get_categories(&self, auth: &AuthToken) -> Result<Vec<Category>, TrainmateError> {
        let url = self.url("/categories");
        tracing::debug!(%url, "fetching categories");
        self.execute_json("get_categories", self.get_request(auth, &url))
            .await
    }

    async fn create_category(
        &self,
        auth: &AuthToken,
        category: &NewCategory,
    ) -> Result<Category, TrainmateError> {
        validation::validate_payload(category)?;
        let url = self.url("/categories");
        self.execute_json("create_category", self.post_request(auth, &url).json(category))
            .await
    }

    async fn update_category(
        &self,
        auth: &AuthToken,
        category_id: &str,
        update: &CategoryUpdate,
    ) -> Result<(), TrainmateError> {
        validation::validate_payload(update)?;
        let url = self.url(&format!("/categories/{category_id}"));
        self.execute_empty("update_category", self.put_request(auth, &url).json(update))
            .await
    }

    async fn delete_category(
        &self,
        auth: &AuthToken,
        category_id: &str,
    ) -> Result<(), TrainmateError> {
        let url = self.url(&format!("/categories/{category_id}"));
        self.execute_empty("delete_category", self.delete_request(auth, &url))
            .await
    }

    async fn get_exercises_for_category(
        &self,
        auth: &AuthToken,
        category_id: &str,
    ) -> Result<Vec<Exercise>, TrainmateError> {
        if category_id.trim().is_empty() {
            return Err(TrainmateError::InvalidInput(
                "category_id must not be empty".into(),
            ));
        }
        let url = self.url(&format!("/categories/{category_id}/exercises"));
        tracing::debug!(%url, "fetching exercises");
        self.execute_json("get_exercises_for_category", self.get_request(auth, &url))
            .await
    }

    async fn create_exercise(
        &self,
        auth: &AuthToken,
        exercise: &NewExercise,
    ) -> Result<Exercise, TrainmateError> {
        validation::validate_payload(exercise)?;
        let url = self.url("/exercises");
        self.execute_json("create_exercise", self.post_request(auth, &url).json(exercise))
            .await
    }

    async fn update_exercise(
        &self,
        auth: &AuthToken,
        exercise_id: &str,
        update: &ExerciseUpdate,
    ) -> Result<(), TrainmateError> {
        validation::validate_payload(update)?;
        let url = self.url(&format!("/exercises/{exercise_id}"));
        self.execute_empty("update_exercise", self.put_request(auth, &url).json(update))
            .await
    }

    async fn delete_exercise(
        &self,
        auth: &AuthToken,
        exercise_id: &str,
    ) -> Result<(), TrainmateError> {
        let url = self.url(&format!("/exercises/{exercise_id}"));
        self.execute_empty("delete_exercise", self.delete_request(auth, &url))
            .await
    }

    async fn get_workouts(
        &self,
        auth: &AuthToken,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Workout>, TrainmateError> {
        let url = self.url("/workouts");
        let qp = Self::date_range_query(start, end);
        tracing::debug!(%url, ?qp, "fetching workouts");
        let items: Vec<serde_json::Value> = self
            .execute_json("get_workouts", self.get_request(auth, &url).query(&qp))
            .await?;
        Ok(Self::decode_each("get_workouts", items))
    }

    async fn create_workout(
        &self,
        auth: &AuthToken,
        workout: &NewWorkout,
    ) -> Result<(), TrainmateError> {
        validation::validate_payload(workout)?;
        let url = self.url("/workouts");
        self.execute_empty("create_workout", self.post_request(auth, &url).json(workout))
            .await
    }

    async fn get_workout_calories(
        &self,
        auth: &AuthToken,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieRecord>, TrainmateError> {
        #[derive(serde::Deserialize)]
        struct CaloriesPayload {
            #[serde(default)]
            workouts_calories_and_dates: Option<serde_json::Value>,
        }

        let url = self.url("/workouts/calories");
        let qp = Self::date_range_query(start, end);
        let payload: CaloriesPayload = self
            .execute_json("get_workout_calories", self.get_request(auth, &url).query(&qp))
            .await?;

        // Anything other than an array means "no data", matching the list endpoints.
        match payload.workouts_calories_and_dates {
            Some(serde_json::Value::Array(items)) => Ok(items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let kind = json_kind(&item);
                    let record = CalorieRecord::from_raw(item);
                    if record.is_none() {
                        tracing::warn!(index, kind, "skipping calorie entry that is not an object");
                        record_skipped("get_workout_calories");
                    }
                    record
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn get_coaches(&self, auth: &AuthToken) -> Result<Vec<Coach>, TrainmateError> {
        let url = self.url("/coaches");
        self.execute_json("get_coaches", self.get_request(auth, &url))
            .await
    }

    async fn get_user_profile(&self, auth: &AuthToken) -> Result<UserProfile, TrainmateError> {
        let url = self.url("/user");
        self.execute_json("get_user_profile", self.get_request(auth, &url))
            .await
    }

    async fn update_user_profile(
        &self,
        auth: &AuthToken,
        profile: &ProfileUpdate,
    ) -> Result<(), TrainmateError> {
        validation::validate_payload(profile)?;
        let url = self.url("/user");
        self.execute_empty("update_user_profile", self.put_request(auth, &url).json(profile))
            .await
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_trims_trailing_slash() {
        let client = ReqwestTrainmateClient::new("http://localhost/").expect("client");
        assert_eq!(client.url("/coaches"), "http://localhost/coaches");
    }

    #[test]
    fn date_range_query_skips_open_bounds() {
        let end = NaiveDate::from_ymd_opt(2024, 5, 12);
        let qp = ReqwestTrainmateClient::date_range_query(None, end);
        assert_eq!(qp, vec![("endDate", "2024-05-12".to_string())]);
        assert!(ReqwestTrainmateClient::date_range_query(None, None).is_empty());
    }

    #[test]
    fn decode_each_drops_only_the_bad_entries() {
        let items = vec![
            serde_json::json!({"id": 1, "exercise": "Running", "duration": 30}),
            serde_json::json!({"id": 2, "exercise": "Rowing", "duration": "n/a"}),
            serde_json::json!({"exercise": "Cycling", "duration": 20}),
            serde_json::json!("garbage"),
            serde_json::json!({"id": "w5", "calories": "120"}),
        ];
        let decoded: Vec<Workout> = ReqwestTrainmateClient::decode_each("get_workouts", items);
        let ids: Vec<&str> = decoded.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "w5"]);
        assert_eq!(decoded[1].calories, Some(120.0));
    }
}
