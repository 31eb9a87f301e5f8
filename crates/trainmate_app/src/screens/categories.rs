//! Categories & exercises manager.

use trainmate_client::{
    Category, CategoryUpdate, Exercise, ExerciseUpdate, NewCategory, NewExercise, validation,
};

use crate::domains::icons::{IconHandle, resolve_icon};
use crate::error::{AppError, AppResult};
use crate::state::{InitOnce, LoadState, Session};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithExercises {
    pub category: Category,
    pub exercises: Vec<Exercise>,
}

impl CategoryWithExercises {
    pub fn icon(&self) -> Option<IconHandle> {
        resolve_icon(&self.category.icon)
    }
}

/// The one dialog that may be open on this screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CategoriesDialog {
    #[default]
    Closed,
    AddCategory,
    AddExercise { category_id: String },
    EditCategory(Category),
    EditExercise(Exercise),
}

pub struct CategoriesScreen {
    session: Session,
    init: InitOnce,
    load_state: LoadState,
    categories: Vec<CategoryWithExercises>,
    dialog: CategoriesDialog,
}

impl CategoriesScreen {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            init: InitOnce::default(),
            load_state: LoadState::Idle,
            categories: Vec::new(),
            dialog: CategoriesDialog::Closed,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn categories(&self) -> &[CategoryWithExercises] {
        &self.categories
    }

    pub fn dialog(&self) -> &CategoriesDialog {
        &self.dialog
    }

    /// Initial load. Runs once; later calls do nothing.
    pub async fn init(&mut self) -> AppResult<()> {
        if !self.init.claim() {
            return Ok(());
        }
        self.refresh().await
    }

    /// Fetch every category and then each category's exercises. A category
    /// whose exercises fail to load stays in the list with no exercises rather
    /// than being dropped from it, so it can still be edited or deleted.
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.load_state = LoadState::Loading;
        let result = self.fetch_all().await;
        self.load_state = LoadState::Loaded;
        self.categories = result?;
        tracing::info!(count = self.categories.len(), "categories loaded");
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<CategoryWithExercises>> {
        let token = self.session.token()?;
        let client = self.session.client();
        let categories = client
            .get_categories(token)
            .await
            .map_err(|e| AppError::remote("get_categories", e))?;

        let mut loaded = Vec::with_capacity(categories.len());
        for category in categories {
            let exercises = client
                .get_exercises_for_category(token, &category.category_id)
                .await
                .map_err(|e| AppError::remote("get_exercises_for_category", e))
                .unwrap_or_default();
            loaded.push(CategoryWithExercises {
                category,
                exercises,
            });
        }
        Ok(loaded)
    }

    fn find(&self, category_id: &str) -> AppResult<&CategoryWithExercises> {
        self.categories
            .iter()
            .find(|c| c.category.category_id == category_id)
            .ok_or_else(|| AppError::NotFound(format!("category {category_id}")))
    }

    fn find_mut(&mut self, category_id: &str) -> AppResult<&mut CategoryWithExercises> {
        self.categories
            .iter_mut()
            .find(|c| c.category.category_id == category_id)
            .ok_or_else(|| AppError::NotFound(format!("category {category_id}")))
    }

    fn find_exercise(&self, category_id: &str, exercise_id: &str) -> AppResult<&Exercise> {
        self.find(category_id)?
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .ok_or_else(|| AppError::NotFound(format!("exercise {exercise_id}")))
    }

    fn editable_category(&self, category_id: &str) -> AppResult<&Category> {
        let category = &self.find(category_id)?.category;
        if !category.is_custom {
            return Err(AppError::ReadOnly(format!(
                "category {} is provided by the system",
                category.name
            )));
        }
        Ok(category)
    }

    fn editable_exercise(&self, category_id: &str, exercise_id: &str) -> AppResult<&Exercise> {
        let exercise = self.find_exercise(category_id, exercise_id)?;
        if exercise.public {
            return Err(AppError::ReadOnly(format!(
                "exercise {} is provided by the system",
                exercise.name
            )));
        }
        Ok(exercise)
    }

    // === Dialogs ===

    pub fn open_add_category(&mut self) {
        self.dialog = CategoriesDialog::AddCategory;
    }

    pub fn open_add_exercise(&mut self, category_id: &str) -> AppResult<()> {
        self.find(category_id)?;
        self.dialog = CategoriesDialog::AddExercise {
            category_id: category_id.to_string(),
        };
        Ok(())
    }

    pub fn open_edit_category(&mut self, category_id: &str) -> AppResult<()> {
        let category = self.editable_category(category_id)?.clone();
        self.dialog = CategoriesDialog::EditCategory(category);
        Ok(())
    }

    pub fn open_edit_exercise(&mut self, category_id: &str, exercise_id: &str) -> AppResult<()> {
        let exercise = self.editable_exercise(category_id, exercise_id)?.clone();
        self.dialog = CategoriesDialog::EditExercise(exercise);
        Ok(())
    }

    pub fn close_dialog(&mut self) {
        self.dialog = CategoriesDialog::Closed;
    }

    // === Mutations ===

    pub async fn add_category(&mut self, new: NewCategory) -> AppResult<Category> {
        validation::validate_payload(&new).map_err(AppError::invalid)?;
        let token = self.session.token()?;
        let created = self
            .session
            .client()
            .create_category(token, &new)
            .await
            .map_err(|e| AppError::remote("create_category", e))?;
        tracing::info!(
            category_id = %created.category_id,
            name = %created.name,
            "category created"
        );
        self.categories.push(CategoryWithExercises {
            category: created.clone(),
            exercises: Vec::new(),
        });
        self.close_dialog();
        Ok(created)
    }

    pub async fn add_exercise(&mut self, new: NewExercise) -> AppResult<Exercise> {
        validation::validate_payload(&new).map_err(AppError::invalid)?;
        self.find(&new.category_id)?;
        let token = self.session.token()?;
        let created = self
            .session
            .client()
            .create_exercise(token, &new)
            .await
            .map_err(|e| AppError::remote("create_exercise", e))?;
        tracing::info!(
            exercise_id = %created.exercise_id,
            category_id = %new.category_id,
            "exercise created"
        );
        self.find_mut(&new.category_id)?
            .exercises
            .push(created.clone());
        self.close_dialog();
        Ok(created)
    }

    pub async fn edit_category(
        &mut self,
        category_id: &str,
        update: CategoryUpdate,
    ) -> AppResult<()> {
        validation::validate_payload(&update).map_err(AppError::invalid)?;
        self.editable_category(category_id)?;
        let token = self.session.token()?;
        self.session
            .client()
            .update_category(token, category_id, &update)
            .await
            .map_err(|e| AppError::remote("update_category", e))?;
        tracing::info!(%category_id, "category updated");
        let entry = self.find_mut(category_id)?;
        entry.category.name = update.name;
        entry.category.icon = update.icon;
        self.close_dialog();
        Ok(())
    }

    pub async fn edit_exercise(
        &mut self,
        category_id: &str,
        exercise_id: &str,
        update: ExerciseUpdate,
    ) -> AppResult<()> {
        validation::validate_payload(&update).map_err(AppError::invalid)?;
        self.editable_exercise(category_id, exercise_id)?;
        let token = self.session.token()?;
        self.session
            .client()
            .update_exercise(token, exercise_id, &update)
            .await
            .map_err(|e| AppError::remote("update_exercise", e))?;
        tracing::info!(%exercise_id, "exercise updated");
        if let Some(exercise) = self
            .find_mut(category_id)?
            .exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
        {
            exercise.name = update.name;
            exercise.calories_per_hour = update.calories_per_hour;
        }
        self.close_dialog();
        Ok(())
    }

    pub async fn delete_category(&mut self, category_id: &str) -> AppResult<()> {
        self.editable_category(category_id)?;
        let token = self.session.token()?;
        self.session
            .client()
            .delete_category(token, category_id)
            .await
            .map_err(|e| AppError::remote("delete_category", e))?;
        tracing::info!(%category_id, "category deleted");
        self.categories.retain(|c| c.category.category_id != category_id);
        Ok(())
    }

    pub async fn delete_exercise(&mut self, category_id: &str, exercise_id: &str) -> AppResult<()> {
        self.editable_exercise(category_id, exercise_id)?;
        let token = self.session.token()?;
        self.session
            .client()
            .delete_exercise(token, exercise_id)
            .await
            .map_err(|e| AppError::remote("delete_exercise", e))?;
        tracing::info!(%exercise_id, "exercise deleted");
        self.find_mut(category_id)?
            .exercises
            .retain(|e| e.exercise_id != exercise_id);
        Ok(())
    }
}
