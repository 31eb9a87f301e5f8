//! Screen view models. Each owns its local state, loads once through
//! `init()` and mutates that state only after the remote call succeeds.

pub mod categories;
pub mod home;
pub mod profile;

pub use categories::{CategoriesDialog, CategoriesScreen, CategoryWithExercises};
pub use home::{HomeDialog, HomeScreen, WorkoutDraft, WorkoutRow};
pub use profile::{ProfileForm, ProfileScreen, ProfileValidation};
