//! TrainMate screens and the domain logic behind them.

pub mod domains;
pub mod error;
pub mod screens;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use error::{AppError, AppResult};
pub use state::{LoadState, Session};
