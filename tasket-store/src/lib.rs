//! tasket-store: file-backed task source (CSV) and daily state store (JSON)

pub mod error;
pub mod task_csv;
pub mod user_state;

pub use error::{Result, StoreError};
pub use task_csv::CsvTaskStore;
pub use user_state::JsonStateStore;
