//! Row models of the harmonization pipeline
//!
//! Source rows are decoded from the input tables, output rows are encoded
//! back into Arrow record batches. See [`traits`] for both directions.

pub mod budget;
pub mod country;
pub mod reference;
pub mod study;
pub mod traits;

pub use budget::{BudgetRecord, BudgetRow, RemainingBudget};
pub use country::CountryRow;
pub use study::{CatalogEntry, StudyField, StudyRecord};
pub use traits::{ArrowSchema, SourceTable};
