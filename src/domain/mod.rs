//! Domain layer: farmer records, validation rules, translations and the
//! storage seam.

pub mod models;
pub mod validation;
pub mod i18n;
pub mod store;
pub mod errors;

pub use models::*;
pub use validation::*;
pub use i18n::*;
pub use store::*;
pub use errors::*;
