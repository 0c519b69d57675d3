//! Infrastructure layer providing external service integrations.
//!
//! This module contains the backends behind the `FarmerStore` seam: a local
//! JSON document store and the Firebase REST client.

pub mod firebase;
pub mod persistence;

pub use firebase::*;
pub use persistence::*;
