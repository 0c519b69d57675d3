//! AgriSmart - Farmer Registration Library
//!
//! Session state machine, validators and storage backends behind the
//! `agrismart` terminal application.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod cli;

pub use domain::*;
pub use application::*;
