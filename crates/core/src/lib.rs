//! Store admin core - shared types library.
//!
//! This crate provides the types used across all components:
//! - `admin` - Owner dashboard and the store-scoped JSON API
//! - `storefront` - Public catalog pages rendered from the admin API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere,
//! including by any client that wants to validate input before sending it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and validated text
//! - [`catalog`] - Entities and read projections as they appear in JSON
//! - [`resource`] - The resource kinds and their naming
//! - [`validation`] - Field contracts shared by server and client
//! - [`form`] - The form lifecycle state machine and select options

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod form;
pub mod resource;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use form::{
    DeleteError, Effect, FormController, FormState, Notice, NoticeLevel, RequestFailure,
    SelectOption, Submission, SubmitError,
};
pub use resource::Resource;
pub use types::*;
pub use validation::*;
