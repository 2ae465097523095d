//! # mortydex
//!
//! Terminal catalog browser for the Rick and Morty GraphQL API.
//!
//! A local profile (username and job title) gates the catalog. It is kept in a
//! small key-value file in the user's home directory and never leaves the
//! machine. Listings are paged with a compact page window and each character
//! opens in a detail view that remembers the listing page underneath.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod menu;
pub mod navigation;
pub mod pagination;
pub mod profile;
pub mod session;
pub mod storage;
pub mod validation;

pub use error::AppError;
pub use pagination::{PageItem, PageWindow, compute_window};
pub use profile::UserProfile;
pub use session::{SessionState, SessionStore};
