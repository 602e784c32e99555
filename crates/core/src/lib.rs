//! Lovosis Core - Shared types and navigation logic.
//!
//! This crate provides common types used across all Lovosis components:
//! - `site` - Public catalog website and JSON API
//! - `cli` - Command-line tools for migrations, seeding and admin tokens
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, ratings and statuses
//! - [`navigation`] - Mega-menu tree construction and breadcrumb derivation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod navigation;
pub mod types;

pub use navigation::{
    Breadcrumb, CategoryEntry, CategoryNode, NavTree, NavbarEntry, NavbarNode, SubcategoryEntry,
    SubcategoryNode,
};
pub use types::*;
