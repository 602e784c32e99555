//! Domain models for the site database.
//!
//! Catalog models decode straight from rows. Submission models go through a
//! private row type in their repository so text columns can be validated on
//! the way out.

pub mod catalog;
pub mod submissions;

pub use catalog::{Category, NavbarCategory, Product, ProductSummary, Subcategory};
pub use submissions::{CatalogRequest, ContactMessage, NewsletterSubscriber, Review, StoredFile};
