//! Site navigation: the product mega-menu tree and URL breadcrumbs.
//!
//! Both are pure functions over already-fetched data so they can be shared
//! by the HTML pages, the JSON API and tests.

pub mod breadcrumb;
pub mod tree;

pub use breadcrumb::Breadcrumb;
pub use tree::{
    CategoryEntry, CategoryNode, NavTree, NavbarEntry, NavbarNode, SubcategoryEntry,
    SubcategoryNode,
};
