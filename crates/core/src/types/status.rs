//! Status enums for visitor submissions.

use serde::{Deserialize, Serialize};

/// Kind of item a review is attached to.
///
/// Reviews are stored against an `(item_id, item_type)` pair. The column is
/// plain `TEXT`; repositories bind [`ToString`] and parse with [`FromStr`].
///
/// [`FromStr`]: std::str::FromStr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewItemType {
    #[default]
    Product,
}

impl std::fmt::Display for ReviewItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
        }
    }
}

impl std::str::FromStr for ReviewItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            _ => Err(format!("invalid item type: {s}")),
        }
    }
}

/// Follow-up state of a catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogRequestStatus {
    /// Newly submitted, nobody has followed up yet.
    #[default]
    Pending,
    /// Sales has reached out to the requester.
    Contacted,
    /// Catalog delivered or request closed.
    Completed,
}

impl std::fmt::Display for CatalogRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Contacted => write!(f, "contacted"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for CatalogRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid catalog request status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_parse_and_display() {
        assert_eq!("product".parse::<ReviewItemType>(), Ok(ReviewItemType::Product));
        assert!("blog".parse::<ReviewItemType>().is_err());
        assert_eq!(ReviewItemType::Product.to_string(), "product");
    }

    #[test]
    fn test_catalog_request_status_roundtrip() {
        for status in [
            CatalogRequestStatus::Pending,
            CatalogRequestStatus::Contacted,
            CatalogRequestStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<CatalogRequestStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_item_type_serde_is_snake_case() {
        let json = serde_json::to_string(&ReviewItemType::Product).unwrap_or_default();
        assert_eq!(json, "\"product\"");
    }
}
