//! Star rating attached to a review.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between {min} and {max} (got {value})", min = Rating::MIN, max = Rating::MAX)]
pub struct RatingError {
    /// The rejected value.
    pub value: i64,
}

/// A review rating from 1 to 5 stars.
///
/// ```
/// use lovosis_core::Rating;
///
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i16")]
pub struct Rating(i16);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: i16 = 1;
    /// Highest accepted rating.
    pub const MAX: i16 = 5;

    /// Create a rating, rejecting values outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] if the value is out of range.
    pub fn new(value: i64) -> Result<Self, RatingError> {
        i16::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(RatingError { value })
    }

    /// Get the underlying number of stars.
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }

    /// Average a set of ratings, returning `None` when there are none.
    #[must_use]
    pub fn average<I>(ratings: I) -> Option<f64>
    where
        I: IntoIterator<Item = Self>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_i64, 0_u32), |(sum, count), r| {
                (sum + i64::from(r.0), count + 1)
            });

        if count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)] // sums of 1-5 star ratings stay far below 2^52
        let avg = sum as f64 / f64::from(count);
        Some(avg)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Rating {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i16 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Rating {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i16 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(i64::from(raw))?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Rating {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i16 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_one_through_five() {
        for stars in 1..=5 {
            assert_eq!(Rating::new(stars).unwrap().value(), i16::try_from(stars).unwrap());
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(Rating::new(0), Err(RatingError { value: 0 }));
        assert_eq!(Rating::new(6), Err(RatingError { value: 6 }));
        assert!(Rating::new(-3).is_err());
        assert!(Rating::new(i64::MAX).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_average() {
        assert_eq!(Rating::average(Vec::new()), None);

        let ratings = [4, 5, 3].map(|r| Rating::new(r).unwrap());
        let avg = Rating::average(ratings).unwrap();
        assert!((avg - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_message() {
        let err = Rating::new(7).unwrap_err();
        assert_eq!(err.to_string(), "rating must be between 1 and 5 (got 7)");
    }
}
