//! Ratings shared by unrelated kinds.
//!
//! A rating row points at its owner through `rateable_type` plus
//! `rateable_id`; any domain struct implementing [`Rateable`] can own ratings
//! without a dedicated foreign key.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::rating::{self, Rating, RatingCreate};

/// Highest score a rating can carry.
pub const MAX_RATING: f64 = 5.0;

pub trait Rateable {
    /// Stored in `ratings.rateable_type`.
    const RATEABLE_TYPE: &'static str;

    fn rateable_id(&self) -> i32;
}

/// Ratings for every owner in `ids`, grouped by owner and ordered by id.
///
/// # Errors
///
/// Propagates database failures.
pub async fn ratings_for<R: Rateable>(
    db: &impl ConnectionTrait,
    ids: &[i32],
) -> Result<HashMap<i32, Vec<Rating>>, DbErr> {
    let mut grouped: HashMap<i32, Vec<Rating>> = HashMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }
    let rows = rating::Entity::find()
        .filter(rating::Column::RateableType.eq(R::RATEABLE_TYPE))
        .filter(rating::Column::RateableId.is_in(ids.iter().copied()))
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?;
    for row in rows {
        grouped
            .entry(row.rateable_id)
            .or_default()
            .push(Rating::from(row));
    }
    Ok(grouped)
}

/// # Errors
///
/// Propagates database failures.
pub async fn add_rating<R: Rateable + Sync>(
    db: &impl ConnectionTrait,
    owner: &R,
    payload: RatingCreate,
) -> Result<Rating, DbErr> {
    let model = payload
        .into_active_model(R::RATEABLE_TYPE, owner.rateable_id())
        .insert(db)
        .await?;
    tracing::debug!(
        owner = R::RATEABLE_TYPE,
        owner_id = owner.rateable_id(),
        rating_id = model.id,
        "rating added"
    );
    Ok(Rating::from(model))
}

/// A rating belonging to `owner`; ratings of other owners are reported as
/// missing.
///
/// # Errors
///
/// `DbErr::RecordNotFound("Rating not found")` when no such rating belongs
/// to `owner`.
pub async fn find_rating<R: Rateable + Sync>(
    db: &impl ConnectionTrait,
    owner: &R,
    rating_id: i32,
) -> Result<Rating, DbErr> {
    rating::Entity::find_by_id(rating_id)
        .filter(rating::Column::RateableType.eq(R::RATEABLE_TYPE))
        .filter(rating::Column::RateableId.eq(owner.rateable_id()))
        .one(db)
        .await?
        .map(Rating::from)
        .ok_or_else(|| DbErr::RecordNotFound("Rating not found".to_owned()))
}

/// Removes one rating of `owner`.
///
/// # Errors
///
/// `DbErr::RecordNotFound("Rating not found")` when no such rating belongs
/// to `owner`.
pub async fn delete_rating<R: Rateable + Sync>(
    db: &impl ConnectionTrait,
    owner: &R,
    rating_id: i32,
) -> Result<(), DbErr> {
    let rating = find_rating(db, owner, rating_id).await?;
    rating::Entity::delete_by_id(rating.id).exec(db).await?;
    tracing::debug!(
        owner = R::RATEABLE_TYPE,
        owner_id = owner.rateable_id(),
        rating_id,
        "rating deleted"
    );
    Ok(())
}

/// Removes every rating owned by one of `ids`.
///
/// # Errors
///
/// Propagates database failures.
pub async fn delete_ratings<R: Rateable>(
    db: &impl ConnectionTrait,
    ids: &[i32],
) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = rating::Entity::delete_many()
        .filter(rating::Column::RateableType.eq(R::RATEABLE_TYPE))
        .filter(rating::Column::RateableId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// API path of a rating's owner, used for the rating's links.
#[must_use]
pub fn owner_path(rateable_type: &str, rateable_id: i32) -> String {
    match rateable_type {
        "author" => format!("/authors/{rateable_id}"),
        "book" => format!("/books/{rateable_id}"),
        other => format!("/{other}s/{rateable_id}"),
    }
}

/// Aggregate score over a set of ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub max: f64,
    pub percent: f64,
    pub count: usize,
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self {
            average: 0.0,
            max: MAX_RATING,
            percent: 0.0,
            count: 0,
        }
    }
}

impl RatingSummary {
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let total: i64 = ratings.iter().map(|rating| i64::from(rating.value)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = total as f64 / ratings.len() as f64;
        Self {
            average: round2(average),
            max: MAX_RATING,
            percent: round2(average / MAX_RATING * 100.0),
            count: ratings.len(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rating(value: i32) -> Rating {
        let now = Utc::now();
        Rating {
            id: 1,
            value,
            rateable_type: "author".into(),
            rateable_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_of_no_ratings() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.average.abs() < f64::EPSILON);
        assert!((summary.max - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_rounds_to_two_places() {
        let summary = RatingSummary::from_ratings(&[rating(5), rating(4), rating(4)]);
        assert_eq!(summary.count, 3);
        assert!((summary.average - 4.33).abs() < 1e-9);
        assert!((summary.percent - 86.67).abs() < 1e-9);
    }

    #[test]
    fn test_owner_path() {
        assert_eq!(owner_path("author", 3), "/authors/3");
        assert_eq!(owner_path("book", 7), "/books/7");
    }
}
