//! Pool membership: taking movies out of the selection pool and putting them back.
//!
//! These functions only touch the in-memory [`Catalog`]; the command layer
//! loads it before and persists it after.

use crate::error::{Error, Result};
use crate::types::{Catalog, Movie};
use chrono::NaiveDateTime;
use tracing::info;

/// Take a movie out of the pool, stamping the removal time.
pub fn remove<'a>(catalog: &'a mut Catalog, id: &str, now: NaiveDateTime) -> Result<&'a Movie> {
    let movie = catalog
        .find_mut(id)
        .ok_or_else(|| Error::NotFound(id.trim().to_string()))?;

    if !movie.in_pool {
        return Err(Error::AlreadyRemoved(movie.id.clone()));
    }

    movie.in_pool = false;
    movie.removed_at = Some(now);
    info!(id = %movie.id, title = %movie.title, "removed movie from pool");
    Ok(movie)
}

/// Put every movie back in the pool. Returns how many were out.
pub fn reset(catalog: &mut Catalog) -> usize {
    let mut restored = 0;
    for movie in catalog.movies.iter_mut().filter(|m| m.is_listed() && !m.in_pool) {
        movie.in_pool = true;
        restored += 1;
    }
    info!(restored, "pool reset");
    restored
}

/// Movies out of the pool, oldest removal first.
///
/// Rows without a timestamp sort last; ties keep catalog order.
pub fn list_removed(catalog: &Catalog) -> Vec<&Movie> {
    let mut removed: Vec<&Movie> = catalog.listed().filter(|m| !m.in_pool).collect();
    removed.sort_by(|a, b| match (a.removed_at, b.removed_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    removed
}
