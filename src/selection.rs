use crate::error::{Error, Result};
use crate::filter::{FilterResult, MovieFilter};
use crate::types::{Catalog, Movie};
use rand::seq::SliceRandom;
use rand::Rng;
use std::str::FromStr;
use tracing::debug;

/// How many movies a `get` should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    /// One movie picked uniformly at random
    #[default]
    One,
    /// N distinct movies picked without replacement
    Exactly(usize),
    /// Every match, in catalog order
    All,
}

impl FromStr for Count {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("all") {
            return Ok(Count::All);
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCount(token.to_string()));
        }
        // Digits too long for usize are still a count, just one no pool can satisfy
        let n = token.parse::<usize>().unwrap_or(usize::MAX);
        if n == 0 {
            return Err(Error::InvalidCount(token.to_string()));
        }
        Ok(Count::Exactly(n))
    }
}

/// Result of running a query against the pool
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    /// Nothing in the pool satisfies the filters
    NoMatches,
    Picked {
        movies: Vec<&'a Movie>,
        /// Number of pool movies that matched, before sampling
        pool_size: usize,
    },
}

/// Apply `filter` to the movies in the pool and sample according to `count`.
pub fn select<'a, F, R>(
    catalog: &'a Catalog,
    filter: &F,
    count: Count,
    rng: &mut R,
) -> Result<Selection<'a>>
where
    F: MovieFilter + ?Sized,
    R: Rng + ?Sized,
{
    if count == Count::Exactly(0) {
        return Err(Error::InvalidCount("0".to_string()));
    }

    let matches: Vec<&Movie> = catalog
        .pool()
        .filter(|movie| filter.should_keep(movie) == FilterResult::Keep)
        .collect();
    let pool_size = matches.len();
    debug!(pool_size, catalog = catalog.len(), ?count, "filtered pool");

    if matches.is_empty() {
        return Ok(Selection::NoMatches);
    }

    let movies: Vec<&Movie> = match count {
        Count::One => matches.choose(rng).copied().into_iter().collect(),
        Count::Exactly(n) if n > pool_size => {
            return Err(Error::CountTooLarge {
                requested: n,
                available: pool_size,
            })
        }
        Count::Exactly(n) => matches.choose_multiple(rng, n).copied().collect(),
        Count::All => matches,
    };

    Ok(Selection::Picked { movies, pool_size })
}
