use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder substituted for unset numeric values before comparison.
/// Every filter bound is non-negative, so the sentinel never satisfies one.
pub const SENTINEL: f64 = -1.0;

/// One row of the movie catalog
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Movie {
    pub id: String,
    pub rank: Option<i64>,
    pub decade_rank: Option<i64>,
    pub title: String,
    pub director: String,
    /// Runtime in minutes
    pub runtime: Option<i64>,
    pub genre: String,
    pub year: Option<i64>,
    /// Decade label such as `1980s`
    pub decade: String,
    pub country: String,
    pub language: String,
    pub color: Option<bool>,
    pub silent: Option<bool>,
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub cast: String,
    pub writer: String,
    pub producer: String,
    pub cinematographer: String,
    pub editor: String,
    pub composer: String,
    pub production_company: String,
    pub plot: String,
    pub in_pool: bool,
    /// When the movie was last taken out of the pool
    pub removed_at: Option<NaiveDateTime>,
    /// Columns the catalog carries that the tool does not interpret
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
    /// Cells exactly as read from the catalog file, in file column order
    #[serde(skip)]
    pub source: Vec<String>,
}

impl Movie {
    /// Decade label for a release year, e.g. 1994 -> `1990s`.
    pub fn decade_label(year: i64) -> String {
        format!("{}s", year.div_euclid(10) * 10)
    }

    /// Rows without an ID stay in the file but can't be selected or removed
    pub fn is_listed(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Lookup key for an ID: numeric IDs compare by value, so `007` is `7`
pub fn id_key(id: &str) -> String {
    let id = id.trim();
    match id.parse::<u64>() {
        Ok(n) => n.to_string(),
        Err(_) => id.to_string(),
    }
}

/// The whole catalog as loaded from storage
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Column names in file order, written back unchanged on save
    pub columns: Vec<String>,
    pub movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(columns: Vec<String>, movies: Vec<Movie>) -> Self {
        Self { columns, movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Movie> {
        let key = id_key(id);
        self.listed().find(|m| id_key(&m.id) == key)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Movie> {
        let key = id_key(id);
        self.movies
            .iter_mut()
            .filter(|m| m.is_listed())
            .find(|m| id_key(&m.id) == key)
    }

    /// Rows that carry an ID
    pub fn listed(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter().filter(|m| m.is_listed())
    }

    /// Movies currently eligible for selection
    pub fn pool(&self) -> impl Iterator<Item = &Movie> {
        self.listed().filter(|m| m.in_pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decade_label() {
        assert_eq!(Movie::decade_label(1994), "1990s");
        assert_eq!(Movie::decade_label(2000), "2000s");
        assert_eq!(Movie::decade_label(1989), "1980s");
    }

    #[test]
    fn test_find_trims_id() {
        let catalog = Catalog::new(
            vec!["ID".to_string()],
            vec![Movie {
                id: "42".to_string(),
                ..Default::default()
            }],
        );
        assert!(catalog.find(" 42 ").is_some());
        assert!(catalog.find("7").is_none());
    }

    #[test]
    fn test_find_numeric_ids_by_value() {
        let mut catalog = Catalog::new(
            vec!["ID".to_string()],
            vec![
                Movie {
                    id: "7".to_string(),
                    ..Default::default()
                },
                Movie {
                    id: "tt0078748".to_string(),
                    ..Default::default()
                },
            ],
        );
        assert_eq!(catalog.find("007").map(|m| m.id.as_str()), Some("7"));
        assert!(catalog.find_mut("0007").is_some());
        assert!(catalog.find("tt0078748").is_some());
        assert!(catalog.find("tt78748").is_none());
    }

    #[test]
    fn test_rows_without_id_are_not_listed() {
        let catalog = Catalog::new(
            vec!["ID".to_string()],
            vec![
                Movie {
                    title: "Untitled draft".to_string(),
                    in_pool: true,
                    ..Default::default()
                },
                Movie {
                    id: "1".to_string(),
                    in_pool: true,
                    ..Default::default()
                },
            ],
        );
        assert!(catalog.find("").is_none());
        assert!(catalog.find("  ").is_none());
        assert_eq!(catalog.pool().count(), 1);
        assert_eq!(catalog.len(), 2);
    }
}
