//! Predicate trees evaluated directly against typed [`Movie`] fields.
//!
//! The grammars in [`crate::grammar`] compile user filter strings into a
//! [`Predicate`]; the query layer ANDs one predicate per attribute together.

use crate::types::{Movie, SENTINEL};

/// Filter result indicating whether a movie should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl From<bool> for FilterResult {
    fn from(keep: bool) -> Self {
        if keep {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}

/// Filter trait for catalog rows
pub trait MovieFilter {
    fn should_keep(&self, movie: &Movie) -> FilterResult;
}

/// Numeric columns a range filter can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Rank,
    DecadeRank,
    Runtime,
    Year,
    Rating,
    Votes,
}

impl NumericField {
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Rank => "rank",
            NumericField::DecadeRank => "decade rank",
            NumericField::Runtime => "runtime",
            NumericField::Year => "year",
            NumericField::Rating => "rating",
            NumericField::Votes => "votes",
        }
    }

    /// Whether the column holds fractional values
    pub fn allows_decimal(self) -> bool {
        matches!(self, NumericField::Rating)
    }

    /// Column value with unset data mapped to [`SENTINEL`]
    pub fn value(self, movie: &Movie) -> f64 {
        let value = match self {
            NumericField::Rank => movie.rank.map(|v| v as f64),
            NumericField::DecadeRank => movie.decade_rank.map(|v| v as f64),
            NumericField::Runtime => movie.runtime.map(|v| v as f64),
            NumericField::Year => movie.year.map(|v| v as f64),
            NumericField::Rating => movie.rating,
            NumericField::Votes => movie.votes.map(|v| v as f64),
        };
        value.unwrap_or(SENTINEL)
    }
}

/// Free-text columns the boolean text grammar can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Director,
    Genre,
    Country,
    Language,
    Cast,
    Writer,
    Producer,
    Cinematographer,
    Editor,
    Composer,
    ProductionCompany,
    Plot,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::Director => "director",
            TextField::Genre => "genre",
            TextField::Country => "country",
            TextField::Language => "language",
            TextField::Cast => "cast",
            TextField::Writer => "writer",
            TextField::Producer => "producer",
            TextField::Cinematographer => "cinematographer",
            TextField::Editor => "editor",
            TextField::Composer => "composer",
            TextField::ProductionCompany => "production company",
            TextField::Plot => "plot",
        }
    }

    pub fn get(self, movie: &Movie) -> &str {
        match self {
            TextField::Director => &movie.director,
            TextField::Genre => &movie.genre,
            TextField::Country => &movie.country,
            TextField::Language => &movie.language,
            TextField::Cast => &movie.cast,
            TextField::Writer => &movie.writer,
            TextField::Producer => &movie.producer,
            TextField::Cinematographer => &movie.cinematographer,
            TextField::Editor => &movie.editor,
            TextField::Composer => &movie.composer,
            TextField::ProductionCompany => &movie.production_company,
            TextField::Plot => &movie.plot,
        }
    }
}

/// Yes/no columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagField {
    Color,
    Silent,
}

impl FlagField {
    pub fn name(self) -> &'static str {
        match self {
            FlagField::Color => "color",
            FlagField::Silent => "silent",
        }
    }

    pub fn get(self, movie: &Movie) -> Option<bool> {
        match self {
            FlagField::Color => movie.color,
            FlagField::Silent => movie.silent,
        }
    }
}

/// Comparison operator of a numeric leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    AtLeast,
    AtMost,
}

/// A boolean expression over one catalog row
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Logical AND; an empty list is always true
    All(Vec<Predicate>),
    /// Logical OR; an empty list is always false
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        field: NumericField,
        op: Comparison,
        value: f64,
    },
    /// Exact match on the decade label
    Decade(String),
    /// Case-insensitive substring test; `needle` is stored lowercased
    Contains { field: TextField, needle: String },
    Flag { field: FlagField, value: bool },
}

impl Predicate {
    /// The predicate that accepts every row
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn compare(field: NumericField, op: Comparison, value: f64) -> Self {
        Predicate::Compare { field, op, value }
    }

    /// `low <= field <= high`
    pub fn between(field: NumericField, low: f64, high: f64) -> Self {
        Predicate::All(vec![
            Predicate::compare(field, Comparison::AtLeast, low),
            Predicate::compare(field, Comparison::AtMost, high),
        ])
    }

    pub fn contains(field: TextField, needle: &str) -> Self {
        Predicate::Contains {
            field,
            needle: needle.to_lowercase(),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Collapse single-element groups so compiled trees stay readable in logs
    pub fn all(mut parts: Vec<Predicate>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Predicate::All(parts)
        }
    }

    pub fn any(mut parts: Vec<Predicate>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Predicate::Any(parts)
        }
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(|p| p.matches(movie)),
            Predicate::Any(parts) => parts.iter().any(|p| p.matches(movie)),
            Predicate::Not(inner) => !inner.matches(movie),
            Predicate::Compare { field, op, value } => {
                let actual = field.value(movie);
                match op {
                    Comparison::Eq => actual == *value,
                    Comparison::AtLeast => actual >= *value,
                    Comparison::AtMost => actual <= *value,
                }
            }
            Predicate::Decade(label) => movie.decade == *label,
            Predicate::Contains { field, needle } => {
                let haystack = field.get(movie);
                // Unset text never contains anything, not even the empty term
                !haystack.is_empty() && haystack.to_lowercase().contains(needle.as_str())
            }
            Predicate::Flag { field, value } => field.get(movie) == Some(*value),
        }
    }
}

impl MovieFilter for Predicate {
    fn should_keep(&self, movie: &Movie) -> FilterResult {
        self.matches(movie).into()
    }
}
