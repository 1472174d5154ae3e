use crate::error::{Error, Result};
use crate::filter::{Comparison, NumericField, Predicate};
use regex::Regex;

pub const USAGE_HINT: &str = "1980s (decade), 1980-1989 (range), 1994 (exact), 2000+ (after)";

enum YearToken {
    Decade(String),
    Range(i64, i64),
    Since(i64),
    Until(i64),
    Exact(i64),
}

struct YearGrammar {
    decade: Regex,
    range: Regex,
    open: Regex,
    exact: Regex,
}

impl YearGrammar {
    fn new() -> Result<Self> {
        Ok(Self {
            decade: Regex::new(r"^\d{4}s$")?,
            range: Regex::new(r"^(\d{4})-(\d{4})$")?,
            open: Regex::new(r"^(\d{4})([-+])$")?,
            exact: Regex::new(r"^\d{4}$")?,
        })
    }

    /// Forms are tried in order; `1980s` must hit the decade form first.
    fn parse(&self, token: &str) -> Option<YearToken> {
        if self.decade.is_match(token) {
            return Some(YearToken::Decade(token.to_string()));
        }
        if let Some(caps) = self.range.captures(token) {
            return Some(YearToken::Range(caps[1].parse().ok()?, caps[2].parse().ok()?));
        }
        if let Some(caps) = self.open.captures(token) {
            let year = caps[1].parse().ok()?;
            return Some(if &caps[2] == "+" {
                YearToken::Since(year)
            } else {
                YearToken::Until(year)
            });
        }
        if self.exact.is_match(token) {
            return Some(YearToken::Exact(token.parse().ok()?));
        }
        None
    }
}

impl From<YearToken> for Predicate {
    fn from(token: YearToken) -> Self {
        let year = NumericField::Year;
        match token {
            YearToken::Decade(label) => Predicate::Decade(label),
            YearToken::Range(start, end) => Predicate::between(year, start as f64, end as f64),
            YearToken::Since(start) => Predicate::compare(year, Comparison::AtLeast, start as f64),
            YearToken::Until(end) => Predicate::All(vec![
                Predicate::compare(year, Comparison::AtMost, end as f64),
                Predicate::compare(year, Comparison::AtLeast, 0.0),
            ]),
            YearToken::Exact(y) => Predicate::compare(year, Comparison::Eq, y as f64),
        }
    }
}

/// Compile a comma-separated list of year tokens (`1980s`, `1980-1989`,
/// `2000+`, `1999-`, `1994`) into one OR'd predicate.
pub fn compile_year_filter(expression: &str) -> Result<Predicate> {
    let grammar = YearGrammar::new()?;

    let alternatives = expression
        .split(',')
        .map(str::trim)
        .map(|token| {
            grammar.parse(token).map(Predicate::from).ok_or_else(|| Error::Format {
                field: "year",
                token: token.to_string(),
                hint: USAGE_HINT,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Predicate::any(alternatives))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Movie;

    fn released(year: i64) -> Movie {
        Movie {
            year: Some(year),
            decade: Movie::decade_label(year),
            ..Default::default()
        }
    }

    #[test]
    fn test_decade_is_not_an_exact_year() {
        let p = compile_year_filter("1980s").unwrap();
        assert_eq!(p, Predicate::Decade("1980s".to_string()));
        assert!(p.matches(&released(1984)));
        assert!(!p.matches(&released(1990)));
    }

    #[test]
    fn test_decade_matches_explicit_range() {
        let decade = compile_year_filter("1980s").unwrap();
        let range = compile_year_filter("1980-1989").unwrap();
        for year in 1970..2000 {
            let movie = released(year);
            assert_eq!(decade.matches(&movie), range.matches(&movie), "year {year}");
        }
    }

    #[test]
    fn test_open_ended_and_exact() {
        let since = compile_year_filter("2000+").unwrap();
        assert!(since.matches(&released(2000)));
        assert!(!since.matches(&released(1999)));

        let until = compile_year_filter("1999-").unwrap();
        assert!(until.matches(&released(1999)));
        assert!(!until.matches(&released(2000)));
        assert!(!until.matches(&Movie::default()));

        let exact = compile_year_filter("1994").unwrap();
        assert!(exact.matches(&released(1994)));
        assert!(!exact.matches(&released(1995)));
    }

    #[test]
    fn test_mixed_tokens() {
        let p = compile_year_filter("2010-2014, 2015, 1950s").unwrap();
        assert!(p.matches(&released(2012)));
        assert!(p.matches(&released(2015)));
        assert!(p.matches(&released(1955)));
        assert!(!p.matches(&released(2016)));
    }

    #[test]
    fn test_malformed_year() {
        for bad in ["94", "1980S", "19800", "1980-89", "nineties", ""] {
            let err = compile_year_filter(bad).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid year format: '{bad}'"));
            assert_eq!(err.usage_hint(), Some(USAGE_HINT));
        }
    }
}
