use crate::error::{Error, Result};
use crate::filter::{Comparison, NumericField, Predicate};
use regex::Regex;

const INTEGER: &str = r"\d+";
const DECIMAL: &str = r"\d+(?:\.\d+)?";

/// Usage example shown after a malformed numeric token
pub fn usage_hint(field: NumericField) -> &'static str {
    match field {
        NumericField::Rank | NumericField::DecadeRank => {
            "50-100 (range), 1000- (up to), 42+ (at least), 42 (exact)"
        }
        NumericField::Runtime => "90-120 (range), 60- (up to), 90+ (at least), 95 (exact)",
        NumericField::Year => "1980-1989 (range), 1999- (up to), 2000+ (at least), 1994 (exact)",
        NumericField::Rating => "7.0-8.0 (range), 7.5- (up to), 7.9+ (at least), 7.9 (exact)",
        NumericField::Votes => {
            "5000-15000 (range), 100- (up to), 100000+ (at least), 100 (exact)"
        }
    }
}

/// Compiled token patterns for one number kind
struct NumericGrammar {
    range: Regex,
    modifier: Regex,
    exact: Regex,
}

impl NumericGrammar {
    fn new(allow_decimal: bool) -> Result<Self> {
        let number = if allow_decimal { DECIMAL } else { INTEGER };
        Ok(Self {
            range: Regex::new(&format!(r"^({number})-({number})$"))?,
            modifier: Regex::new(&format!(r"^({number})([-+])$"))?,
            exact: Regex::new(&format!(r"^{number}$"))?,
        })
    }

    fn compile_token(&self, token: &str, field: NumericField) -> Option<Predicate> {
        if let Some(caps) = self.range.captures(token) {
            let low = caps[1].parse::<f64>().ok()?;
            let high = caps[2].parse::<f64>().ok()?;
            return Some(Predicate::between(field, low, high));
        }

        if let Some(caps) = self.modifier.captures(token) {
            let value = caps[1].parse::<f64>().ok()?;
            let bound = if &caps[2] == "-" {
                Comparison::AtMost
            } else {
                Comparison::AtLeast
            };
            // The extra lower bound keeps sentinel rows out of open ranges
            return Some(Predicate::All(vec![
                Predicate::compare(field, bound, value),
                Predicate::compare(field, Comparison::AtLeast, 0.0),
            ]));
        }

        if self.exact.is_match(token) {
            let value = token.parse::<f64>().ok()?;
            return Some(Predicate::compare(field, Comparison::Eq, value));
        }

        None
    }
}

/// Compile a comma-separated list of numeric tokens into one predicate.
///
/// Each token is one of `N` (exact), `A-B` (inclusive range), `N-` (at most)
/// or `N+` (at least); the tokens are OR'd together. With `allow_decimal`
/// numbers may carry any number of fractional digits.
pub fn compile_numeric_filter(
    expression: &str,
    field: NumericField,
    allow_decimal: bool,
) -> Result<Predicate> {
    let grammar = NumericGrammar::new(allow_decimal)?;
    let mut alternatives = Vec::new();

    for token in expression.split(',').map(str::trim) {
        match grammar.compile_token(token, field) {
            Some(predicate) => alternatives.push(predicate),
            None => {
                return Err(Error::Format {
                    field: field.name(),
                    token: token.to_string(),
                    hint: usage_hint(field),
                })
            }
        }
    }

    Ok(Predicate::any(alternatives))
}
