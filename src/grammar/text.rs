use crate::filter::{Predicate, TextField};

/// Compile a boolean text filter.
///
/// `;` separates OR-groups and `,` separates AND-terms inside a group. A term
/// starting with `!` must be absent from the field. Matching is a
/// case-insensitive substring test, so `"Nolan, Zimmer; Spielberg"` reads as
/// `(Nolan AND Zimmer) OR Spielberg`. Any input is accepted.
pub fn compile_text_filter(expression: &str, field: TextField) -> Predicate {
    let groups = expression
        .split(';')
        .map(|group| Predicate::all(group.split(',').map(|term| compile_term(term, field)).collect()))
        .collect();

    Predicate::any(groups)
}

fn compile_term(term: &str, field: TextField) -> Predicate {
    let term = term.trim();
    match term.strip_prefix('!') {
        Some(excluded) => Predicate::contains(field, excluded.trim()).negate(),
        None => Predicate::contains(field, term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Movie;

    fn with_genre(genre: &str) -> Movie {
        Movie {
            genre: genre.to_string(),
            ..Default::default()
        }
    }

    fn directed_by(director: &str) -> Movie {
        Movie {
            director: director.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_and_or_groups() {
        let p = compile_text_filter("Action, Drama; Comedy", TextField::Genre);
        assert!(p.matches(&with_genre("Action, Drama, Thriller")));
        assert!(p.matches(&with_genre("Comedy")));
        assert!(!p.matches(&with_genre("Action")));
    }

    #[test]
    fn test_negation_includes_empty_field() {
        let p = compile_text_filter("!Nolan", TextField::Director);
        assert!(!p.matches(&directed_by("Christopher Nolan")));
        assert!(!p.matches(&directed_by("christopher NOLAN")));
        assert!(p.matches(&directed_by("Steven Spielberg")));
        assert!(p.matches(&directed_by("")));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let p = compile_text_filter("hitch", TextField::Director);
        assert!(p.matches(&directed_by("Alfred Hitchcock")));
        assert!(!p.matches(&directed_by("")));
    }

    #[test]
    fn test_mixed_negation() {
        let p = compile_text_filter("Nolan, !Zimmer; Spielberg", TextField::Composer);
        let m = |c: &str| Movie {
            composer: c.to_string(),
            ..Default::default()
        };
        assert!(p.matches(&m("David Julyan (Nolan score)")));
        assert!(!p.matches(&m("Hans Zimmer (Nolan)")));
        assert!(p.matches(&m("Spielberg tribute")));
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let p = compile_text_filter("(a+b)", TextField::Plot);
        let movie = Movie {
            plot: "Solve (a+b) squared".to_string(),
            ..Default::default()
        };
        assert!(p.matches(&movie));
    }
}
