use crate::error::{Error, Result};
use crate::filter::{Comparison, FlagField, NumericField, Predicate, TextField};
use crate::grammar::{compile_numeric_filter, compile_text_filter, compile_year_filter};
use tracing::debug;

/// One optional filter per catalog attribute, as typed on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub rank: Option<String>,
    /// Only movies in the top 100 of their decade
    pub top100: bool,
    pub director: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    /// 1 for color, 0 for black & white
    pub color: Option<i64>,
    /// 1 for silent, 0 for sound
    pub silent: Option<i64>,
    pub rating: Option<String>,
    pub votes: Option<String>,
    pub actor: Option<String>,
    pub writer: Option<String>,
    pub producer: Option<String>,
    pub cinematographer: Option<String>,
    pub editor: Option<String>,
    pub composer: Option<String>,
    pub production_company: Option<String>,
    pub plot: Option<String>,
}

impl FilterSpec {
    /// Compile every supplied filter and AND them together.
    ///
    /// The first malformed filter aborts compilation, so a command never runs
    /// with only part of its filters applied.
    pub fn compile(&self) -> Result<Predicate> {
        let mut parts = Vec::new();

        if let Some(expr) = &self.rank {
            parts.push(numeric(expr, NumericField::Rank)?);
        }
        if self.top100 {
            parts.push(Predicate::All(vec![
                Predicate::compare(NumericField::DecadeRank, Comparison::AtMost, 100.0),
                Predicate::compare(NumericField::DecadeRank, Comparison::AtLeast, 1.0),
            ]));
        }
        push_text(&mut parts, &self.director, TextField::Director);
        if let Some(expr) = &self.runtime {
            parts.push(numeric(expr, NumericField::Runtime)?);
        }
        push_text(&mut parts, &self.genre, TextField::Genre);
        if let Some(expr) = &self.year {
            parts.push(compile_year_filter(expr)?);
        }
        push_text(&mut parts, &self.country, TextField::Country);
        push_text(&mut parts, &self.language, TextField::Language);
        if let Some(value) = self.color {
            parts.push(flag(value, FlagField::Color, "1 (color) or 0 (black & white)")?);
        }
        if let Some(value) = self.silent {
            parts.push(flag(value, FlagField::Silent, "1 (silent) or 0 (non-silent)")?);
        }
        if let Some(expr) = &self.rating {
            parts.push(numeric(expr, NumericField::Rating)?);
        }
        if let Some(expr) = &self.votes {
            parts.push(numeric(expr, NumericField::Votes)?);
        }
        push_text(&mut parts, &self.actor, TextField::Cast);
        push_text(&mut parts, &self.writer, TextField::Writer);
        push_text(&mut parts, &self.producer, TextField::Producer);
        push_text(&mut parts, &self.cinematographer, TextField::Cinematographer);
        push_text(&mut parts, &self.editor, TextField::Editor);
        push_text(&mut parts, &self.composer, TextField::Composer);
        push_text(&mut parts, &self.production_company, TextField::ProductionCompany);
        push_text(&mut parts, &self.plot, TextField::Plot);

        debug!(filters = parts.len(), "compiled filter spec");
        Ok(Predicate::all(parts))
    }
}

fn numeric(expr: &str, field: NumericField) -> Result<Predicate> {
    compile_numeric_filter(expr, field, field.allows_decimal())
}

fn push_text(parts: &mut Vec<Predicate>, expr: &Option<String>, field: TextField) {
    if let Some(expr) = expr {
        parts.push(compile_text_filter(expr, field));
    }
}

fn flag(value: i64, field: FlagField, allowed: &'static str) -> Result<Predicate> {
    match value {
        0 => Ok(Predicate::Flag { field, value: false }),
        1 => Ok(Predicate::Flag { field, value: true }),
        _ => Err(Error::InvalidFlag {
            field: field.name(),
            allowed,
        }),
    }
}
