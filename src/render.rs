//! Terminal output for selected and removed movies.

use crate::storage::format_rating;
use crate::types::Movie;

const RULE_WIDTH: usize = 60;

/// ANSI escapes, or empty strings when color is off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn code(&self, code: &'static str) -> &'static str {
        if self.enabled {
            code
        } else {
            ""
        }
    }

    fn reset(&self) -> &'static str {
        self.code("\x1b[0m")
    }
    fn dim(&self) -> &'static str {
        self.code("\x1b[90m")
    }
    fn bold(&self) -> &'static str {
        self.code("\x1b[1m")
    }
    fn green(&self) -> &'static str {
        self.code("\x1b[92m")
    }
    fn yellow(&self) -> &'static str {
        self.code("\x1b[93m")
    }
    fn white(&self) -> &'static str {
        self.code("\x1b[37m")
    }

    fn rating_color(&self, rating: Option<f64>) -> &'static str {
        match rating {
            Some(r) if r >= 8.0 => self.green(),
            Some(r) if r >= 7.0 => self.yellow(),
            _ => self.white(),
        }
    }

    fn rank_color(&self, rank: Option<i64>) -> &'static str {
        match rank {
            Some(r) if r <= 100 => self.green(),
            Some(r) if r <= 500 => self.yellow(),
            _ => self.white(),
        }
    }

    /// Star after the title for the very top of the list
    fn rank_badge(&self, rank: Option<i64>) -> String {
        let star = match rank {
            Some(r) if r <= 10 => self.code("\x1b[1;93m"),
            Some(r) if r <= 50 => self.yellow(),
            Some(r) if r <= 100 => self.dim(),
            _ => return String::new(),
        };
        format!(" {star}★{}", self.reset())
    }

    fn rule(&self) -> String {
        format!("{}{}{}", self.dim(), "─".repeat(RULE_WIDTH), self.reset())
    }
}

/// How a movie card should be drawn
#[derive(Debug, Clone, Copy)]
pub struct CardOptions {
    pub minimal: bool,
    /// Number of movies that matched the query
    pub pool_size: usize,
    /// Close the card with a bottom rule
    pub is_last: bool,
    pub palette: Palette,
}

/// Render one selected movie.
pub fn render_movie(movie: &Movie, options: &CardOptions) -> String {
    let p = &options.palette;
    let (dim, reset) = (p.dim(), p.reset());
    let year = display_int(movie.year);

    if options.minimal {
        return format!("{} {dim}({year}){reset}", movie.title);
    }

    let mut card = format!(
        "\n{rule}\n\
         {dim}Movie:{reset} {bold}{title}{reset} {dim}({year}){reset}{badge} \
         ({rating_color}{rating}{reset}, {votes} votes, Rank {rank_color}#{rank}{reset}) [{pool} total]\n\
         {dim}Director:{reset} {director}\n\
         {dim}Genre:{reset} {genre}\n\
         {dim}Runtime:{reset} {runtime}\n\
         {dim}Starring:{reset} {cast}\n\
         {dim}Plot:{reset} {plot}\n\
         {dim}ID:{reset} {id}",
        rule = p.rule(),
        bold = p.bold(),
        title = movie.title,
        badge = p.rank_badge(movie.rank),
        rating_color = p.rating_color(movie.rating),
        rating = or_dash(&format_rating(movie.rating)),
        votes = format_votes(movie.votes),
        rank_color = p.rank_color(movie.rank),
        rank = display_int(movie.rank),
        pool = options.pool_size,
        director = or_dash(&movie.director),
        genre = or_dash(&movie.genre),
        runtime = format_runtime(movie.runtime),
        cast = top_cast(&movie.cast),
        plot = or_dash(&movie.plot),
        id = movie.id,
    );

    if options.is_last {
        card.push('\n');
        card.push_str(&p.rule());
    }
    card
}

/// One line of the removed-movie listing: `Title (Year | removed at)`.
pub fn render_removed(movie: &Movie) -> String {
    let removed = movie
        .removed_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{} ({} | {})", movie.title, display_int(movie.year), removed)
}

/// `135` -> `2h 15m`
pub fn format_runtime(minutes: Option<i64>) -> String {
    match minutes {
        Some(m) if m >= 0 => format!("{}h {}m", m / 60, m % 60),
        _ => "-".to_string(),
    }
}

/// `1234567` -> `1,234,567`
pub fn format_votes(votes: Option<i64>) -> String {
    let Some(votes) = votes else {
        return "-".to_string();
    };
    let digits = votes.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if votes < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Up to five top-billed names from a comma-joined cast list
pub fn top_cast(cast: &str) -> String {
    let names: Vec<&str> = cast
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .take(5)
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn display_int(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
