//! CSV persistence for the movie catalog.
//!
//! The table is read once per invocation and, after a mutation, rewritten in
//! full. Cells are parsed leniently: `-`, `NaN` and blanks are unset, and a
//! numeric column holding junk is treated as unset rather than failing the load.
//! Saving writes every loaded row back as it was read; only `In_Pool` and
//! `Date` cells change, and only on rows whose pool state changed.

use crate::error::{Error, Result};
use crate::types::{id_key, Catalog, Movie};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ID: &str = "ID";
pub const RANK: &str = "Rank";
pub const DECADE_RANK: &str = "Decade_Rank";
pub const TITLE: &str = "Title";
pub const DIRECTOR: &str = "Director";
pub const RUNTIME: &str = "Runtime";
pub const GENRE: &str = "Genre";
pub const YEAR: &str = "Year";
pub const DECADE: &str = "Decade";
pub const COUNTRY: &str = "Country";
pub const LANGUAGE: &str = "Language";
pub const COLOR: &str = "Color";
pub const SILENT: &str = "Silent";
pub const RATING: &str = "Rating";
pub const VOTES: &str = "Votes";
pub const CAST: &str = "Cast";
pub const WRITER: &str = "Writer";
pub const PRODUCER: &str = "Producer";
pub const CINEMATOGRAPHER: &str = "Cinematographer";
pub const EDITOR: &str = "Editor";
pub const COMPOSER: &str = "Composer";
pub const PRODUCTION_COMPANY: &str = "Production_Company";
pub const PLOT: &str = "Plot";
pub const IN_POOL: &str = "In_Pool";
pub const DATE: &str = "Date";

/// Every column the tool understands, in the order a fresh table uses
pub const COLUMNS: &[&str] = &[
    ID,
    RANK,
    DECADE_RANK,
    TITLE,
    DIRECTOR,
    RUNTIME,
    GENRE,
    YEAR,
    DECADE,
    COUNTRY,
    LANGUAGE,
    COLOR,
    SILENT,
    RATING,
    VOTES,
    CAST,
    WRITER,
    PRODUCER,
    CINEMATOGRAPHER,
    EDITOR,
    COMPOSER,
    PRODUCTION_COMPANY,
    PLOT,
    IN_POOL,
    DATE,
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Where the catalog lives between invocations
pub trait CatalogStore {
    fn load(&self) -> Result<Catalog>;
    fn save(&self, catalog: &Catalog) -> Result<()>;
}

/// Catalog stored as a single CSV file
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "movies.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CatalogStore for CsvStore {
    fn load(&self) -> Result<Catalog> {
        let file = fs::File::open(&self.path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("Failed to open catalog {}: {}", self.path.display(), e),
            ))
        })?;
        let catalog = read_catalog(file)?;
        debug!(path = %self.path.display(), movies = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Write to a sibling temp file, then rename over the catalog
    fn save(&self, catalog: &Catalog) -> Result<()> {
        let temp = self.temp_path();
        let written = fs::File::create(&temp)
            .map_err(Error::from)
            .and_then(|file| write_catalog(catalog, file));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), movies = catalog.len(), "saved catalog");
        Ok(())
    }
}

/// Parse a catalog from CSV text with a header row.
pub fn read_catalog<R: io::Read>(reader: R) -> Result<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    for required in [ID, TITLE] {
        if !index.contains_key(required) {
            return Err(Error::MissingColumn(required));
        }
    }

    let mut seen = HashSet::new();
    let mut movies = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row = Row {
            record: &record,
            index: &index,
        };
        let movie = row.to_movie(&columns);
        if !movie.is_listed() {
            warn!(title = %movie.title, "catalog row without an ID is kept out of the pool");
        } else if !seen.insert(id_key(&movie.id)) {
            return Err(Error::DuplicateId(movie.id));
        }
        movies.push(movie);
    }

    Ok(Catalog::new(columns, movies))
}

/// Write a catalog as CSV, keeping its column order and unknown columns.
/// `In_Pool` and `Date` are appended when the loaded file lacked them.
pub fn write_catalog<W: io::Write>(catalog: &Catalog, writer: W) -> Result<()> {
    let mut columns = if catalog.columns.is_empty() {
        COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        catalog.columns.clone()
    };
    for appended in [IN_POOL, DATE] {
        if !columns.iter().any(|c| c == appended) {
            columns.push(appended.to_string());
        }
    }

    let position = |name: &str| columns.iter().position(|c| c == name).unwrap_or_default();
    let (pool_at, date_at) = (position(IN_POOL), position(DATE));

    // Short rows from a flexible read are written back short
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(&columns)?;
    for movie in &catalog.movies {
        if movie.source.is_empty() {
            csv_writer.write_record(columns.iter().map(|column| cell(movie, column)))?;
        } else {
            csv_writer.write_record(&source_row(movie, pool_at, date_at))?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// A loaded row with its pool cells brought up to date
fn source_row(movie: &Movie, pool_at: usize, date_at: usize) -> Vec<String> {
    let mut cells = movie.source.clone();
    let current = |cells: &[String], at: usize| -> String {
        cells.get(at).map(|c| c.trim().to_string()).unwrap_or_default()
    };

    if parse_flag(&current(&cells, pool_at)).unwrap_or(true) != movie.in_pool {
        set_cell(&mut cells, pool_at, cell(movie, IN_POOL));
    }
    if parse_timestamp(&current(&cells, date_at)) != movie.removed_at {
        set_cell(&mut cells, date_at, cell(movie, DATE));
    }
    cells
}

fn set_cell(cells: &mut Vec<String>, at: usize, value: String) {
    if cells.len() <= at {
        cells.resize(at + 1, String::new());
    }
    cells[at] = value;
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    index: &'a HashMap<&'a str, usize>,
}

impl Row<'_> {
    fn get(&self, column: &str) -> &str {
        self.index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    fn text(&self, column: &str) -> String {
        let value = self.get(column);
        if is_unset(value) {
            String::new()
        } else {
            value.to_string()
        }
    }

    fn to_movie(&self, columns: &[String]) -> Movie {
        let id = self.text(ID);
        let year = parse_int(self.get(YEAR), YEAR, &id);
        let decade = match self.text(DECADE) {
            label if label.is_empty() => year.map(Movie::decade_label).unwrap_or_default(),
            label => label,
        };

        let extra = columns
            .iter()
            .filter(|c| !COLUMNS.contains(&c.as_str()))
            .map(|c| (c.clone(), self.get(c).to_string()))
            .collect();

        Movie {
            rank: parse_int(self.get(RANK), RANK, &id),
            decade_rank: parse_int(self.get(DECADE_RANK), DECADE_RANK, &id),
            title: self.text(TITLE),
            director: self.text(DIRECTOR),
            runtime: parse_int(self.get(RUNTIME), RUNTIME, &id),
            genre: self.text(GENRE),
            year,
            decade,
            country: self.text(COUNTRY),
            language: self.text(LANGUAGE),
            color: parse_flag(self.get(COLOR)),
            silent: parse_flag(self.get(SILENT)),
            rating: parse_float(self.get(RATING), RATING, &id),
            votes: parse_int(self.get(VOTES), VOTES, &id),
            cast: self.text(CAST),
            writer: self.text(WRITER),
            producer: self.text(PRODUCER),
            cinematographer: self.text(CINEMATOGRAPHER),
            editor: self.text(EDITOR),
            composer: self.text(COMPOSER),
            production_company: self.text(PRODUCTION_COMPANY),
            plot: self.text(PLOT),
            in_pool: parse_pool(self.get(IN_POOL), &id),
            removed_at: parse_timestamp(self.get(DATE)),
            extra,
            source: self.record.iter().map(str::to_string).collect(),
            id,
        }
    }
}

fn is_unset(value: &str) -> bool {
    value.is_empty() || value == "-" || value.eq_ignore_ascii_case("nan")
}

fn parse_float(value: &str, column: &str, id: &str) -> Option<f64> {
    if is_unset(value) {
        return None;
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(id, column, value, "treating non-numeric cell as unset");
            None
        }
    }
}

/// Integers may arrive as `1994.0` when a spreadsheet tool touched the file
fn parse_int(value: &str, column: &str, id: &str) -> Option<i64> {
    if is_unset(value) {
        return None;
    }
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    match parse_float(value, column, id) {
        Some(v) if v.fract() == 0.0 => Some(v as i64),
        Some(_) => {
            warn!(id, column, value, "treating fractional cell in integer column as unset");
            None
        }
        None => None,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "y" | "yes" => Some(true),
        "false" | "0" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// A missing pool flag means the movie was never removed
fn parse_pool(value: &str, id: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    parse_flag(value).unwrap_or_else(|| {
        warn!(id, value, "unrecognised In_Pool value, keeping movie in the pool");
        true
    })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if is_unset(value) {
        return None;
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn format_flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "TRUE".to_string(),
        Some(false) => "FALSE".to_string(),
        None => String::new(),
    }
}

fn format_int(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Whole ratings keep one decimal place; others print as stored
pub(crate) fn format_rating(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn cell(movie: &Movie, column: &str) -> String {
    match column {
        ID => movie.id.clone(),
        RANK => format_int(movie.rank),
        DECADE_RANK => format_int(movie.decade_rank),
        TITLE => movie.title.clone(),
        DIRECTOR => movie.director.clone(),
        RUNTIME => format_int(movie.runtime),
        GENRE => movie.genre.clone(),
        YEAR => format_int(movie.year),
        DECADE => movie.decade.clone(),
        COUNTRY => movie.country.clone(),
        LANGUAGE => movie.language.clone(),
        COLOR => format_flag(movie.color),
        SILENT => format_flag(movie.silent),
        RATING => format_rating(movie.rating),
        VOTES => format_int(movie.votes),
        CAST => movie.cast.clone(),
        WRITER => movie.writer.clone(),
        PRODUCER => movie.producer.clone(),
        CINEMATOGRAPHER => movie.cinematographer.clone(),
        EDITOR => movie.editor.clone(),
        COMPOSER => movie.composer.clone(),
        PRODUCTION_COMPANY => movie.production_company.clone(),
        PLOT => movie.plot.clone(),
        IN_POOL => if movie.in_pool { "Y" } else { "N" }.to_string(),
        DATE => movie
            .removed_at
            .map(|t| t.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        other => movie.extra.get(other).cloned().unwrap_or_default(),
    }
}
