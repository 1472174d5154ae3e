//! Command dispatch: one invocation loads the catalog, runs one command and
//! persists the catalog again if the command changed it.

use crate::error::{Error, Result};
use crate::pool;
use crate::query::FilterSpec;
use crate::render::{self, CardOptions, Palette};
use crate::selection::{self, Count, Selection};
use crate::storage::CatalogStore;
use rand::Rng;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;

/// Options for a `get` query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRequest {
    pub filters: FilterSpec,
    /// Raw `--count` value: a positive integer or `all`
    pub count: Option<String>,
    /// Print only title and year
    pub minimal: bool,
    /// Print one JSON object per movie
    pub json: bool,
}

/// A single CLI command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(GetRequest),
    Remove { id: String },
    List,
    Reset,
}

/// How the process should exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failure,
}

impl From<ExitOutcome> for ExitCode {
    fn from(outcome: ExitOutcome) -> Self {
        match outcome {
            ExitOutcome::Success => ExitCode::SUCCESS,
            ExitOutcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Runs commands against a catalog store
pub struct App<'a, S: ?Sized, R> {
    store: &'a S,
    rng: R,
    palette: Palette,
}

impl<'a, S, R> App<'a, S, R>
where
    S: CatalogStore + ?Sized,
    R: Rng,
{
    pub fn new(store: &'a S, rng: R) -> Self {
        Self {
            store,
            rng,
            palette: Palette::new(true),
        }
    }

    /// Enable or disable ANSI colors in movie cards
    pub fn color(mut self, enabled: bool) -> Self {
        self.palette = Palette::new(enabled);
        self
    }

    /// Execute `command`, writing results to `out` and failures to `err`.
    pub fn run(&mut self, command: &Command, out: &mut dyn Write, err: &mut dyn Write) -> ExitOutcome {
        match self.execute(command, out) {
            Ok(()) => ExitOutcome::Success,
            Err(e) => {
                debug!(error = %e, ?command, "command failed");
                report(&e, err);
                ExitOutcome::Failure
            }
        }
    }

    fn execute(&mut self, command: &Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Get(request) => self.get(request, out),
            Command::Remove { id } => self.remove(id, out),
            Command::List => self.list(out),
            Command::Reset => self.reset(out),
        }
    }

    fn get(&mut self, request: &GetRequest, out: &mut dyn Write) -> Result<()> {
        // Reject bad input before touching the catalog
        let count = match &request.count {
            Some(raw) => raw.parse::<Count>()?,
            None => Count::One,
        };
        let predicate = request.filters.compile()?;
        let catalog = self.store.load()?;

        let (movies, pool_size) = match selection::select(&catalog, &predicate, count, &mut self.rng)? {
            Selection::NoMatches => {
                writeln!(out, "No movies match your criteria.")?;
                return Ok(());
            }
            Selection::Picked { movies, pool_size } => (movies, pool_size),
        };

        if request.json {
            for movie in movies {
                writeln!(out, "{}", serde_json::to_string(movie)?)?;
            }
            return Ok(());
        }

        let last = movies.len().saturating_sub(1);
        for (idx, movie) in movies.into_iter().enumerate() {
            let options = CardOptions {
                minimal: request.minimal,
                pool_size,
                is_last: idx == last,
                palette: self.palette,
            };
            writeln!(out, "{}", render::render_movie(movie, &options))?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn remove(&mut self, id: &str, out: &mut dyn Write) -> Result<()> {
        let mut catalog = self.store.load()?;
        let now = chrono::Local::now().naive_local();
        let removed_id = pool::remove(&mut catalog, id, now)?.id.clone();
        self.store.save(&catalog)?;
        writeln!(out, "Movie with ID {} has been removed.", removed_id)?;
        Ok(())
    }

    fn reset(&mut self, out: &mut dyn Write) -> Result<()> {
        let mut catalog = self.store.load()?;
        pool::reset(&mut catalog);
        self.store.save(&catalog)?;
        writeln!(out, "The pool has been reset.")?;
        Ok(())
    }

    fn list(&mut self, out: &mut dyn Write) -> Result<()> {
        let catalog = self.store.load()?;
        let removed = pool::list_removed(&catalog);
        if removed.is_empty() {
            writeln!(out, "There are no movies in the list.")?;
            return Ok(());
        }
        for movie in removed {
            writeln!(out, "{}", render::render_removed(movie))?;
        }
        Ok(())
    }
}

/// Print an error and, for malformed input, how to fix it
fn report(error: &Error, err: &mut dyn Write) {
    let _ = writeln!(err, "{}", error);
    if let Some(hint) = error.usage_hint() {
        let _ = writeln!(err, "Valid formats: {}", hint);
    } else if error.is_user_input() {
        let _ = writeln!(err, "Run `movie-picker get --help` to see every filter option.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Catalog, Movie};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    /// Store that keeps the catalog in memory and counts saves
    struct MemoryStore {
        catalog: RefCell<Catalog>,
        saves: RefCell<usize>,
    }

    impl MemoryStore {
        fn new(movies: Vec<Movie>) -> Self {
            Self {
                catalog: RefCell::new(Catalog::new(vec!["ID".to_string()], movies)),
                saves: RefCell::new(0),
            }
        }
    }

    impl CatalogStore for MemoryStore {
        fn load(&self) -> Result<Catalog> {
            Ok(self.catalog.borrow().clone())
        }

        fn save(&self, catalog: &Catalog) -> Result<()> {
            *self.catalog.borrow_mut() = catalog.clone();
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    fn movie(id: &str, title: &str, year: i64) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            year: Some(year),
            decade: Movie::decade_label(year),
            in_pool: true,
            ..Default::default()
        }
    }

    fn run(store: &MemoryStore, command: Command) -> (ExitOutcome, String, String) {
        let mut app = App::new(store, StdRng::seed_from_u64(5)).color(false);
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let outcome = app.run(&command, &mut out, &mut err);
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn get(filters: FilterSpec, count: Option<&str>) -> Command {
        Command::Get(GetRequest {
            filters,
            count: count.map(str::to_string),
            minimal: true,
            json: false,
        })
    }

    #[test]
    fn test_get_all_minimal() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979), movie("2", "Aliens", 1986)]);
        let (outcome, out, err) = run(&store, get(FilterSpec::default(), Some("all")));
        assert_eq!(outcome, ExitOutcome::Success);
        assert_eq!(out, "Alien (1979)\nAliens (1986)\n\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_get_reports_format_error_with_hint() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979)]);
        let filters = FilterSpec {
            year: Some("seventies".to_string()),
            ..Default::default()
        };
        let (outcome, out, err) = run(&store, get(filters, None));
        assert_eq!(outcome, ExitOutcome::Failure);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Invalid year format: 'seventies'\nValid formats: 1980s (decade), 1980-1989 (range), 1994 (exact), 2000+ (after)\n"
        );
    }

    #[test]
    fn test_get_no_matches_succeeds() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979)]);
        let filters = FilterSpec {
            year: Some("2020s".to_string()),
            ..Default::default()
        };
        let (outcome, out, _) = run(&store, get(filters, Some("3")));
        assert_eq!(outcome, ExitOutcome::Success);
        assert_eq!(out, "No movies match your criteria.\n");
    }

    #[test]
    fn test_bad_count_fails_before_loading() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979)]);
        let (outcome, _, err) = run(&store, get(FilterSpec::default(), Some("0")));
        assert_eq!(outcome, ExitOutcome::Failure);
        assert!(err.starts_with("Either a positive integer or \"all\""));
    }

    #[test]
    fn test_get_json_lines() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979)]);
        let command = Command::Get(GetRequest {
            json: true,
            ..Default::default()
        });
        let (_, out, _) = run(&store, command);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["title"], "Alien");
        assert_eq!(value["year"], 1979);
    }

    #[test]
    fn test_remove_list_reset() {
        let store = MemoryStore::new(vec![movie("1", "Alien", 1979), movie("2", "Aliens", 1986)]);
        let before = chrono::Local::now().naive_local();

        let (outcome, out, _) = run(&store, Command::Remove { id: "2".to_string() });
        assert_eq!(outcome, ExitOutcome::Success);
        assert_eq!(out, "Movie with ID 2 has been removed.\n");
        let stamped = store.catalog.borrow().find("2").and_then(|m| m.removed_at).unwrap();
        assert!(stamped >= before);

        let (_, out, _) = run(&store, Command::List);
        assert!(out.starts_with("Aliens (1986 | "));

        let (outcome, _, err) = run(&store, Command::Remove { id: "2".to_string() });
        assert_eq!(outcome, ExitOutcome::Failure);
        assert_eq!(err, "That movie has already been removed from the pool.\n");

        let (outcome, _, err) = run(&store, Command::Remove { id: "9".to_string() });
        assert_eq!(outcome, ExitOutcome::Failure);
        assert_eq!(err, "No movie found with ID 9.\n");
        assert_eq!(*store.saves.borrow(), 1);

        let (_, out, _) = run(&store, Command::Reset);
        assert_eq!(out, "The pool has been reset.\n");
        let (_, out, _) = run(&store, Command::List);
        assert_eq!(out, "There are no movies in the list.\n");
        let (_, out, _) = run(&store, get(FilterSpec::default(), Some("all")));
        assert!(out.contains("Aliens (1986)"));
    }
}
