use anyhow::Context;
use clap::{Parser, Subcommand};
use movie_picker::config::{self, CONFIG_ENV};
use movie_picker::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pick a random movie from your catalog
#[derive(Parser, Debug)]
#[command(name = "movie-picker")]
#[command(about = "Movie management tool: filter, pick and track movies from a local catalog")]
#[command(version)]
struct Args {
    /// Catalog CSV file (default: movies.csv next to the executable, or MOVIE_PICKER_CSV env var)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// YAML config file (default: $HOME/.movie-picker/config.yml, or MOVIE_PICKER_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the random picker for reproducible results (or MOVIE_PICKER_SEED env var)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Retrieve a random movie based on filters
    Get(GetArgs),

    /// Remove a movie from the pool given its ID
    Remove {
        /// ID of the movie to take out of the selection pool (numeric IDs ignore leading zeros)
        movie_id: String,
    },

    /// List the movies that have been removed from the selection pool
    List,

    /// Reset the pool of movies to select from
    Reset,
}

#[derive(clap::Args, Debug)]
struct GetArgs {
    /// Rank requirements (e.g. 1000-, 50-100, 42+, 42)
    #[arg(short, long)]
    rank: Option<String>,

    /// Limit selection to movies in the top 100 of their decade
    #[arg(long, visible_alias = "t100")]
    top100: bool,

    /// Director(s); "," means AND, ";" means OR, "!" negates (e.g. "Nolan; Spielberg")
    #[arg(short, long)]
    director: Option<String>,

    /// Runtime in minutes (e.g. 90-120, 90+, 60-)
    #[arg(long, visible_alias = "rt")]
    runtime: Option<String>,

    /// Genre(s) (e.g. "Drama" or "Horror, Musical")
    #[arg(short, long)]
    genre: Option<String>,

    /// Decade, year range, year, or a mix (e.g. "2010s", "2010-2018", "1994", "2010-2014, 2015")
    #[arg(short, long)]
    year: Option<String>,

    /// Country or countries (e.g. "United States", "France")
    #[arg(long, visible_alias = "cou")]
    country: Option<String>,

    /// Language(s) (e.g. "English", "Spanish")
    #[arg(short, long)]
    language: Option<String>,

    /// 1 for color movies, 0 for black and white
    #[arg(long, visible_alias = "col", allow_negative_numbers = true)]
    color: Option<i64>,

    /// 1 for silent movies, 0 for non-silent
    #[arg(short, long, allow_negative_numbers = true)]
    silent: Option<i64>,

    /// Rating requirements (e.g. 7.0-7.4, 9+, 5.4-)
    #[arg(long, visible_alias = "rat")]
    rating: Option<String>,

    /// Vote count requirements (e.g. 10000+, 250000-500000, 100-)
    #[arg(short, long)]
    votes: Option<String>,

    /// Actor(s) (e.g. "James Stewart", "Zendaya, Tom Cruise")
    #[arg(short, long)]
    actor: Option<String>,

    /// Writer(s) (e.g. "Stan Lee", "Dan Aykroyd, Ernest Lehman")
    #[arg(short, long)]
    writer: Option<String>,

    /// Producer(s) (e.g. "Kevin Feige", "Ivan Reitman, Robert Wise")
    #[arg(short, long)]
    producer: Option<String>,

    /// Cinematographer(s) (e.g. "Matthew Libatique")
    #[arg(long, visible_alias = "cin")]
    cinematographer: Option<String>,

    /// Editor(s) (e.g. "William Reynolds", "Dan Lebental, Sheldon Kahn")
    #[arg(short, long)]
    editor: Option<String>,

    /// Composer(s) (e.g. "Hans Zimmer", "Danny Elfman, John Williams")
    #[arg(long, visible_alias = "com")]
    composer: Option<String>,

    /// Production company or companies (e.g. "Marvel Studios")
    #[arg(long = "production-company", visible_alias = "pc")]
    production_company: Option<String>,

    /// Text to look for in plot summaries (e.g. "ghost")
    #[arg(long, visible_alias = "pl")]
    plot: Option<String>,

    /// Number of movies to return, or "all" for every match
    #[arg(short, long)]
    count: Option<String>,

    /// Only print the title and year of release
    #[arg(short, long)]
    minimal: bool,

    /// Print one JSON object per movie
    #[arg(long, conflicts_with = "minimal")]
    json: bool,
}

impl From<GetArgs> for GetRequest {
    fn from(args: GetArgs) -> Self {
        GetRequest {
            filters: FilterSpec {
                rank: args.rank,
                top100: args.top100,
                director: args.director,
                runtime: args.runtime,
                genre: args.genre,
                year: args.year,
                country: args.country,
                language: args.language,
                color: args.color,
                silent: args.silent,
                rating: args.rating,
                votes: args.votes,
                actor: args.actor,
                writer: args.writer,
                producer: args.producer,
                cinematographer: args.cinematographer,
                editor: args.editor,
                composer: args.composer,
                production_company: args.production_company,
                plot: args.plot,
            },
            count: args.count,
            minimal: args.minimal,
            json: args.json,
        }
    }
}

impl From<CliCommand> for Command {
    fn from(cmd: CliCommand) -> Self {
        match cmd {
            CliCommand::Get(args) => Command::Get(args.into()),
            CliCommand::Remove { movie_id } => Command::Remove { id: movie_id },
            CliCommand::List => Command::List,
            CliCommand::Reset => Command::Reset,
        }
    }
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  get     Retrieve a random movie based on filters");
    println!("  remove  Remove a movie from the pool given its ID");
    println!("  list    List the movies that have been removed from the pool");
    println!("  reset   Reset the pool of movies to select from");
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}

/// Resolve configuration: flags, then environment, then config file, then defaults
fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut builder = ConfigBuilder::new(config::default_catalog_path()?);

    // Check flag first, then environment variable, then the default location
    let config_file = args
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .or_else(|| config::default_config_path().filter(|p| p.is_file()));
    if let Some(path) = config_file {
        let file = FileConfig::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;
        builder = builder.file(file);
    }

    builder = builder.env(|key| std::env::var(key).ok())?;

    if let Some(catalog) = &args.catalog {
        builder = builder.catalog(catalog);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.no_color {
        builder = builder.color(false);
    }

    Ok(builder.build()?)
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing()?;
    let mut args = Args::parse();

    let Some(command) = args.command.take().map(Command::from) else {
        print_available_commands();
        return Ok(ExitCode::SUCCESS);
    };

    let config = resolve_config(&args)?;
    let store = CsvStore::new(&config.catalog_path);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let color = config.color && io::stdout().is_terminal();

    let mut app = App::new(&store, rng).color(color);
    let outcome = app.run(&command, &mut io::stdout().lock(), &mut io::stderr().lock());
    Ok(outcome.into())
}
