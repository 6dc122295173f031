//! Galatea CLI - manage substrates, mixes, substrate sets and stages.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "galatea")]
#[command(author, version, about = "Galatea - growing media composition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Galatea project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Manage substrates
    Substrate {
        #[command(subcommand)]
        command: SubstrateCommands,
    },

    /// Manage mixed substrates
    Mix {
        #[command(subcommand)]
        command: MixCommands,
    },

    /// Manage substrate sets
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },

    /// Manage stages
    Stage {
        #[command(subcommand)]
        command: StageCommands,
    },

    /// Export an item to a JSON file
    Export {
        /// What to export
        kind: Kind,
        /// Item id
        id: String,
        /// Output file path
        output: String,
    },

    /// Import an item from a JSON file
    Import {
        /// What to import
        kind: Kind,
        /// Input file path
        input: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Substrate,
    Mix,
    Set,
}

#[derive(Subcommand)]
enum SubstrateCommands {
    /// Create a substrate
    Add {
        name: String,
        #[arg(short, long, default_value = "#000000")]
        color: String,
        /// Explicit id (default: generated)
        #[arg(long)]
        id: Option<String>,
    },

    /// List substrates
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Items per page (default: from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one substrate
    Show { id: String },

    /// Change name and color
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        color: String,
    },

    /// Delete a substrate
    Remove { id: String },
}

#[derive(Subcommand)]
enum MixCommands {
    /// Create an empty mix
    Add {
        name: String,
        #[arg(short, long, default_value = "#000000")]
        color: String,
        #[arg(long)]
        id: Option<String>,
    },

    /// List mixes
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        /// Only mixes containing this substrate
        #[arg(long)]
        containing: Option<String>,
    },

    /// Show a mix and its components
    Show { id: String },

    /// Change name and color
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        color: String,
    },

    /// Delete a mix
    Remove { id: String },

    /// Add a component substrate
    Put {
        mix: String,
        substrate: String,
        percentage: f64,
    },

    /// Remove a component substrate
    Drop { mix: String, substrate: String },

    /// Change a component's share
    Share {
        mix: String,
        substrate: String,
        percentage: f64,
    },
}

#[derive(Subcommand)]
enum SetCommands {
    /// Create an empty substrate set
    Add {
        name: String,
        #[arg(long)]
        id: Option<String>,
    },

    /// List substrate sets
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show a set's members
    Show { id: String },

    /// Rename a set
    Rename { id: String, name: String },

    /// Delete a set
    Remove { id: String },

    /// Add a substrate to a set
    AddSubstrate { set: String, substrate: String },

    /// Remove a substrate from a set
    RemoveSubstrate { set: String, substrate: String },

    /// Add a mix to a set
    AddMix { set: String, mix: String },

    /// Remove a mix from a set
    RemoveMix { set: String, mix: String },

    /// Copy a mix's current composition into a set
    RefreshMix { set: String, mix: String },
}

#[derive(Subcommand)]
enum StageCommands {
    /// Create a stage
    Add {
        name: String,
        #[arg(short = 'W', long)]
        width: usize,
        #[arg(short = 'H', long)]
        height: usize,
        /// Substrate set the stage draws from
        #[arg(short, long)]
        set: String,
        #[arg(long)]
        id: Option<String>,
    },

    /// List stages
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Render a stage's grid
    Show { id: String },

    /// Change name and comment
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        comment: String,
    },

    /// Delete a stage
    Remove { id: String },

    /// Change the grid dimensions
    Resize {
        id: String,
        width: usize,
        height: usize,
    },

    /// Place a substrate or a mix into a cell
    Place {
        id: String,
        x: usize,
        y: usize,
        #[arg(long, conflicts_with = "mix", required_unless_present = "mix")]
        substrate: Option<String>,
        #[arg(long)]
        mix: Option<String>,
    },

    /// Reset a cell
    Clear { id: String, x: usize, y: usize },

    /// Show one cell
    Cell { id: String, x: usize, y: usize },

    /// Bind the stage to another substrate set
    ChangeSet { id: String, set: String },
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.logging.filter)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config, cli.verbose);

    // Init runs before any store exists.
    if let Commands::Init { path } = &cli.command {
        return commands::init::run(path.clone());
    }

    let mut ctx = commands::Context::open(config)?;
    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Substrate { command } => match command {
            SubstrateCommands::Add { name, color, id } => {
                commands::substrate::add(&mut ctx, id.as_deref(), &name, &color)
            }
            SubstrateCommands::List { page, page_size } => {
                commands::substrate::list(&ctx, page, page_size)
            }
            SubstrateCommands::Show { id } => commands::substrate::show(&ctx, &id),
            SubstrateCommands::Update { id, name, color } => {
                commands::substrate::update(&mut ctx, &id, &name, &color)
            }
            SubstrateCommands::Remove { id } => commands::substrate::remove(&mut ctx, &id),
        },
        Commands::Mix { command } => match command {
            MixCommands::Add { name, color, id } => {
                commands::mix::add(&mut ctx, id.as_deref(), &name, &color)
            }
            MixCommands::List { page, page_size, containing } => {
                commands::mix::list(&ctx, page, page_size, containing.as_deref())
            }
            MixCommands::Show { id } => commands::mix::show(&ctx, &id),
            MixCommands::Update { id, name, color } => {
                commands::mix::update(&mut ctx, &id, &name, &color)
            }
            MixCommands::Remove { id } => commands::mix::remove(&mut ctx, &id),
            MixCommands::Put { mix, substrate, percentage } => {
                commands::mix::put(&mut ctx, &mix, &substrate, percentage)
            }
            MixCommands::Drop { mix, substrate } => commands::mix::drop(&mut ctx, &mix, &substrate),
            MixCommands::Share { mix, substrate, percentage } => {
                commands::mix::share(&mut ctx, &mix, &substrate, percentage)
            }
        },
        Commands::Set { command } => match command {
            SetCommands::Add { name, id } => commands::set::add(&mut ctx, id.as_deref(), &name),
            SetCommands::List { page, page_size } => commands::set::list(&ctx, page, page_size),
            SetCommands::Show { id } => commands::set::show(&ctx, &id),
            SetCommands::Rename { id, name } => commands::set::rename(&mut ctx, &id, &name),
            SetCommands::Remove { id } => commands::set::remove(&mut ctx, &id),
            SetCommands::AddSubstrate { set, substrate } => {
                commands::set::add_substrate(&mut ctx, &set, &substrate)
            }
            SetCommands::RemoveSubstrate { set, substrate } => {
                commands::set::remove_substrate(&mut ctx, &set, &substrate)
            }
            SetCommands::AddMix { set, mix } => commands::set::add_mix(&mut ctx, &set, &mix),
            SetCommands::RemoveMix { set, mix } => commands::set::remove_mix(&mut ctx, &set, &mix),
            SetCommands::RefreshMix { set, mix } => commands::set::refresh_mix(&mut ctx, &set, &mix),
        },
        Commands::Stage { command } => match command {
            StageCommands::Add { name, width, height, set, id } => {
                commands::stage::add(&mut ctx, id.as_deref(), &name, width, height, &set)
            }
            StageCommands::List { page, page_size } => commands::stage::list(&ctx, page, page_size),
            StageCommands::Show { id } => commands::stage::show(&ctx, &id),
            StageCommands::Update { id, name, comment } => {
                commands::stage::update(&mut ctx, &id, &name, &comment)
            }
            StageCommands::Remove { id } => commands::stage::remove(&mut ctx, &id),
            StageCommands::Resize { id, width, height } => {
                commands::stage::resize(&mut ctx, &id, width, height)
            }
            StageCommands::Place { id, x, y, substrate, mix } => match (substrate, mix) {
                (Some(substrate), _) => commands::stage::place_substrate(&mut ctx, &id, x, y, &substrate),
                (None, Some(mix)) => commands::stage::place_mix(&mut ctx, &id, x, y, &mix),
                (None, None) => anyhow::bail!("pass --substrate or --mix"),
            },
            StageCommands::Clear { id, x, y } => commands::stage::clear(&mut ctx, &id, x, y),
            StageCommands::Cell { id, x, y } => commands::stage::cell(&ctx, &id, x, y),
            StageCommands::ChangeSet { id, set } => commands::stage::change_set(&mut ctx, &id, &set),
        },
        Commands::Export { kind, id, output } => commands::transfer::export(&ctx, kind, &id, &output),
        Commands::Import { kind, input } => commands::transfer::import(&mut ctx, kind, &input),
    }
}
