use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use jammcli::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Remove the locally stored session
    Logout,

    /// Show whether a valid session is stored
    Status,

    /// Search tracks
    Search(SearchOptions),

    /// Edit the playlist draft
    Draft(DraftOptions),

    /// Save the draft as a new playlist
    Save(SaveOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search term; multiple words are joined with spaces
    #[clap(required = true, num_args = 1..)]
    pub term: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DraftOptions {
    /// Subcommands under `draft`; shows the draft when omitted
    #[command(subcommand)]
    pub command: Option<DraftSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DraftSubcommand {
    /// Show the draft
    Show,

    /// Add tracks by their number in the last search
    Add {
        #[clap(required = true, num_args = 1..)]
        picks: Vec<usize>,
    },

    /// Remove tracks by their number in the draft
    Remove {
        #[clap(required = true, num_args = 1..)]
        picks: Vec<usize>,
    },

    /// Rename the draft
    Rename { name: String },

    /// Remove all tracks and reset the name
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct SaveOptions {
    /// Playlist name; defaults to the draft name
    #[clap(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    match cli.command {
        Command::Auth => cli::auth(&cli::Context::load()).await,
        Command::Logout => cli::logout(&cli::Storage::open()).await,
        Command::Status => cli::status(&cli::Storage::open()).await,
        Command::Search(opt) => cli::search(&cli::Context::load(), opt.term.join(" ")).await,
        Command::Draft(opt) => {
            let storage = cli::Storage::open();
            match opt.command {
                None | Some(DraftSubcommand::Show) => cli::show_draft(&storage).await,
                Some(DraftSubcommand::Add { picks }) => cli::add_to_draft(&storage, picks).await,
                Some(DraftSubcommand::Remove { picks }) => {
                    cli::remove_from_draft(&storage, picks).await
                }
                Some(DraftSubcommand::Rename { name }) => cli::rename_draft(&storage, name).await,
                Some(DraftSubcommand::Clear) => cli::clear_draft(&storage).await,
            }
        }
        Command::Save(opt) => cli::save(&cli::Context::load(), opt.name).await,
        Command::Completions(_) => {}
    }
}
