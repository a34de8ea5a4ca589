//! Point d'entrée CLI pour arbres-pg

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Unifier les inventaires d'arbres et les charger dans PostgreSQL
#[derive(Parser)]
#[command(name = "arbres-pg")]
#[command(author, version)]
#[command(about = "Unifier les inventaires d'arbres (Paris, Hauts-de-Seine) et recharger la collection PostgreSQL")]
#[command(long_about = "Normalise les inventaires d'arbres remarquables vers un schéma commun.\n\n'unify' produit le fichier d'échange JSON, 'import' recharge la collection à partir de ce fichier.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Unify {
            config,
            output,
            base_dir,
        } => {
            info!(config = %config, "Unify raw inventories");
            cli::cmd_unify(&config, output.as_deref(), base_dir.as_deref())?;
        }
        Commands::Import(args) => {
            info!(input = %args.input.display(), atomic = args.atomic, dry_run = args.dry_run, "Reload collection");
            cli::cmd_import(args).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
