//! Définition et implémentation des commandes CLI
//!
//! - `unify`: CSV bruts → fichier d'échange JSON (sans DB)
//! - `import`: fichier d'échange → collection PostgreSQL

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use arbres::UnifyResult;
use arbres_pg::export::pool::{create_pool, test_connection, DatabaseConfig};
use arbres_pg::{reload, Config, LoadReport, MemoryCollection, PgCollection, ReloadMode};

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize raw tree inventories into the interchange JSON file
    Unify {
        /// Config preset name (default/paris) or path to a JSON config
        #[arg(long, default_value = "default")]
        config: String,

        /// Output interchange file (défaut : valeur `output` de la config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory relative source paths are resolved from
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },

    /// Reload the PostgreSQL collection from the interchange file
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// Interchange file produced by `unify`
    #[arg(short, long, default_value = "data/arbres.json")]
    pub input: PathBuf,

    /// Target PostgreSQL schema (défaut : env ARBRES_SCHEMA / public)
    #[arg(long)]
    pub schema: Option<String>,

    /// Target collection (défaut : env ARBRES_COLLECTION / arbres)
    #[arg(long)]
    pub collection: Option<String>,

    /// Run purge and insertion in a single transaction
    #[arg(long)]
    pub atomic: bool,

    /// Reload an in-memory collection instead of the database
    #[arg(long)]
    pub dry_run: bool,

    /// Write the load report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

#[derive(Args, Debug, Default)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL (défaut : env DATABASE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// PostgreSQL host (défaut : env PGHOST / localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// PostgreSQL database name (défaut : env PGDATABASE / arbres_db)
    #[arg(long)]
    pub database: Option<String>,

    /// PostgreSQL user (défaut : env PGUSER / postgres)
    #[arg(long)]
    pub user: Option<String>,

    /// PostgreSQL password (défaut : env PGPASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// PostgreSQL port (défaut : env PGPORT / 5432)
    #[arg(long)]
    pub port: Option<u16>,

    /// SSL mode: disable, prefer, require (défaut : env PGSSLMODE / disable)
    #[arg(long)]
    pub ssl: Option<String>,
}

/// Exécute la commande unify
pub fn cmd_unify(
    config_name: &str,
    output: Option<&Path>,
    base_dir: Option<&Path>,
) -> Result<UnifyResult> {
    let config = Config::resolve(config_name)?;
    let base_dir = base_dir.unwrap_or_else(|| Path::new("."));
    let inputs = config.inputs(base_dir)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join(&config.output));

    println!("=== Unify ===");
    println!("Config: {}", config_name);
    for input in &inputs {
        println!("Source {}: {}", input.source, input.path.display());
    }

    let result = arbres::unify(&inputs).context("Normalization failed")?;
    arbres::interchange::write(&output, &result.records)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    for stats in &result.stats {
        println!(
            "  {}: {} read, {} kept, {} filtered, {} invalid values ({}, '{}')",
            stats.source,
            stats.rows_read,
            stats.rows_kept,
            stats.rows_filtered,
            stats.invalid_values,
            stats.encoding,
            stats.delimiter.escape_default()
        );
    }
    println!("OK -> {} ({} records)", output.display(), result.records.len());

    Ok(result)
}

/// Exécute la commande import
pub async fn cmd_import(args: ImportArgs) -> Result<LoadReport> {
    // Fail-fast: rien n'est envoyé si le fichier d'échange manque ou est invalide
    let records = arbres::interchange::read(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let checksum = blake3::hash(&bytes).to_hex().to_string();

    let mut db_config = DatabaseConfig::from_env();
    apply_database_overrides(&mut db_config, args.db);
    if let Some(schema) = args.schema {
        db_config.schema = schema;
    }
    if let Some(collection) = args.collection {
        db_config.collection = collection;
    }
    let mode = if args.atomic {
        ReloadMode::Atomic
    } else {
        ReloadMode::Replace
    };

    info!(
        input = %args.input.display(),
        records = records.len(),
        checksum = %checksum,
        "Interchange file loaded"
    );

    println!("=== Import ===");
    println!("Input: {}", args.input.display());
    println!("Records: {}", records.len());
    println!("Collection: {}.{}", db_config.schema, db_config.collection);
    println!("Mode: {:?}", mode);

    let mut report = if args.dry_run {
        println!("Dry run: in-memory collection");
        let mut collection = MemoryCollection::new(&db_config.collection);
        let mut report = reload(&mut collection, &records, mode).await?;
        report.dry_run = true;
        report
    } else {
        println!("Database: {}", db_config.describe());
        let pool = create_pool(&db_config).await?;
        test_connection(&pool).await?;
        println!("Connected to PostgreSQL");

        let mut collection =
            PgCollection::open(&pool, &db_config.schema, &db_config.collection).await?;
        reload(&mut collection, &records, mode).await?
    };
    report.set_input(&args.input, checksum);

    report.display();
    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!(path = %path.display(), "Report saved");
    }

    println!("{} arbres insérés dans {}", report.inserted, report.collection);
    Ok(report)
}

fn apply_database_overrides(config: &mut DatabaseConfig, args: DatabaseArgs) {
    if let Some(url) = args.url {
        config.url = Some(url);
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database) = args.database {
        config.dbname = database;
    }
    if let Some(user) = args.user {
        config.user = user;
    }
    if let Some(password) = args.password {
        config.password = Some(password);
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ssl) = args.ssl {
        if let Ok(mode) = ssl.parse() {
            config.ssl_mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbres_pg::export::pool::SslMode;

    #[test]
    fn test_apply_database_overrides() {
        let mut config = DatabaseConfig::default();
        apply_database_overrides(
            &mut config,
            DatabaseArgs {
                host: Some("db.local".into()),
                port: Some(6543),
                ssl: Some("require".into()),
                ..Default::default()
            },
        );

        assert_eq!(config.host, "db.local");
        assert_eq!(config.port, 6543);
        assert_eq!(config.ssl_mode, SslMode::Require);
        assert_eq!(config.dbname, "arbres_db");
        assert!(config.url.is_none());
    }

    #[test]
    fn test_invalid_ssl_override_is_ignored() {
        let mut config = DatabaseConfig::default();
        apply_database_overrides(
            &mut config,
            DatabaseArgs {
                ssl: Some("sometimes".into()),
                ..Default::default()
            },
        );
        assert_eq!(config.ssl_mode, SslMode::Disable);
    }

    #[tokio::test]
    async fn test_import_missing_input_fails_fast() {
        let args = ImportArgs {
            input: PathBuf::from("does/not/exist.json"),
            dry_run: true,
            ..Default::default()
        };

        let err = cmd_import(args).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Missing input file"));
    }

    #[tokio::test]
    async fn test_unify_then_dry_run_import() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../arbres/tests/fixtures");
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            serde_json::json!({
                "output": "arbres.json",
                "sources": [
                    {"source": "paris", "path": fixtures.join("paris.csv")},
                    {"source": "hauts-de-seine", "path": fixtures.join("hauts-de-seine.csv")}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let unified = cmd_unify(config_path.to_str().unwrap(), None, Some(dir.path())).unwrap();
        assert_eq!(unified.records.len(), 5);

        let report_path = dir.path().join("report.json");
        let report = cmd_import(ImportArgs {
            input: dir.path().join("arbres.json"),
            collection: Some("arbres_test".into()),
            dry_run: true,
            report: Some(report_path.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.inserted, 5);
        assert_eq!(report.collection, "memory:arbres_test");
        assert_eq!(report.checksum.as_ref().map(String::len), Some(64));
        assert!(report_path.exists());
    }
}
