//! # arbres-pg
//!
//! Unification des inventaires d'arbres et chargement dans une collection
//! de documents PostgreSQL (`JSONB`).
//!
//! ## Features
//!
//! - Normalisation Paris + Hauts-de-Seine vers un fichier d'échange JSON
//! - Rechargement complet d'une collection (purge puis insertion en masse via COPY)
//! - Rechargement transactionnel optionnel (`--atomic`)
//! - Rapport de chargement (console ou JSON)
//!
//! ## Usage CLI
//!
//! ```bash
//! # CSV bruts → data/arbres.json
//! arbres-pg unify
//!
//! # data/arbres.json → PostgreSQL
//! arbres-pg import --input data/arbres.json --collection arbres
//! ```

pub mod config;
pub mod export;
pub mod loader;
pub mod report;

pub use config::Config;
pub use export::pool::{create_pool, DatabaseConfig};
pub use export::{DocumentSink, MemoryCollection, PgCollection};
pub use loader::{reload, ReloadMode};
pub use report::{LoadReport, LoadStatus};
