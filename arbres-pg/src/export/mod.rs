//! Modules d'export (collection PostgreSQL, collection mémoire)

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod sink;

pub use memory::MemoryCollection;
pub use postgres::PgCollection;
pub use sink::DocumentSink;
