use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use wq_core::{Error, QuizStorage, Result};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Available: memory, sqlite",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Open the backend named by `kind`. `database` is only read by file-backed stores.
pub async fn create_storage(kind: StorageKind, database: &Path) -> Result<Arc<dyn QuizStorage>> {
    let storage: Arc<dyn QuizStorage> = match kind {
        StorageKind::Memory => Arc::new(MemoryStorage::new()),
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => Arc::new(SQLiteStorage::new_with_path(database).await?),
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => {
            return Err(Error::Config(format!(
                "cannot open {}: built without the `sqlite` feature",
                database.display()
            )))
        }
    };
    tracing::info!("🏦 Storage backend initialized (using {})", kind);
    Ok(storage)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageKind};
}
