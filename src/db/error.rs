//! Gateway error types.

/// Errors returned by the data store gateway.
#[derive(Debug)]
pub enum DbError {
    /// Registration attempted with a username that already exists
    DuplicateUsername(String),
    /// The addressed entity (or the parent it should attach to) does not exist
    NotFound { entity: &'static str, key: String },
    /// Caller supplied a value the gateway refuses to store
    InvalidInput(String),
    /// A stored row could not be decoded into its model
    InvalidData(String),
    /// Failed to prepare the database location
    Io(std::io::Error),
    /// Schema migration failed
    Migrate(sqlx::migrate::MigrateError),
    /// Any other storage-engine failure
    Sqlx(sqlx::Error),
    /// Hashing or verifying a password failed
    Password(bcrypt::BcryptError),
}

impl DbError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::DuplicateUsername(name) => {
                write!(f, "Username '{}' is already taken", name)
            }
            DbError::NotFound { entity, key } => write!(f, "{} not found: {}", entity, key),
            DbError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            DbError::InvalidData(e) => write!(f, "Invalid stored data: {}", e),
            DbError::Io(e) => write!(f, "Database I/O error: {}", e),
            DbError::Migrate(e) => write!(f, "Database migration failed: {}", e),
            DbError::Sqlx(e) => write!(f, "Database error: {}", e),
            DbError::Password(e) => write!(f, "Password hashing failed: {}", e),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Io(e) => Some(e),
            DbError::Migrate(e) => Some(e),
            DbError::Sqlx(e) => Some(e),
            DbError::Password(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::Sqlx(e)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DbError::Migrate(e)
    }
}

impl From<bcrypt::BcryptError> for DbError {
    fn from(e: bcrypt::BcryptError) -> Self {
        DbError::Password(e)
    }
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        DbError::Io(e)
    }
}

/// True when SQLite rejected a write because of a UNIQUE or PRIMARY KEY constraint.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() || db.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// True when SQLite rejected a write because a referenced parent row is missing.
pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            db.is_foreign_key_violation()
                || db.message().contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}
