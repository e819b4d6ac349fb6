//! Runtime configuration for the migration pipeline
//!
//! The binary parses flat command-line arguments and converts them into the
//! typed configuration structs here. The library never touches the CLI.

use std::path::PathBuf;

/// Access level applied to every created remote album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Private,
}

impl AccessLevel {
    /// Normalize a user-supplied privacy string.
    ///
    /// Anything that is not `public` (case-insensitive) is treated as
    /// `private`, matching the Gallery2 migration convention of defaulting
    /// to the safer level.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("public") {
            AccessLevel::Public
        } else {
            AccessLevel::Private
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Private => "private",
        }
    }
}

/// How post-upload metadata calls (rotation update, comment insert) handle
/// failure.
///
/// The historical behavior is fire-and-forget: failures are logged and the
/// run continues. `Retry` applies the shared backoff policy and makes
/// exhaustion fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    #[default]
    Ignore,
    Retry,
}

/// Connection settings for the Gallery2 database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Prefix applied to every table name (Gallery2 default `g2_`)
    pub table_prefix: String,
    /// Prefix applied to every field name (Gallery2 default `g_`)
    pub field_prefix: String,
}

/// Connection settings for the remote hosting service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub auth_token: String,
}

/// Behavioral settings for the upload orchestrator.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub access: AccessLevel,
    /// Prompt for confirmation before each album
    pub confirm_each: bool,
    pub exclude_movies: bool,
    /// Log every intended action but perform no remote mutation
    pub dry_run: bool,
    /// Root of the Gallery2 data directory on disk
    pub gallery_root: PathBuf,
    /// Upload only the album whose display title matches
    pub single_album: Option<String>,
    pub metadata_policy: MetadataPolicy,
}
