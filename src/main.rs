//! g2migrate - command-line entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use g2migrate::config::{
    AccessLevel, MetadataPolicy, MigrateConfig, RemoteConfig, StoreConfig,
};
use g2migrate::gallery::{self, GalleryOptions};
use g2migrate::remote::HttpRemoteGallery;
use g2migrate::store::MySqlStore;
use g2migrate::uploader::{MigrationSummary, StdinConfirmer, Uploader};

/// Command-line arguments for g2migrate
#[derive(Parser, Debug)]
#[command(name = "g2migrate")]
#[command(about = "Migrate a Gallery2 database into a remote photo-hosting service")]
#[command(version)]
struct Args {
    /// Gallery2 database hostname
    #[arg(long, default_value = "localhost")]
    db_host: String,

    /// Gallery2 database username
    #[arg(long)]
    db_user: String,

    /// Gallery2 database password
    #[arg(long, env = "G2_DB_PASSWORD", default_value = "")]
    db_password: String,

    /// Gallery2 database name
    #[arg(long, default_value = "gallery2")]
    db_name: String,

    /// Table name prefix
    #[arg(long, default_value = "g2_")]
    table_prefix: String,

    /// Field name prefix
    #[arg(long, default_value = "g_")]
    field_prefix: String,

    /// Base URL of the remote hosting service API
    #[arg(long)]
    remote_url: String,

    /// Auth token for the remote hosting service
    #[arg(long, env = "G2_REMOTE_TOKEN", default_value = "")]
    remote_token: String,

    /// Access level for created albums ("public" or "private")
    #[arg(long, default_value = "private")]
    privacy: String,

    /// Do not prompt for confirmation before each album
    #[arg(long)]
    no_confirm: bool,

    /// Exclude movies from the upload
    #[arg(long)]
    exclude_movies: bool,

    /// Log what would be uploaded without performing any remote call
    #[arg(long)]
    dry_run: bool,

    /// Root of the Gallery2 data directory
    #[arg(long, default_value = "/var/local/g2data")]
    gallery_root: PathBuf,

    /// Construct long album titles from parents' titles
    #[arg(long)]
    long_titles: bool,

    /// Truncate this many leading ancestor titles from long titles
    #[arg(long, default_value_t = 0)]
    truncate_count: usize,

    /// Only upload the album with this display title
    #[arg(long)]
    single_album: Option<String>,

    /// Retry failed rotation/comment metadata calls instead of ignoring them
    #[arg(long)]
    retry_metadata: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "g2migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting g2migrate {}", env!("CARGO_PKG_VERSION"));
    if args.dry_run {
        info!("Dry run: no remote mutation will be performed");
    }

    let store_config = StoreConfig {
        host: args.db_host.clone(),
        user: args.db_user.clone(),
        password: args.db_password.clone(),
        database: args.db_name.clone(),
        table_prefix: args.table_prefix.clone(),
        field_prefix: args.field_prefix.clone(),
    };
    let store = MySqlStore::connect(&store_config)
        .await
        .context("Failed to connect to the Gallery2 database")?;

    // The store connection is released on every exit path.
    let result = run_migration(&store, &args).await;
    store.close().await;

    let summary = result?;
    info!(
        albums_uploaded = summary.albums_uploaded,
        albums_skipped = summary.albums_skipped,
        remote_albums_created = summary.remote_albums_created,
        items_uploaded = summary.items_uploaded,
        items_skipped = summary.items_skipped,
        "Migration complete"
    );

    Ok(())
}

async fn run_migration(store: &MySqlStore, args: &Args) -> Result<MigrationSummary> {
    let options = GalleryOptions {
        long_titles: args.long_titles,
        truncate_count: args.truncate_count,
        exclude_movies: args.exclude_movies,
    };
    let gallery = gallery::load_gallery(store, &options)
        .await
        .context("Failed to load the gallery from the store")?;

    let remote_config = RemoteConfig {
        base_url: args.remote_url.clone(),
        auth_token: args.remote_token.clone(),
    };
    let remote =
        HttpRemoteGallery::new(&remote_config).context("Failed to build the remote client")?;

    let migrate_config = MigrateConfig {
        access: AccessLevel::parse(&args.privacy),
        confirm_each: !args.no_confirm,
        exclude_movies: args.exclude_movies,
        dry_run: args.dry_run,
        gallery_root: args.gallery_root.clone(),
        single_album: args.single_album.clone(),
        metadata_policy: if args.retry_metadata {
            MetadataPolicy::Retry
        } else {
            MetadataPolicy::Ignore
        },
    };

    let uploader = Uploader::new(&remote, &migrate_config);
    let mut confirmer = StdinConfirmer;
    let summary = uploader.run(&gallery, &mut confirmer).await?;

    Ok(summary)
}
