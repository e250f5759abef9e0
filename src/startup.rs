use crate::{
    config::Config,
    data::store::StateStore,
    error::AppError,
    service::tracker::Tracker,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the bot can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Loads the tracker from the configured storage backend.
///
/// # Arguments
/// - `config` - Backend selection, data directory, admin roles and flush interval
/// - `db` - Database used when the SQLite backend is selected
///
/// # Returns
/// - `Ok(Tracker)` - Tracker with persisted state restored
/// - `Err(AppError)` - The data directory could not be created or the SQL load failed
pub async fn load_tracker(
    config: &Config,
    db: &sea_orm::DatabaseConnection,
) -> Result<Tracker, AppError> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let store = StateStore::for_backend(config.storage_backend, &config.data_dir, db);
    tracing::info!("Using {:?} storage backend", config.storage_backend);

    Tracker::load(
        store,
        config.roles.admins.clone(),
        config.tracker.flush_every,
    )
    .await
}

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
