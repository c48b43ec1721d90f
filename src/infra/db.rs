//! Database connection management.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};

use crate::config::Config;

/// Database wrapper for connection management.
///
/// Schema setup and migrations belong to the embedding application; this
/// crate only maps rows.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open a pooled connection using the configured URL.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(&config.database_url);
        options.max_connections(config.max_connections);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!("Database connected");
        Ok(Self { connection })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
