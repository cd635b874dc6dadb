use std::{fmt::Debug, sync::Arc};

use log::info;
use registry_provider::{CustomerStore, RegistryError};

use crate::MemoryStore;

#[cfg(feature = "mssql")]
mod mssql;

#[cfg(feature = "ossdbms")]
mod sqlx;

#[cfg(feature = "mssql")]
pub use self::mssql::MsSqlStore;

#[cfg(feature = "ossdbms")]
pub use self::sqlx::SqlxStore;

pub fn get_customer_table() -> String {
    std::env::var("CUSTOMER_TABLE").unwrap_or_else(|_| "customers".to_string())
}

fn get_connection_str() -> Option<String> {
    std::env::var("CONNECTION_STR").ok()
}

pub(crate) fn storage_error<E: Debug>(e: E) -> RegistryError {
    RegistryError::ExternalStorageError(format!("{:?}", e))
}

/**
 * Pick the customer store according to `CONNECTION_STR`.
 * URL-style connection strings go to SQLx, ADO strings go to MSSQL,
 * in-memory store is used when the variable is not set.
 */
pub async fn load_store() -> Result<Arc<dyn CustomerStore>, anyhow::Error> {
    let conn_str = match get_connection_str() {
        Some(s) => s,
        None => {
            info!("Environment variable 'CONNECTION_STR' is not set, using in-memory store");
            return Ok(Arc::new(MemoryStore::new()));
        }
    };

    #[cfg(feature = "ossdbms")]
    if self::sqlx::validate_condition(&conn_str) {
        info!("Using SQLx customer store");
        return Ok(Arc::new(
            SqlxStore::connect(&conn_str, &get_customer_table()).await?,
        ));
    }

    #[cfg(feature = "mssql")]
    if self::mssql::validate_condition(&conn_str) {
        info!("Using MSSQL customer store");
        return Ok(Arc::new(
            MsSqlStore::connect(&conn_str, &get_customer_table()).await?,
        ));
    }

    anyhow::bail!("Unsupported connection string in 'CONNECTION_STR'")
}
