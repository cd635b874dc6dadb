use std::fmt::Debug;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_tiberius::ConnectionManager;
use common_utils::{Appliable, Logged};
use tiberius::Row;
use tracing::debug;

use registry_provider::{Customer, CustomerDetails, CustomerStore, RegistryError};

use super::storage_error;

// Primary key and unique index violations
const DUPLICATE_KEY_ERRORS: [u32; 2] = [2627, 2601];

fn conversion_error(column: &str) -> tiberius::error::Error {
    tiberius::error::Error::Conversion(format!("Column '{}' is missing", column).into())
}

fn customer_try_from_row(r: Row) -> Result<Customer, tiberius::error::Error> {
    let text = |idx: usize, column: &str| -> Result<String, tiberius::error::Error> {
        r.try_get::<&str, usize>(idx)?
            .map(|s| s.to_string())
            .ok_or_else(|| conversion_error(column))
    };
    Ok(Customer {
        id: text(0, "id")?,
        customer_details: CustomerDetails {
            name: text(1, "customerdetails_name")?,
            address: text(2, "customerdetails_address")?,
            contact_no: r
                .try_get::<i64, usize>(3)?
                .ok_or_else(|| conversion_error("customerdetails_contact_no"))?,
        },
    })
}

fn is_duplicate_key(e: &tiberius::error::Error) -> bool {
    match e {
        tiberius::error::Error::Server(token) => DUPLICATE_KEY_ERRORS.contains(&token.code()),
        _ => false,
    }
}

/**
 * Conditional insert touches no row when the id is already taken
 */
fn create_outcome(id: &str, affected: u64) -> Result<(), RegistryError> {
    if affected == 0 {
        return Err(RegistryError::CustomerExists(id.to_string()));
    }
    Ok(())
}

fn create_table_sql(table: &str) -> String {
    format!(
        "IF OBJECT_ID(N'{table}', N'U') IS NULL
        CREATE TABLE {table}
        (id nvarchar(50) NOT NULL PRIMARY KEY,
        customerdetails_name nvarchar(255) NOT NULL,
        customerdetails_address nvarchar(255) NOT NULL,
        customerdetails_contact_no bigint NOT NULL)",
        table = table
    )
}

pub fn validate_condition(conn_str: &str) -> bool {
    tiberius::Config::from_ado_string(conn_str).is_ok()
}

/**
 * Customer store on top of Azure SQL / SQL Server
 */
pub struct MsSqlStore {
    pool: Pool<ConnectionManager>,
    table: String,
}

impl Debug for MsSqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsSqlStore")
            .field("table", &self.table)
            .finish()
    }
}

impl MsSqlStore {
    pub async fn connect(conn_str: &str, table: &str) -> Result<Self, anyhow::Error> {
        debug!("Initializing MSSQL connection pool");
        let mgr = bb8_tiberius::ConnectionManager::build(conn_str)?;
        let pool = bb8::Pool::builder().max_size(5).build(mgr).await?;
        debug!("MSSQL connection pool initialized");
        let store = Self {
            pool,
            table: table.to_string(),
        };
        store.create_table().await?;
        Ok(store)
    }

    async fn create_table(&self) -> Result<(), anyhow::Error> {
        debug!("Creating customers table '{}' if not exists", self.table);
        let mut conn = self.pool.get().await?;
        conn.execute(create_table_sql(&self.table), &[]).await?;
        Ok(())
    }

    async fn connect_pooled(
        &self,
    ) -> Result<PooledConnection<'_, ConnectionManager>, RegistryError> {
        debug!("Acquiring MSSQL connection");
        let conn = self.pool.get().await.map_err(storage_error)?;
        debug!("Database connected");
        Ok(conn)
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT id, customerdetails_name, customerdetails_address, customerdetails_contact_no FROM {}",
            self.table
        )
    }
}

#[async_trait]
impl CustomerStore for MsSqlStore {
    async fn create(&self, customer: &Customer) -> Result<(), RegistryError> {
        let mut conn = self.connect_pooled().await?;
        let result = conn
            .execute(
                format!(
                    "INSERT INTO {table}
                    (id, customerdetails_name, customerdetails_address, customerdetails_contact_no)
                    SELECT @P1, @P2, @P3, @P4
                    WHERE NOT EXISTS (SELECT 1 FROM {table} WITH (UPDLOCK, HOLDLOCK) WHERE id = @P1)",
                    table = self.table
                )
                .apply(|s| {
                    debug!("SQL is: {}", s);
                    s
                }),
                &[
                    &customer.id,
                    &customer.customer_details.name,
                    &customer.customer_details.address,
                    &customer.customer_details.contact_no,
                ],
            )
            .await;
        match result {
            Ok(r) => create_outcome(&customer.id, r.total()),
            Err(e) if is_duplicate_key(&e) => {
                Err(RegistryError::CustomerExists(customer.id.clone()))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn get_all(&self) -> Result<Vec<Customer>, RegistryError> {
        let mut conn = self.connect_pooled().await?;
        let rows = conn
            .simple_query(self.select_sql())
            .await
            .map_err(storage_error)?
            .into_first_result()
            .await
            .map_err(storage_error)?;
        debug!("{} rows loaded", rows.len());
        rows.into_iter()
            .map(|r| customer_try_from_row(r).map_err(storage_error).log())
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Customer, RegistryError> {
        let mut conn = self.connect_pooled().await?;
        let row = conn
            .query(format!("{} WHERE id = @P1", self.select_sql()), &[&id])
            .await
            .map_err(storage_error)?
            .into_row()
            .await
            .map_err(storage_error)?;
        match row {
            Some(r) => customer_try_from_row(r).map_err(storage_error),
            None => Err(RegistryError::CustomerNotFound(id.to_string())),
        }
    }

    async fn update(&self, id: &str, customer: &Customer) -> Result<(), RegistryError> {
        let mut conn = self.connect_pooled().await?;
        let result = conn
            .execute(
                format!(
                    "UPDATE {}
                    SET id = @P1, customerdetails_name = @P2, customerdetails_address = @P3, customerdetails_contact_no = @P4
                    WHERE id = @P5",
                    self.table
                ),
                &[
                    &customer.id,
                    &customer.customer_details.name,
                    &customer.customer_details.address,
                    &customer.customer_details.contact_no,
                    &id,
                ],
            )
            .await
            .map_err(storage_error)?;
        if result.total() == 0 {
            return Err(RegistryError::CustomerNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let mut conn = self.connect_pooled().await?;
        let result = conn
            .execute(format!("DELETE FROM {} WHERE id = @P1", self.table), &[&id])
            .await
            .map_err(storage_error)?;
        if result.total() == 0 {
            return Err(RegistryError::CustomerNotFound(id.to_string()));
        }
        Ok(())
    }
}
