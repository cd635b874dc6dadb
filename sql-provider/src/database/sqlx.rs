use std::str::FromStr;

use async_trait::async_trait;
use itertools::Itertools;
use log::debug;
use sqlx::{
    any::{AnyKind, AnyPoolOptions},
    AnyConnection, AnyPool, ConnectOptions, Connection, FromRow,
};

use common_utils::Logged;
use registry_provider::{Customer, CustomerDetails, CustomerStore, RegistryError};

use super::storage_error;

const COLUMNS: [&str; 4] = [
    "id",
    "customerdetails_name",
    "customerdetails_address",
    "customerdetails_contact_no",
];

#[derive(FromRow)]
struct CustomerRow {
    id: String,
    customerdetails_name: String,
    customerdetails_address: String,
    customerdetails_contact_no: i64,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: r.id,
            customer_details: CustomerDetails {
                name: r.customerdetails_name,
                address: r.customerdetails_address,
                contact_no: r.customerdetails_contact_no,
            },
        }
    }
}

pub fn validate_condition(conn_str: &str) -> bool {
    conn_str
        .parse::<<AnyConnection as Connection>::Options>()
        .is_ok()
}

/**
 * Customer store on top of PostgreSQL, MySQL or SQLite
 */
#[derive(Debug)]
pub struct SqlxStore {
    pool: AnyPool,
    kind: AnyKind,
    table: String,
}

impl SqlxStore {
    pub async fn connect(conn_str: &str, table: &str) -> Result<Self, anyhow::Error> {
        Self::connect_with(AnyPoolOptions::new().max_connections(5), conn_str, table).await
    }

    pub async fn connect_with(
        pool_options: AnyPoolOptions,
        conn_str: &str,
        table: &str,
    ) -> Result<Self, anyhow::Error> {
        let kind = conn_str
            .parse::<<AnyConnection as Connection>::Options>()?
            .kind();
        if kind == AnyKind::Sqlite {
            // HACK:
            // Ensure the database file is created.
            // For unknown reason AnyConnection doesn't create the database file
            let conn = sqlx::sqlite::SqliteConnectOptions::from_str(conn_str)?
                .create_if_missing(true)
                .connect()
                .await?;
            conn.close().await?;
        }

        debug!("Initializing SQLx connection pool");
        let pool = pool_options.connect(conn_str).await?;
        debug!("SQLx connection pool initialized");

        let store = Self {
            pool,
            kind,
            table: table.to_string(),
        };
        store.create_table().await?;
        Ok(store)
    }

    async fn create_table(&self) -> Result<(), anyhow::Error> {
        debug!("Creating customers table '{}' if not exists", self.table);
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS {}
            (id varchar(50) NOT NULL,
            customerdetails_name varchar(255) NOT NULL,
            customerdetails_address varchar(255) NOT NULL,
            customerdetails_contact_no bigint NOT NULL,
            PRIMARY KEY (id))"#,
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /**
     * Bind parameter placeholders, PostgreSQL numbers them, others don't
     */
    fn params(&self, n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| match self.kind {
                AnyKind::Postgres => format!("${}", i),
                _ => "?".to_string(),
            })
            .collect()
    }

    fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", COLUMNS.iter().join(", "), self.table)
    }
}

#[async_trait]
impl CustomerStore for SqlxStore {
    #[tracing::instrument(level = "trace", skip(self))]
    async fn create(&self, customer: &Customer) -> Result<(), RegistryError> {
        let values = self.params(COLUMNS.len()).join(", ");
        let columns = COLUMNS.iter().join(", ");
        // Conflicting rows are ignored and then detected by the affected row count
        let sql = match self.kind {
            AnyKind::Postgres => format!(
                r#"INSERT INTO {} ({}) values ({}) ON CONFLICT DO NOTHING"#,
                self.table, columns, values
            ),
            AnyKind::MySql => format!(
                r#"INSERT IGNORE INTO {} ({}) values ({})"#,
                self.table, columns, values
            ),
            AnyKind::Sqlite => format!(
                r#"INSERT OR IGNORE INTO {} ({}) values ({})"#,
                self.table, columns, values
            ),
        };
        let result = sqlx::query(&sql)
            .bind(customer.id.as_str())
            .bind(customer.customer_details.name.as_str())
            .bind(customer.customer_details.address.as_str())
            .bind(customer.customer_details.contact_no)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(RegistryError::CustomerExists(customer.id.clone()));
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn get_all(&self) -> Result<Vec<Customer>, RegistryError> {
        let sql = self.select_sql();
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
            .log()?;
        debug!("{} rows loaded", rows.len());
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Customer, RegistryError> {
        let sql = format!("{} WHERE id = {}", self.select_sql(), self.params(1)[0]);
        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .map(Customer::from)
            .ok_or_else(|| RegistryError::CustomerNotFound(id.to_string()))
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn update(&self, id: &str, customer: &Customer) -> Result<(), RegistryError> {
        let params = self.params(COLUMNS.len());
        let sql = format!(
            r#"UPDATE {} SET {} WHERE id = {}"#,
            self.table,
            COLUMNS
                .iter()
                .zip(params.iter())
                .map(|(c, p)| format!("{} = {}", c, p))
                .join(", "),
            match self.kind {
                AnyKind::Postgres => "$5".to_string(),
                _ => "?".to_string(),
            }
        );
        let result = sqlx::query(&sql)
            .bind(customer.id.as_str())
            .bind(customer.customer_details.name.as_str())
            .bind(customer.customer_details.address.as_str())
            .bind(customer.customer_details.contact_no)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            // MySQL doesn't count rows updated with identical values
            self.get_by_id(id).await?;
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let sql = format!(
            r#"DELETE FROM {} WHERE id = {}"#,
            self.table,
            self.params(1)[0]
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(RegistryError::CustomerNotFound(id.to_string()));
        }
        Ok(())
    }
}
