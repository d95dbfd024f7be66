use async_trait::async_trait;
use sqlx::{mysql::MySqlPool, FromRow};

use crate::domain::{
    customer::{Customer, CustomerFields, CustomerId, CustomerRepository, PublicId},
    StoreError,
};
use crate::Database;

const SELECT_ALL: &str = "SELECT id, customer_id, name, address, province, cif FROM customer";
const SELECT_ONE: &str =
    "SELECT id, customer_id, name, address, province, cif FROM customer WHERE id = ?";

/// Row shape of the `customer` table.
#[derive(Debug, FromRow)]
struct CustomerRow {
    id: u64,
    customer_id: String,
    name: String,
    address: String,
    province: String,
    cif: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::restore(
            CustomerId::from(row.id),
            PublicId::from(row.customer_id),
            CustomerFields {
                name: row.name,
                address: row.address,
                province: row.province,
                cif: row.cif,
            },
        )
    }
}

/// Persistence gateway over the `customer` table.
pub struct MySqlCustomerRepository {
    pool: MySqlPool,
}

impl MySqlCustomerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects a pool and brings the schema up to date.
    pub async fn connect(database: &Database) -> Result<Self, sqlx::Error> {
        let pool = MySqlPool::connect(&database.url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CustomerRepository for MySqlCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(SELECT_ONE)
            .bind(*id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn save(&self, customer: &mut Customer) -> Result<(), StoreError> {
        match customer.id() {
            Some(id) => {
                // The public id column is never rewritten.
                sqlx::query(
                    "UPDATE customer SET name = ?, address = ?, province = ?, cif = ? \
                     WHERE id = ?",
                )
                .bind(customer.name())
                .bind(customer.address())
                .bind(customer.province())
                .bind(customer.cif())
                .bind(*id)
                .execute(&self.pool)
                .await?;
            }
            None => {
                let result = sqlx::query(
                    "INSERT INTO customer (customer_id, name, address, province, cif) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(customer.public_id().as_str())
                .bind(customer.name())
                .bind(customer.address())
                .bind(customer.province())
                .bind(customer.cif())
                .execute(&self.pool)
                .await?;
                customer.assign_id(CustomerId::from(result.last_insert_id()));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(*id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
