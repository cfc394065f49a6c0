//! Demo data seeding
//!
//! Creates the `users` and `orders` tables if they are missing, wipes them and
//! inserts a small fixed data set. Used by `veil seed` and `veil run --mode test`.

use crate::adapters::database::sql::{placeholder, quote_ident};
use crate::adapters::database::DatabaseClient;
use crate::config::Dialect;
use crate::domain::{Result, SqlValue};

const USERS: [(i64, &str, &str, &str, &str); 2] = [
    (1, "john.doe@example.com", "1234567890", "password123", "123 Main St"),
    (2, "jane.doe@example.com", "0987654321", "password456", "456 Elm St"),
];

const ORDERS: [(i64, &str, &str, i64); 2] = [
    (1, "123 Main St", "2023-01-01", 1),
    (2, "456 Elm St", "2023-01-02", 2),
];

/// Rows inserted by a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub orders: u64,
}

fn create_statements(dialect: Dialect) -> [String; 2] {
    let q = |ident: &str| quote_ident(dialect, ident);
    let int = match dialect {
        Dialect::Postgres => "INTEGER",
        Dialect::MySql => "INT",
    };

    [
        format!(
            "CREATE TABLE IF NOT EXISTS {users} ({id} {int} PRIMARY KEY, {email} VARCHAR(255), {phone} VARCHAR(20), {password} VARCHAR(255), {address} VARCHAR(255))",
            users = q("users"),
            id = q("id"),
            email = q("email"),
            phone = q("phone"),
            password = q("password"),
            address = q("address"),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {orders} ({id} {int} PRIMARY KEY, {shipping} VARCHAR(255), {date} DATE, {user_id} {int}, FOREIGN KEY ({user_id}) REFERENCES {users}({id}))",
            orders = q("orders"),
            id = q("id"),
            shipping = q("shipping_address"),
            date = q("order_date"),
            user_id = q("user_id"),
            users = q("users"),
        ),
    ]
}

fn insert_statement(dialect: Dialect, table: &str, columns: &[&str]) -> String {
    let names = columns
        .iter()
        .map(|c| quote_ident(dialect, c))
        .collect::<Vec<_>>()
        .join(", ");
    let values = (1..=columns.len())
        .map(|i| placeholder(dialect, i))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({names}) VALUES ({values})",
        quote_ident(dialect, table)
    )
}

/// Seeds the demo tables
pub struct TestSeeder<'a> {
    db: &'a mut dyn DatabaseClient,
}

impl<'a> TestSeeder<'a> {
    pub fn new(db: &'a mut dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Create, wipe and fill the demo tables
    ///
    /// Table creation runs outside the transaction because MySQL commits DDL
    /// implicitly; the wipe and inserts are one transaction.
    pub async fn run(&mut self) -> Result<SeedReport> {
        let dialect = self.db.dialect();
        tracing::info!(dialect = %dialect, "Running test seeder");

        for statement in create_statements(dialect) {
            self.db.execute_update(&statement, &[]).await?;
        }

        self.db.begin().await?;
        match self.fill(dialect).await {
            Ok(report) => {
                self.db.commit().await?;
                tracing::info!(users = report.users, orders = report.orders, "Test data seeded");
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback of seed data failed");
                }
                Err(e)
            }
        }
    }

    async fn fill(&mut self, dialect: Dialect) -> Result<SeedReport> {
        for table in ["orders", "users"] {
            let wipe = format!("DELETE FROM {}", quote_ident(dialect, table));
            self.db.execute_update(&wipe, &[]).await?;
        }
        tracing::debug!("Previous test data wiped");

        let mut report = SeedReport { users: 0, orders: 0 };

        let insert_user = insert_statement(
            dialect,
            "users",
            &["id", "email", "phone", "password", "address"],
        );
        for (id, email, phone, password, address) in USERS {
            let params = [
                SqlValue::Int(id),
                email.into(),
                phone.into(),
                password.into(),
                address.into(),
            ];
            report.users += self.db.execute_update(&insert_user, &params).await?;
        }

        let insert_order = insert_statement(
            dialect,
            "orders",
            &["id", "shipping_address", "order_date", "user_id"],
        );
        for (id, shipping_address, order_date, user_id) in ORDERS {
            let params = [
                SqlValue::Int(id),
                shipping_address.into(),
                order_date.into(),
                SqlValue::Int(user_id),
            ];
            report.orders += self.db.execute_update(&insert_order, &params).await?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_statement_placeholders() {
        assert_eq!(
            insert_statement(Dialect::Postgres, "orders", &["id", "user_id"]),
            r#"INSERT INTO "orders" ("id", "user_id") VALUES ($1, $2)"#
        );
        assert_eq!(
            insert_statement(Dialect::MySql, "orders", &["id", "user_id"]),
            "INSERT INTO `orders` (`id`, `user_id`) VALUES (?, ?)"
        );
    }

    #[test]
    fn test_create_statements_are_dialect_specific() {
        let [users, orders] = create_statements(Dialect::MySql);
        assert!(users.starts_with("CREATE TABLE IF NOT EXISTS `users` (`id` INT PRIMARY KEY"));
        assert!(orders.contains("FOREIGN KEY (`user_id`) REFERENCES `users`(`id`)"));

        let [users, _] = create_statements(Dialect::Postgres);
        assert!(users.contains(r#""id" INTEGER PRIMARY KEY"#));
    }
}
