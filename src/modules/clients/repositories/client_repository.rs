use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::clients::models::Client;

/// Repository for client reference data
pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, company_id, name, email, phone, address, tax_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.company_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.tax_id)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str, company_id: &str) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, company_id, name, email, phone, address, tax_id, created_at
            FROM clients
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn list(&self, company_id: &str) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, company_id, name, email, phone, address, tax_id, created_at
            FROM clients
            WHERE company_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn update(&self, client: &Client) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, email = ?, phone = ?, address = ?, tax_id = ?
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.tax_id)
        .bind(&client.id)
        .bind(&client.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client '{}' not found",
                client.id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str, company_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client '{}' not found", id)));
        }

        Ok(())
    }
}
