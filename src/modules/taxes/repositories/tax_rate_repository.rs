use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::taxes::models::TaxRate;

/// Repository for configured tax rates
pub struct TaxRateRepository {
    pool: MySqlPool,
}

impl TaxRateRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, tax_rate: &TaxRate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tax_rates (id, company_id, name, rate, is_default, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tax_rate.id)
        .bind(&tax_rate.company_id)
        .bind(&tax_rate.name)
        .bind(tax_rate.rate)
        .bind(tax_rate.is_default)
        .bind(tax_rate.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str, company_id: &str) -> Result<Option<TaxRate>> {
        let tax_rate = sqlx::query_as::<_, TaxRate>(
            r#"
            SELECT id, company_id, name, rate, is_default, created_at
            FROM tax_rates
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tax_rate)
    }

    /// List rates with the default rate first
    pub async fn list(&self, company_id: &str) -> Result<Vec<TaxRate>> {
        let tax_rates = sqlx::query_as::<_, TaxRate>(
            r#"
            SELECT id, company_id, name, rate, is_default, created_at
            FROM tax_rates
            WHERE company_id = ?
            ORDER BY is_default DESC, created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tax_rates)
    }

    pub async fn update(&self, tax_rate: &TaxRate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tax_rates
            SET name = ?, rate = ?, is_default = ?
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&tax_rate.name)
        .bind(tax_rate.rate)
        .bind(tax_rate.is_default)
        .bind(&tax_rate.id)
        .bind(&tax_rate.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Tax rate '{}' not found",
                tax_rate.id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str, company_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM tax_rates WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Tax rate '{}' not found", id)));
        }

        Ok(())
    }
}
