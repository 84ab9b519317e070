use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::products::models::Product;

/// Repository for the product catalog
pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, company_id, name, description, default_price, default_tax_rate, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.company_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.default_price)
        .bind(product.default_tax_rate)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str, company_id: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, company_id, name, description, default_price, default_tax_rate, created_at
            FROM products
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn list(&self, company_id: &str) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, company_id, name, description, default_price, default_tax_rate, created_at
            FROM products
            WHERE company_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn update(&self, product: &Product) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, default_price = ?, default_tax_rate = ?
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.default_price)
        .bind(product.default_tax_rate)
        .bind(&product.id)
        .bind(&product.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product '{}' not found",
                product.id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str, company_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product '{}' not found", id)));
        }

        Ok(())
    }
}
