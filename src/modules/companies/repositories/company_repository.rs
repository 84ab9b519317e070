use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::companies::models::Company;

/// Repository for company settings
pub struct CompanyRepository {
    pool: MySqlPool,
}

impl CompanyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, address, city, postal_code, country, tax_id,
                   bank_name, bank_account, bank_iban, bank_bic,
                   invoice_prefix, invoice_start_number,
                   quote_prefix, quote_start_number, number_pad_width,
                   invoice_terms, created_at, updated_at
            FROM companies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Persist a merged settings row. The row must already exist.
    pub async fn update(&self, company: &Company) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = ?, address = ?, city = ?, postal_code = ?, country = ?,
                tax_id = ?, bank_name = ?, bank_account = ?, bank_iban = ?,
                bank_bic = ?, invoice_prefix = ?, invoice_start_number = ?,
                quote_prefix = ?, quote_start_number = ?, invoice_terms = ?
            WHERE id = ?
            "#,
        )
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.city)
        .bind(&company.postal_code)
        .bind(&company.country)
        .bind(&company.tax_id)
        .bind(&company.bank_name)
        .bind(&company.bank_account)
        .bind(&company.bank_iban)
        .bind(&company.bank_bic)
        .bind(&company.invoice_prefix)
        .bind(company.invoice_start_number)
        .bind(&company.quote_prefix)
        .bind(company.quote_start_number)
        .bind(&company.invoice_terms)
        .bind(&company.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Company '{}' not found",
                company.id
            )));
        }

        Ok(())
    }
}
