use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A company is the tenant boundary: every client, product, tax rate, quote
/// and invoice belongs to exactly one company.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub tax_id: String,
    pub bank_name: String,
    pub bank_account: String,
    pub bank_iban: String,
    pub bank_bic: String,

    /// Numbering configuration. Prefixes and pad width are part of the
    /// numbering contract and should not change once documents exist.
    pub invoice_prefix: String,
    pub invoice_start_number: i64,
    pub quote_prefix: String,
    pub quote_start_number: i64,
    pub number_pad_width: i32,

    pub invoice_terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Header patch for company settings; absent fields are left untouched
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub tax_id: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub bank_iban: Option<String>,
    pub bank_bic: Option<String>,
    pub invoice_prefix: Option<String>,
    pub invoice_start_number: Option<i64>,
    pub quote_prefix: Option<String>,
    pub quote_start_number: Option<i64>,
    pub invoice_terms: Option<String>,
}

impl Company {
    /// Apply a settings patch, returning the merged row
    pub fn apply_update(mut self, update: UpdateCompanyRequest) -> Self {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(postal_code) = update.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(country) = update.country {
            self.country = country;
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = tax_id;
        }
        if let Some(bank_name) = update.bank_name {
            self.bank_name = bank_name;
        }
        if let Some(bank_account) = update.bank_account {
            self.bank_account = bank_account;
        }
        if let Some(bank_iban) = update.bank_iban {
            self.bank_iban = bank_iban;
        }
        if let Some(bank_bic) = update.bank_bic {
            self.bank_bic = bank_bic;
        }
        if let Some(invoice_prefix) = update.invoice_prefix {
            self.invoice_prefix = invoice_prefix;
        }
        if let Some(invoice_start_number) = update.invoice_start_number {
            self.invoice_start_number = invoice_start_number;
        }
        if let Some(quote_prefix) = update.quote_prefix {
            self.quote_prefix = quote_prefix;
        }
        if let Some(quote_start_number) = update.quote_start_number {
            self.quote_start_number = quote_start_number;
        }
        if let Some(invoice_terms) = update.invoice_terms {
            self.invoice_terms = Some(invoice_terms);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        Company {
            id: "c-1".to_string(),
            name: "Acme".to_string(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: String::new(),
            tax_id: String::new(),
            bank_name: String::new(),
            bank_account: String::new(),
            bank_iban: String::new(),
            bank_bic: String::new(),
            invoice_prefix: "INV-".to_string(),
            invoice_start_number: 1000,
            quote_prefix: "Q-".to_string(),
            quote_start_number: 1,
            number_pad_width: 4,
            invoice_terms: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_update_merges_present_fields_only() {
        let update = UpdateCompanyRequest {
            name: Some("Acme SARL".to_string()),
            address: None,
            city: None,
            postal_code: None,
            country: None,
            tax_id: None,
            bank_name: None,
            bank_account: None,
            bank_iban: None,
            bank_bic: None,
            invoice_prefix: None,
            invoice_start_number: Some(2000),
            quote_prefix: None,
            quote_start_number: None,
            invoice_terms: None,
        };

        let merged = company().apply_update(update);
        assert_eq!(merged.name, "Acme SARL");
        assert_eq!(merged.invoice_start_number, 2000);
        assert_eq!(merged.invoice_prefix, "INV-");
        assert_eq!(merged.quote_start_number, 1);
    }
}
