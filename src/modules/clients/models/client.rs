use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A billable customer of a company
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

impl Client {
    pub fn new(company_id: &str, request: CreateClientRequest) -> Result<Self> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Client name cannot be empty"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            tax_id: request.tax_id,
            created_at: Utc::now(),
        })
    }

    pub fn apply_update(mut self, update: UpdateClientRequest) -> Result<Self> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Client name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = Some(tax_id);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_name() {
        let result = Client::new(
            "c-1",
            CreateClientRequest {
                name: "  ".to_string(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                tax_id: None,
            },
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_client_update_keeps_absent_fields() {
        let client = Client::new(
            "c-1",
            CreateClientRequest {
                name: "Dupont SARL".to_string(),
                email: "contact@dupont.fr".to_string(),
                phone: String::new(),
                address: String::new(),
                tax_id: None,
            },
        )
        .unwrap();

        let updated = client
            .apply_update(UpdateClientRequest {
                name: None,
                email: None,
                phone: Some("+33 1 23 45 67 89".to_string()),
                address: None,
                tax_id: None,
            })
            .unwrap();

        assert_eq!(updated.name, "Dupont SARL");
        assert_eq!(updated.email, "contact@dupont.fr");
        assert_eq!(updated.phone, "+33 1 23 45 67 89");
    }
}
