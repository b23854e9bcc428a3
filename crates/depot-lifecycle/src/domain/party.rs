use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared, non-owning handle to a registered party.
pub type PartyRef = Arc<Party>;

/// A depot, lessor or customer identified by its BIC facility code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Party {
    pub fn new(company_id: impl Into<String>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            code: Some(code.into()),
            name: Some(name.into()),
            user_code: None,
            user_name: None,
            email: None,
            phone: None,
            fax_number: None,
            street_address: None,
            street_address2: None,
            city: None,
            postal_code: None,
            country_code: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Reference carrying only the facility code, as clients usually send it.
    pub fn reference(company_id: impl Into<String>) -> PartyRef {
        let mut party = Self::new(company_id, "", "");
        party.code = None;
        party.name = None;
        Arc::new(party)
    }

    pub fn with_user(mut self, user_code: impl Into<String>, user_name: impl Into<String>) -> Self {
        self.user_code = Some(user_code.into());
        self.user_name = Some(user_name.into());
        self
    }

    pub fn into_ref(self) -> PartyRef {
        Arc::new(self)
    }
}
