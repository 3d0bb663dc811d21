//! Domain DTOs for the organisation accounts resource.
//!
//! # Design
//! These types mirror the upstream API schema but are defined independently
//! from the mock-server crate; integration tests catch schema drift between
//! the two. Identifiers are kept as `String` rather than `Uuid` so the server,
//! not the client, decides what a valid identifier is.

use serde::{Deserialize, Serialize};

/// Resource type of every organisation account.
pub const ACCOUNT_TYPE: &str = "accounts";

fn default_account_type() -> String {
    ACCOUNT_TYPE.to_string()
}

/// An organisation account record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub organisation_id: String,
    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: String,
    /// Assigned by the server; required to delete the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AccountAttributes>,
}

impl Account {
    /// An account with no version and no attributes.
    pub fn new(id: impl Into<String>, organisation_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            organisation_id: organisation_id.into(),
            account_type: default_account_type(),
            version: None,
            attributes: None,
        }
    }

    /// An account carrying the attributes most registrations need.
    ///
    /// `country` is always sent, even when empty. Empty bank identifiers and
    /// BIC are left out.
    pub fn basic<I, S>(
        id: &str,
        organisation_id: &str,
        country: &str,
        bank_id: &str,
        bank_id_code: &str,
        bic: &str,
        names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes = AccountAttributes {
            country: Some(country.to_string()),
            bank_id: non_empty(bank_id),
            bank_id_code: non_empty(bank_id_code),
            bic: non_empty(bic),
            name: names.into_iter().map(Into::into).collect(),
            ..AccountAttributes::default()
        };
        Self {
            attributes: Some(attributes),
            ..Self::new(id, organisation_id)
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Optional attributes of an account. Absent fields are omitted from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
}

/// Request envelope for creating an account.
#[derive(Debug, Serialize)]
pub struct AccountRequest<'a> {
    pub data: &'a Account,
}

/// Navigation links returned alongside a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Response envelope returned by every client operation.
///
/// `status_code` comes from the HTTP response, never from the JSON body, and
/// is set even when the body was empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ResponseLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip)]
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "eb0bd6f5-c3f5-44b2-b677-bcd23cdde73c";

    #[test]
    fn basic_account_omits_absent_fields() {
        let account = Account::basic(ID, ID, "GB", "", "GBDSC", "", ["Jane Doe"]);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": ID,
                "organisation_id": ID,
                "type": "accounts",
                "attributes": {
                    "country": "GB",
                    "bank_id_code": "GBDSC",
                    "name": ["Jane Doe"]
                }
            })
        );
    }

    #[test]
    fn empty_country_is_still_sent() {
        let account = Account::basic(ID, ID, "", "123456", "GBDSC", "EXMPLGB2XXX", ["Jane"]);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["attributes"]["country"], "");
    }

    #[test]
    fn account_type_defaults_when_missing() {
        let account: Account =
            serde_json::from_str(&format!(r#"{{"id":"{ID}","organisation_id":"{ID}"}}"#)).unwrap();
        assert_eq!(account.account_type, ACCOUNT_TYPE);
        assert!(account.version.is_none());
        assert!(account.attributes.is_none());
    }

    #[test]
    fn request_envelope_wraps_account_in_data() {
        let account = Account::new(ID, ID);
        let json = serde_json::to_value(AccountRequest { data: &account }).unwrap();
        assert_eq!(json["data"]["id"], ID);
        assert_eq!(json["data"]["type"], "accounts");
        assert!(json["data"].get("version").is_none());
    }

    #[test]
    fn response_envelope_ignores_status_in_body() {
        let response: AccountResponse =
            serde_json::from_str(r#"{"error_message":"boom","status_code":418}"#).unwrap();
        assert_eq!(response.error_message.as_deref(), Some("boom"));
        assert_eq!(response.status_code, 0);
        assert!(response.data.is_none());
    }

    #[test]
    fn response_links_read_self() {
        let response: AccountResponse =
            serde_json::from_str(r#"{"links":{"self":"/v1/organisation/accounts/x"}}"#).unwrap();
        let links = response.links.unwrap();
        assert_eq!(links.self_link.as_deref(), Some("/v1/organisation/accounts/x"));
        assert!(links.next.is_none());
    }
}
