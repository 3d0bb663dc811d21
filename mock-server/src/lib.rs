//! In-memory emulation of the organisation accounts API.
//!
//! Mirrors the upstream status codes and error bodies closely enough for the
//! client's integration tests: validation failures are 400 with an
//! `error_message`, missing records are 404, and a stale version on delete is
//! 409.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// A stored account as returned to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub account_type: String,
    pub version: i64,
    pub attributes: Map<String, Value>,
}

/// Account as submitted by a client. Every field is defaulted so that shape
/// problems are reported by `validate` rather than by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub organisation_id: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub data: NewAccount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountBody {
    pub data: Account,
    pub links: Links,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_message: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub version: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_account(
    State(db): State<Db>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let account = match validate(request.data) {
        Ok(account) => account,
        Err(failures) => {
            let message = format!("validation failure list:\n{}", failures.join("\n"));
            return error(StatusCode::BAD_REQUEST, message);
        }
    };

    let mut accounts = db.write().await;
    if accounts.contains_key(&account.id) {
        return error(
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint",
        );
    }
    info!(id = %account.id, "account created");
    accounts.insert(account.id, account.clone());
    (StatusCode::CREATED, Json(envelope(account))).into_response()
}

async fn fetch_account(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<Uuid>() else {
        return error(StatusCode::BAD_REQUEST, "id is not a valid uuid");
    };
    match db.read().await.get(&id) {
        Some(account) => Json(envelope(account.clone())).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("record {id} does not exist")),
    }
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Ok(id) = id.parse::<Uuid>() else {
        return error(StatusCode::BAD_REQUEST, "id is not a valid uuid");
    };
    let Some(version) = params.version.and_then(|v| v.parse::<i64>().ok()) else {
        return error(StatusCode::BAD_REQUEST, "invalid version number");
    };

    let mut accounts = db.write().await;
    let Some(stored) = accounts.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if stored.version != version {
        return error(StatusCode::CONFLICT, "invalid version");
    }
    accounts.remove(&id);
    info!(%id, version, "account deleted");
    StatusCode::NO_CONTENT.into_response()
}

/// Check a submitted account, collecting every failure.
pub fn validate(new: NewAccount) -> Result<Account, Vec<String>> {
    let mut failures = Vec::new();

    let id = new.id.parse::<Uuid>().map_err(|_| {
        failures.push(format!("id in body must be of type uuid: {:?}", new.id));
    });
    let organisation_id = new.organisation_id.parse::<Uuid>().map_err(|_| {
        failures.push(format!(
            "organisation_id in body must be of type uuid: {:?}",
            new.organisation_id
        ));
    });
    if new.account_type != "accounts" {
        failures.push("type in body should be one of [accounts]".to_string());
    }

    match &new.attributes {
        None => failures.push("attributes in body is required".to_string()),
        Some(attributes) => {
            let country = attributes.get("country").and_then(Value::as_str).unwrap_or_default();
            if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
                failures.push("country in body should match '^[A-Z]{2}$'".to_string());
            }
            match attributes.get("name").and_then(Value::as_array) {
                Some(names) if !names.is_empty() => {
                    for (i, name) in names.iter().enumerate() {
                        if name.as_str().map_or(true, str::is_empty) {
                            failures.push(format!("name.{i} in body should be at least 1 chars long"));
                        }
                    }
                }
                _ => failures.push("name in body is required".to_string()),
            }
        }
    }

    match (id, organisation_id, new.attributes) {
        (Ok(id), Ok(organisation_id), Some(attributes)) if failures.is_empty() => Ok(Account {
            id,
            organisation_id,
            account_type: new.account_type,
            version: 0,
            attributes,
        }),
        _ => Err(failures),
    }
}

fn envelope(account: Account) -> AccountBody {
    let links = Links {
        self_link: format!("{ACCOUNTS_PATH}/{}", account.id),
    };
    AccountBody {
        data: account,
        links,
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error_message: message.into(),
    };
    (status, Json(body)).into_response()
}
