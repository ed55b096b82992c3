//! RPC method handler for the MyBookmarks JSON protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! [`handle_method`] decodes the params of one call into a typed payload,
//! dispatches it to the [`App`] services and encodes the result.
//!
//! Validation outcomes travel as data: `{"status":1}` on success and
//! `{"status":0,"message":..,"error":code}` on rejection. System failures are
//! logged in full and reported to the caller only as `"internal error"`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::types::bookmark::{BookmarkDraft, BookmarkId, CategoryFilter};
use crate::types::errors::{BookmarkError, UserError};
use crate::types::outcome::Outcome;
use crate::types::user::UserId;

pub const INTERNAL_ERROR: &str = "internal error";
pub const UNAUTHORIZED: &str = "unauthorized";

#[derive(Debug, Deserialize)]
struct AddParams {
    name: String,
    url: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
struct EditParams {
    id: BookmarkId,
    name: String,
    url: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    id: BookmarkId,
}

/// `old` is the bookmark being moved, `new` the bookmark whose slot it takes.
#[derive(Debug, Deserialize)]
struct ReorderParams {
    old: BookmarkId,
    new: BookmarkId,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default = "all_categories")]
    category: i64,
    #[serde(default)]
    start: i64,
}

fn all_categories() -> i64 {
    -1
}

#[derive(Debug, Deserialize)]
struct CategoryEditParams {
    old: String,
    new: String,
}

#[derive(Debug, Deserialize)]
struct CategoryDeleteParams {
    category: String,
}

/// Encodes an outcome in the wire shape the UI expects.
pub fn outcome_to_wire(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Accepted => json!({"status": 1}),
        Outcome::Unchanged(message) => json!({"status": 1, "message": message, "error": 0}),
        Outcome::Rejected(rejection) => json!({
            "status": 0,
            "message": rejection.message,
            "error": rejection.code.as_i32(),
        }),
    }
}

fn decode<T: DeserializeOwned>(params: &Value) -> Result<T, String> {
    // Methods without arguments may omit params entirely.
    let params = if params.is_null() { json!({}) } else { params.clone() };
    serde_json::from_value(params).map_err(|e| format!("bad request: {}", e))
}

fn internal(error: BookmarkError) -> String {
    tracing::debug!(error = %error, "reporting internal error to caller");
    INTERNAL_ERROR.to_string()
}

/// Looks up the id of `username`. Unknown users yield `None`.
pub async fn resolve_owner(app: &App, username: Option<&str>) -> Result<Option<UserId>, String> {
    let Some(username) = username else {
        return Ok(None);
    };
    match app.users.find_user(username).await {
        Ok(user) => Ok(user.map(|u| u.id)),
        Err(UserError::Store(e)) => {
            tracing::error!(error = %e, "user lookup failed");
            Err(INTERNAL_ERROR.to_string())
        }
        Err(e) => {
            tracing::debug!(error = %e, "user lookup rejected");
            Ok(None)
        }
    }
}

/// Dispatch one method call for `owner`.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(
    app: &App,
    owner: Option<UserId>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    if method == "ping" {
        return Ok(json!({"pong": true}));
    }

    let owner = owner.ok_or_else(|| UNAUTHORIZED.to_string())?;
    let service = &app.bookmarks;

    match method {
        // ─── Bookmarks ───
        "bookmark.list" => {
            let p: ListParams = decode(params)?;
            let filter = CategoryFilter::from_wire(p.category);
            let bookmarks = service
                .list_bookmarks(owner, filter, p.start)
                .await
                .map_err(internal)?;
            Ok(json!(bookmarks))
        }
        "bookmark.add" => {
            let p: AddParams = decode(params)?;
            let draft = BookmarkDraft::new(p.name, p.url, p.category);
            let outcome = service.add_bookmark(owner, &draft).await.map_err(internal)?;
            Ok(outcome_to_wire(&outcome))
        }
        "bookmark.edit" => {
            let p: EditParams = decode(params)?;
            let draft = BookmarkDraft::new(p.name, p.url, p.category);
            let outcome = service
                .edit_bookmark(owner, p.id, &draft)
                .await
                .map_err(internal)?;
            Ok(outcome_to_wire(&outcome))
        }
        "bookmark.delete" => {
            let p: DeleteParams = decode(params)?;
            service.delete_bookmark(owner, p.id).await.map_err(internal)?;
            Ok(outcome_to_wire(&Outcome::Accepted))
        }
        "bookmark.reorder" => {
            let p: ReorderParams = decode(params)?;
            service.reorder(owner, p.old, p.new).await.map_err(internal)?;
            Ok(outcome_to_wire(&Outcome::Accepted))
        }

        // ─── Categories ───
        "category.list" => {
            let counts = service.list_categories(owner).await.map_err(internal)?;
            Ok(json!(counts))
        }
        "category.edit" => {
            let p: CategoryEditParams = decode(params)?;
            let outcome = service
                .rename_category(owner, &p.old, &p.new)
                .await
                .map_err(internal)?;
            Ok(outcome_to_wire(&outcome))
        }
        "category.delete" => {
            let p: CategoryDeleteParams = decode(params)?;
            service
                .delete_category(owner, &p.category)
                .await
                .map_err(internal)?;
            Ok(outcome_to_wire(&Outcome::Accepted))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
