//! RPC method handler for the SmartBookmarks JSON-RPC protocol.
//!
//! Kept separate from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! dispatches a method call to the session controller and store held by
//! [`App`], and returns every failure as a message string for the UI layer.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::services::url_normalizer;
use crate::types::user::{OAuthProvider, User};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("serialization error: {}", e))
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with a user-presentable message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        "url.normalize" => {
            let url = str_param(params, "url")?;
            let canonical = url_normalizer::normalize(url).map_err(|e| e.to_string())?;
            Ok(json!({"url": canonical}))
        }

        // ─── Session ───
        "session.sign_in" => {
            let user: User = params
                .get("user")
                .cloned()
                .ok_or("missing user")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid user"))?;
            let token = params.get("access_token").and_then(|v| v.as_str()).map(str::to_string);

            let mut a = app.lock().map_err(|e| e.to_string())?;
            let provider = match params.get("provider") {
                Some(v) => serde_json::from_value::<OAuthProvider>(v.clone())
                    .map_err(|_| "unsupported provider".to_string())?,
                None => a.config.oauth_provider,
            };
            a.auth.establish(user);
            let previous_token = a.access_token();
            a.set_access_token(token);
            match a.session.sign_in(provider) {
                Ok(user) => to_json(&user),
                Err(e) => {
                    a.set_access_token(previous_token);
                    Err(e.to_string())
                }
            }
        }
        "session.sign_out" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let result = a.session.sign_out();
            a.set_access_token(None);
            result.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.current" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            match a.session.user() {
                Some(user) => to_json(user),
                None => Ok(Value::Null),
            }
        }

        // ─── Bookmarks ───
        "bookmark.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.session.store();
            let items = to_json(&*store.snapshot())?;
            Ok(json!({"items": items, "busy": store.is_busy()}))
        }
        "bookmark.refresh" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.session.store().refresh().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.add" => {
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.session.store().add(title, url).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.update" => {
            let id = str_param(params, "id")?;
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.session.store().update(id, title, url).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.session.store().delete(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Edit session ───
        "edit.begin" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let draft = a.session.begin_edit(id).map_err(|e| e.to_string())?;
            to_json(&draft)
        }
        "edit.set" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let editor = a.session.editor_mut();
            if let Some(title) = params.get("title").and_then(|v| v.as_str()) {
                editor.set_title(title).map_err(|e| e.to_string())?;
            }
            if let Some(url) = params.get("url").and_then(|v| v.as_str()) {
                editor.set_url(url).map_err(|e| e.to_string())?;
            }
            to_json(editor.state())
        }
        "edit.cancel" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.session.cancel_edit();
            Ok(json!({"ok": true}))
        }
        "edit.save" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.session.save_edit().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "edit.state" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let editor = a.session.editor();
            Ok(json!({"edit": to_json(editor.state())?, "error": editor.error()}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
