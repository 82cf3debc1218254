// ── Best-effort field resolver ──
//
// A report column may live at more than one place on the filer (the
// logging subsystem moved between firmware releases, for example). Each
// column lists its candidate sources in order; the first one that answers
// wins, and when every candidate reports the field as unavailable the
// column degrades to the sentinel instead of failing the row.
//
// Only "unavailable" answers (404, a device-side error, an unexpected
// payload shape) move on to the next candidate. Transport and session
// failures end resolution immediately and abort the row.

use std::fmt::Debug;
use std::future::Future;

use serde_json::Value;
use tracing::debug;

use ctools_api::{Error as ApiError, RemoteDevice};

use crate::model::SENTINEL;

/// Where a column's value can be read from on a filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `GET` a remote configuration or status path.
    Path(&'static str),
    /// Output of a debug-CLI command run on the filer.
    Cli(&'static str),
}

/// Outcome of resolving one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    Unavailable,
}

impl FieldValue {
    /// Render into a report cell, substituting the sentinel when unavailable.
    pub fn into_cell(self) -> String {
        match self {
            Self::Found(v) => v,
            Self::Unavailable => SENTINEL.to_owned(),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(Self::Unavailable, Self::Found)
    }
}

/// Try each candidate in order; the first success wins.
///
/// Returns `Ok(FieldValue::Unavailable)` when every candidate reported the
/// field as unavailable, and `Err` on the first failure that is not.
pub async fn first_available<C, F, Fut>(
    candidates: &[C],
    mut fetch: F,
) -> Result<FieldValue, ApiError>
where
    C: Copy + Debug,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<String, ApiError>>,
{
    for &candidate in candidates {
        match fetch(candidate).await {
            Ok(value) => return Ok(FieldValue::Found(value)),
            Err(e) if e.is_field_unavailable() => {
                debug!(?candidate, error = %e, "field candidate unavailable");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(FieldValue::Unavailable)
}

/// Resolve a column against a filer from its ordered sources.
pub async fn resolve(device: &RemoteDevice<'_>, sources: &[Source]) -> Result<FieldValue, ApiError> {
    first_available(sources, |source| fetch(device, source)).await
}

async fn fetch(device: &RemoteDevice<'_>, source: Source) -> Result<String, ApiError> {
    match source {
        Source::Path(path) => device.get_value(path).await.map(|v| render_value(&v)),
        Source::Cli(command) => device
            .run_cli_command(command)
            .await
            .map(|out| out.trim().to_owned()),
    }
}

/// Treat an "unavailable" failure of a whole payload as absence.
///
/// Used for payloads shared by several columns (sync status, performance
/// samples): each derived column then degrades to the sentinel.
pub fn optional<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_field_unavailable() => {
            debug!(error = %e, "payload unavailable");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Render a remote JSON value into a single report cell.
///
/// Strings verbatim, scalars via `Display`, `null` as empty, containers
/// as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::future::ready;

    use serde_json::json;

    use super::*;

    fn not_found() -> ApiError {
        ApiError::NotFound {
            path: "/missing".into(),
        }
    }

    #[tokio::test]
    async fn first_success_wins() {
        let tried = RefCell::new(Vec::new());
        let value = first_available(&["primary", "secondary"], |c| {
            tried.borrow_mut().push(c);
            ready(Ok(format!("{c}-value")))
        })
        .await
        .unwrap();

        assert_eq!(value, FieldValue::Found("primary-value".into()));
        assert_eq!(*tried.borrow(), vec!["primary"]);
    }

    #[tokio::test]
    async fn falls_back_to_secondary() {
        let value = first_available(&["primary", "secondary"], |c| {
            ready(if c == "primary" {
                Err(not_found())
            } else {
                Ok("50".to_owned())
            })
        })
        .await
        .unwrap();

        assert_eq!(value, FieldValue::Found("50".into()));
    }

    #[tokio::test]
    async fn exhausted_candidates_yield_sentinel() {
        let value = first_available(&["primary", "secondary"], |_| {
            ready(Err::<String, _>(ApiError::Api {
                status: 500,
                message: "no such attribute".into(),
            }))
        })
        .await
        .unwrap();

        assert_eq!(value, FieldValue::Unavailable);
        assert_eq!(value.into_cell(), SENTINEL);
    }

    #[tokio::test]
    async fn auth_failure_stops_resolution() {
        let tried = RefCell::new(0);
        let result = first_available(&["primary", "secondary"], |_| {
            *tried.borrow_mut() += 1;
            ready(Err::<String, _>(ApiError::Authentication {
                message: "expired".into(),
            }))
        })
        .await;

        assert!(matches!(result, Err(ApiError::Authentication { .. })));
        assert_eq!(*tried.borrow(), 1);
    }

    #[test]
    fn optional_keeps_hard_errors() {
        assert_eq!(optional(Ok::<_, ApiError>(3)).unwrap(), Some(3));
        assert_eq!(optional::<u8>(Err(not_found())).unwrap(), None);
        assert!(
            optional::<u8>(Err(ApiError::Forbidden {
                path: "/x".into()
            }))
            .is_err()
        );
    }

    #[test]
    fn render_value_flattens_json() {
        assert_eq!(render_value(&json!("7.5.182")), "7.5.182");
        assert_eq!(render_value(&json!(95)), "95");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&Value::Null), "");
        assert_eq!(
            render_value(&json!({ "server": ["pool.ntp.org"] })),
            r#"{"server":["pool.ntp.org"]}"#
        );
    }
}
