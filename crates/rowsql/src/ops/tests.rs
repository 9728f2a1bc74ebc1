//! Executor tests against a recording in-memory handle.

use super::*;
use crate::config::{DangerousDmlPolicy, InsertColumns};
use crate::error::DbError;
use crate::row;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Query,
    Execute,
    PrepareExecute,
}

#[derive(Debug, Clone)]
struct Call {
    kind: CallKind,
    sql: String,
    params: Vec<Value>,
}

#[derive(Default)]
struct MockHandle {
    calls: Mutex<Vec<Call>>,
    rows: Vec<Row>,
    affected: u64,
    fail: Option<String>,
    placeholder: Placeholder,
}

impl MockHandle {
    fn returning_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn affecting(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, sql: &str, params: &[Value]) -> DbResult<()> {
        self.calls.lock().unwrap().push(Call {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        match &self.fail {
            Some(message) => Err(DbError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

impl Handle for MockHandle {
    fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        self.record(CallKind::Query, sql, params)?;
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        self.record(CallKind::Execute, sql, params)?;
        Ok(self.affected)
    }

    async fn prepare_execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        self.record(CallKind::PrepareExecute, sql, params)?;
        Ok(self.affected)
    }
}

// ==================== SELECT ====================

#[tokio::test]
async fn select_returns_rows_in_handle_order() {
    let handle = MockHandle::returning_rows(vec![
        row! { "id" => 2, "name" => "bob" },
        row! { "id" => 1, "name" => "alice" },
    ]);

    let out = select(&handle, "users", &["id", "name"], &Conditions::new()).await;
    assert_eq!(out.sql(), "SELECT id, name FROM users");
    let rows = out.into_result().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("name"), Some(&Value::Text("bob".to_string())));

    let calls = handle.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, CallKind::Query);
    assert!(calls[0].params.is_empty());
}

#[tokio::test]
async fn select_param_count_matches_conditions() {
    let handle = MockHandle::default();
    let filter = Conditions::new().eq("status", "active").eq("role", "admin");

    let out = select(&handle, "users", &["id"], &filter).await;
    assert_eq!(out.sql, "SELECT id FROM users WHERE status = ? AND role = ?");
    assert!(out.is_ok());

    let calls = handle.calls();
    assert_eq!(calls[0].params.len(), filter.len());
    assert_eq!(calls[0].params[1], Value::Text("admin".to_string()));
}

#[tokio::test]
async fn select_failure_still_reports_sql() {
    let handle = MockHandle::failing("relation \"users\" does not exist");

    let (sql, result) = select(&handle, "users", &["id"], &Conditions::new())
        .await
        .into_parts();
    assert_eq!(sql, "SELECT id FROM users");
    match result {
        Err(DbError::Other(message)) => assert!(message.contains("does not exist")),
        other => panic!("unexpected result: {other:?}"),
    }
}

// ==================== INSERT ====================

#[tokio::test]
async fn insert_nothing_is_a_silent_no_op() {
    let handle = MockHandle::failing("must not be called");

    let out = insert(&handle, "users", &[]).await;
    assert_eq!(out.sql, "");
    assert_eq!(out.into_result().unwrap(), 0);
    assert!(handle.calls().is_empty());
}

#[tokio::test]
async fn insert_executes_once_with_all_rows() {
    let handle = MockHandle::affecting(2);
    let rows = vec![
        row! { "id" => 1, "name" => "alice" },
        row! { "id" => 2, "name" => "bob" },
    ];

    let out = insert(&handle, "users", &rows).await;
    assert_eq!(out.sql, "INSERT INTO users (id, name) VALUES (?, ?), (?, ?)");
    assert_eq!(out.into_result().unwrap(), 2);

    let calls = handle.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, CallKind::Execute);
    assert_eq!(
        calls[0].params,
        vec![
            Value::Int(1),
            Value::Text("alice".to_string()),
            Value::Int(2),
            Value::Text("bob".to_string()),
        ]
    );
}

#[tokio::test]
async fn insert_mismatched_rows_never_reach_handle() {
    let handle = MockHandle::default();
    let rows = vec![row! { "id" => 1, "name" => "alice" }, row! { "id" => 2 }];

    let out = insert(&handle, "users", &rows).await;
    assert_eq!(out.sql, "");
    assert!(out.into_result().unwrap_err().is_validation());
    assert!(handle.calls().is_empty());
}

#[tokio::test]
async fn insert_first_row_policy_binds_null_for_missing() {
    let handle = MockHandle::affecting(2);
    let config = ExecConfig::new().insert_columns(InsertColumns::FirstRow);
    let rows = vec![row! { "id" => 1, "name" => "alice" }, row! { "id" => 2 }];

    let out = Executor::with_config(&handle, config)
        .insert("users", &rows)
        .await;
    assert!(out.is_ok());
    assert_eq!(handle.calls()[0].params[3], Value::Null);
}

// ==================== UPDATE ====================

#[tokio::test]
async fn update_prepares_and_binds_set_before_where() {
    let handle = MockHandle::affecting(1);
    let data = row! { "name" => "alicia" };
    let filter = Conditions::new().eq("id", 1);

    let out = update(&handle, "users", &data, &filter).await;
    assert_eq!(out.sql, "UPDATE users SET name = ? WHERE id = ?");
    assert_eq!(out.into_result().unwrap(), 1);

    let calls = handle.calls();
    assert_eq!(calls[0].kind, CallKind::PrepareExecute);
    assert_eq!(
        calls[0].params,
        vec![Value::Text("alicia".to_string()), Value::Int(1)]
    );
}

#[tokio::test]
async fn update_without_columns_is_rejected() {
    let handle = MockHandle::default();

    let out = update(&handle, "users", &Row::new(), &Conditions::new().eq("id", 1)).await;
    assert!(out.sql.starts_with("UPDATE users SET"));
    assert!(out.into_result().unwrap_err().is_validation());
    assert!(handle.calls().is_empty());
}

#[tokio::test]
async fn update_without_where_follows_policy() {
    let handle = MockHandle::affecting(5);
    let data = row! { "active" => false };

    let out = update(&handle, "users", &data, &Conditions::new()).await;
    assert_eq!(out.into_result().unwrap(), 5);

    let strict = Executor::with_config(&handle, ExecConfig::new().strict());
    let out = strict.update("users", &data, &Conditions::new()).await;
    assert_eq!(out.sql, "UPDATE users SET active = ?");
    assert!(out.into_result().unwrap_err().is_validation());
    assert_eq!(handle.calls().len(), 1);
}

#[tokio::test]
async fn update_failure_passes_error_through() {
    let handle = MockHandle::failing("duplicate key value");

    let out = update(
        &handle,
        "users",
        &row! { "email" => "a@example.com" },
        &Conditions::new().eq("id", 2),
    )
    .await;
    assert_eq!(out.sql, "UPDATE users SET email = ? WHERE id = ?");
    assert!(matches!(out.result, Err(DbError::Other(_))));
}

// ==================== DELETE ====================

#[tokio::test]
async fn delete_reports_whether_rows_were_removed() {
    let filter = Conditions::new().eq("id", 9);

    let none = MockHandle::affecting(0);
    let out = delete(&none, "users", &filter).await;
    assert_eq!(out.sql, "DELETE FROM users WHERE id = ?");
    assert!(!out.into_result().unwrap());

    let some = MockHandle::affecting(3);
    assert!(delete(&some, "users", &filter).await.into_result().unwrap());
}

#[tokio::test]
async fn delete_without_where_follows_policy() {
    let handle = MockHandle::affecting(4);

    let allow = ExecConfig::new().delete_without_where(DangerousDmlPolicy::Allow);
    let out = Executor::with_config(&handle, allow)
        .delete("sessions", &Conditions::new())
        .await;
    assert_eq!(out.sql, "DELETE FROM sessions");
    assert!(out.into_result().unwrap());

    let deny = ExecConfig::new().delete_without_where(DangerousDmlPolicy::Error);
    let out = Executor::with_config(&handle, deny)
        .delete("sessions", &Conditions::new())
        .await;
    assert!(out.into_result().unwrap_err().is_validation());
    assert_eq!(handle.calls().len(), 1);
}

#[tokio::test]
async fn delete_failure_is_not_false() {
    let handle = MockHandle::failing("connection reset");
    let out = delete(&handle, "users", &Conditions::new().eq("id", 1)).await;
    assert!(out.result.is_err());
}

// ==================== Placeholders ====================

#[tokio::test]
async fn handle_style_is_used_by_default() {
    let handle = MockHandle {
        placeholder: Placeholder::Dollar,
        ..MockHandle::default()
    };
    let out = delete(&handle, "users", &Conditions::new().eq("id", 1).eq("org", 2)).await;
    assert_eq!(out.sql, "DELETE FROM users WHERE id = $1 AND org = $2");
}

#[tokio::test]
async fn config_overrides_handle_style() {
    let handle = MockHandle::default();
    let exec = Executor::with_config(&handle, ExecConfig::new().placeholder(Placeholder::Dollar));
    assert_eq!(exec.placeholder(), Placeholder::Dollar);

    let out = exec
        .update("users", &row! { "a" => 1, "b" => 2 }, &Conditions::new().eq("id", 3))
        .await;
    assert_eq!(out.sql, "UPDATE users SET a = $1, b = $2 WHERE id = $3");
}

// ==================== Logging ====================

#[derive(Debug, Clone)]
struct Captured {
    target: String,
    level: Level,
    fields: BTreeMap<String, String>,
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Captured>>>);

impl Capture {
    fn events(&self) -> Vec<Captured> {
        self.0.lock().unwrap().clone()
    }
}

struct FieldRecorder<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        self.0.lock().unwrap().push(Captured {
            target: event.metadata().target().to_string(),
            level: *event.metadata().level(),
            fields,
        });
    }
}

fn capture() -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

#[tokio::test]
async fn statement_event_carries_op_table_and_sql() {
    let (capture, _guard) = capture();
    let handle = MockHandle::default();

    let filter = Conditions::new().eq("id", 1).eq("org", 2);
    let out = select(&handle, "users", &["id"], &filter).await;
    assert!(out.is_ok());

    let events = capture.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.target, "rowsql.sql");
    assert_eq!(event.level, Level::DEBUG);
    assert_eq!(event.fields["op"], "select");
    assert_eq!(event.fields["table"], "users");
    assert_eq!(event.fields["param_count"], "2");
    assert_eq!(event.fields["sql"], "SELECT id FROM users WHERE id = ? AND org = ?");
}

#[tokio::test]
async fn logged_sql_is_truncated_at_configured_length() {
    let (capture, _guard) = capture();
    let handle = MockHandle::default();
    let config = ExecConfig::new().max_sql_length(11).log_level(Level::INFO);

    let out = Executor::with_config(&handle, config)
        .delete("sessions", &Conditions::new().eq("id", 1))
        .await;
    assert_eq!(out.sql, "DELETE FROM sessions WHERE id = ?");

    let events = capture.events();
    assert_eq!(events[0].level, Level::INFO);
    assert_eq!(events[0].fields["sql"], "DELETE FROM...");
}

#[tokio::test]
async fn unfiltered_update_warns() {
    let (capture, _guard) = capture();
    let handle = MockHandle::affecting(3);

    let out = update(&handle, "users", &row! { "active" => false }, &Conditions::new()).await;
    assert_eq!(out.into_result().unwrap(), 3);

    let warnings: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.level == Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].target, "rowsql.sql");
    assert_eq!(warnings[0].fields["rule"], "UPDATE without WHERE");
    assert_eq!(warnings[0].fields["sql"], "UPDATE users SET active = ?");
}

#[tokio::test]
async fn failures_are_logged_with_the_error() {
    let (capture, _guard) = capture();
    let handle = MockHandle::failing("connection reset");

    let out = delete(&handle, "users", &Conditions::new().eq("id", 1)).await;
    assert!(out.result.is_err());

    let events = capture.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].fields["message"], "statement failed");
    assert!(events[1].fields["error"].contains("connection reset"));
}

#[tokio::test]
async fn no_logging_silences_statement_events() {
    let (capture, _guard) = capture();
    let handle = MockHandle::failing("boom");
    let exec = Executor::with_config(&handle, ExecConfig::new().no_logging());

    let out = exec.select("users", &["id"], &Conditions::new()).await;
    assert!(out.result.is_err());
    assert!(capture.events().is_empty());
}
