use crate::error::DbError;
use crate::ops::Placeholder;
use tracing::Level;

/// Configuration for an [`Executor`](crate::Executor).
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Placeholder style override. `None` uses the handle's native style.
    pub placeholder: Option<Placeholder>,
    /// How multi-row INSERT derives and checks its column list.
    pub insert_columns: InsertColumns,
    /// What to do with UPDATE statements that have no conditions.
    pub update_without_where: DangerousDmlPolicy,
    /// What to do with DELETE statements that have no conditions.
    pub delete_without_where: DangerousDmlPolicy,
    /// Whether to emit a tracing event for each statement.
    pub logging_enabled: bool,
    /// Level of the per-statement tracing event.
    pub log_level: Level,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            insert_columns: InsertColumns::Strict,
            update_without_where: DangerousDmlPolicy::Warn,
            delete_without_where: DangerousDmlPolicy::Warn,
            logging_enabled: true,
            log_level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl ExecConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a placeholder style regardless of the handle.
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the INSERT column policy.
    pub fn insert_columns(mut self, policy: InsertColumns) -> Self {
        self.insert_columns = policy;
        self
    }

    /// Configure how UPDATE without WHERE is handled.
    pub fn update_without_where(mut self, policy: DangerousDmlPolicy) -> Self {
        self.update_without_where = policy;
        self
    }

    /// Configure how DELETE without WHERE is handled.
    pub fn delete_without_where(mut self, policy: DangerousDmlPolicy) -> Self {
        self.delete_without_where = policy;
        self
    }

    /// Reject UPDATE and DELETE statements without conditions.
    pub fn strict(mut self) -> Self {
        self.update_without_where = DangerousDmlPolicy::Error;
        self.delete_without_where = DangerousDmlPolicy::Error;
        self
    }

    /// Override the tracing event level.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Disable per-statement logging.
    pub fn no_logging(mut self) -> Self {
        self.logging_enabled = false;
        self
    }
}

/// Column policy for multi-row INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertColumns {
    /// Every row must carry exactly the first row's column set (any order).
    #[default]
    Strict,
    /// Use the first row's columns; missing values bind NULL, extras are ignored.
    FirstRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerousDmlPolicy {
    Allow,
    Warn,
    Error,
}

pub(crate) fn handle_dangerous_dml(
    policy: DangerousDmlPolicy,
    rule: &str,
    sql: &str,
) -> Result<(), DbError> {
    match policy {
        DangerousDmlPolicy::Allow => Ok(()),
        DangerousDmlPolicy::Warn => {
            tracing::warn!(target: "rowsql.sql", rule, sql, "unfiltered statement");
            Ok(())
        }
        DangerousDmlPolicy::Error => Err(DbError::validation(format!(
            "SQL policy violation: {rule}: {sql}"
        ))),
    }
}
