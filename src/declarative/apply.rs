//! Round-based executor: runs an ordered statement list against a single connection, deferring
//! statements whose failure looks like a missing dependency and retrying them in later rounds.
//! No outer transaction — each statement autocommits, matching the teacher's existing
//! `db::sql_executor` posture of running SQL files statement-by-statement rather than wrapping a
//! whole file in a transaction.

use crate::db::error_context::position_to_line;
use crate::declarative::parse::ParsedStatement;
use sqlx::postgres::{PgConnection, PgErrorPosition};
use tokio_util::sync::CancellationToken;

const DEPENDENCY_SQLSTATES: &[&str] = &["42P01", "42703", "42704", "42883", "3F000"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    Success,
    Error,
    Stuck,
}

#[derive(Debug, Clone)]
pub struct StatementError {
    pub statement_id: String,
    pub sqlstate: Option<String>,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RoundSummary {
    pub applied: usize,
    pub deferred: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub status: ApplyStatus,
    pub rounds: Vec<RoundSummary>,
    pub errors: Vec<StatementError>,
}

pub struct ApplyOptions {
    pub max_rounds: usize,
    pub validate_functions: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            validate_functions: true,
        }
    }
}

/// Runs `statements` (already topologically ordered) against `conn`, honoring `cancel` between
/// statements. Hard failures are recorded and the rest of the round's *remaining* statements are
/// skipped for this round (but retried next round, since an earlier hard failure in the same
/// round could itself have been a dependency the later statement needed).
pub async fn run(
    conn: &mut PgConnection,
    statements: &[ParsedStatement],
    options: &ApplyOptions,
    cancel: &CancellationToken,
) -> ApplyReport {
    if let Err(e) = sqlx::raw_sql("SET check_function_bodies = off").execute(&mut *conn).await {
        return ApplyReport {
            status: ApplyStatus::Error,
            rounds: Vec::new(),
            errors: vec![StatementError {
                statement_id: "<connection setup>".to_string(),
                sqlstate: None,
                message: e.to_string(),
                line: None,
                column: None,
            }],
        };
    }

    let mut pending: Vec<usize> = (0..statements.len()).collect();
    let mut applied: Vec<usize> = Vec::new();
    let mut rounds = Vec::new();
    let mut errors: Vec<StatementError> = Vec::new();

    for _round in 0..options.max_rounds {
        if cancel.is_cancelled() {
            return ApplyReport {
                status: ApplyStatus::Error,
                rounds,
                errors,
            };
        }
        if pending.is_empty() {
            break;
        }

        let mut summary = RoundSummary::default();
        let mut still_pending = Vec::new();
        let mut round_errors = Vec::new();
        let mut hard_failure = false;
        let mut round_cancelled = false;

        for &i in &pending {
            if hard_failure {
                still_pending.push(i);
                continue;
            }
            if cancel.is_cancelled() {
                round_cancelled = true;
                still_pending.push(i);
                continue;
            }

            let stmt = &statements[i];
            match sqlx::raw_sql(&stmt.sql).execute(&mut *conn).await {
                Ok(_) => {
                    summary.applied += 1;
                    applied.push(i);
                }
                Err(e) => {
                    let (sqlstate, line, column) = extract_error_position(&e, &stmt.sql);
                    if sqlstate
                        .as_deref()
                        .is_some_and(|c| DEPENDENCY_SQLSTATES.contains(&c))
                    {
                        summary.deferred += 1;
                        still_pending.push(i);
                    } else {
                        summary.failed += 1;
                        hard_failure = true;
                        round_errors.push(StatementError {
                            statement_id: stmt.id.to_string(),
                            sqlstate,
                            message: e.to_string(),
                            line,
                            column,
                        });
                        still_pending.push(i);
                    }
                }
            }
        }

        errors.extend(round_errors);
        let progressed = summary.applied > 0;
        rounds.push(summary);
        pending = still_pending;

        if round_cancelled {
            return ApplyReport {
                status: ApplyStatus::Error,
                rounds,
                errors,
            };
        }
        if !progressed && !pending.is_empty() {
            return ApplyReport {
                status: ApplyStatus::Stuck,
                rounds,
                errors,
            };
        }
    }

    if !pending.is_empty() {
        return ApplyReport {
            status: ApplyStatus::Stuck,
            rounds,
            errors,
        };
    }

    if options.validate_functions {
        validate_functions(conn, statements, &applied, &mut errors).await;
    }

    let status = if !errors.is_empty() {
        ApplyStatus::Error
    } else {
        ApplyStatus::Success
    };

    ApplyReport {
        status,
        rounds,
        errors,
    }
}

async fn validate_functions(
    conn: &mut PgConnection,
    statements: &[ParsedStatement],
    applied: &[usize],
    errors: &mut Vec<StatementError>,
) {
    if sqlx::raw_sql("SET check_function_bodies = on")
        .execute(&mut *conn)
        .await
        .is_err()
    {
        return;
    }

    for &i in applied {
        let stmt = &statements[i];
        if !matches!(stmt.root, pg_query::NodeEnum::CreateFunctionStmt(_)) {
            continue;
        }
        if let Err(e) = sqlx::raw_sql(&stmt.sql).execute(&mut *conn).await {
            let (sqlstate, line, column) = extract_error_position(&e, &stmt.sql);
            errors.push(StatementError {
                statement_id: stmt.id.to_string(),
                sqlstate,
                message: format!("validation failed on re-execution: {e}"),
                line,
                column,
            });
        }
    }
}

fn extract_error_position(
    error: &sqlx::Error,
    sql: &str,
) -> (Option<String>, Option<usize>, Option<usize>) {
    let Some(db_error) = error.as_database_error() else {
        return (None, None, None);
    };
    let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() else {
        return (Some(db_error.code().map(|c| c.to_string()).unwrap_or_default()), None, None);
    };

    let position = pg_error.position().map(|pos| match pos {
        PgErrorPosition::Original(p) => p,
        PgErrorPosition::Internal { position, .. } => position,
    });
    let line = position.map(|p| position_to_line(sql, p));
    let column = position.map(|p| position_to_column(sql, p));

    (Some(pg_error.code().to_string()), line, column)
}

/// 1-based column within the error's line, companion to `position_to_line`.
fn position_to_column(content: &str, position: usize) -> usize {
    let end = position.saturating_sub(1).min(content.len());
    let prefix = &content[..end];
    match prefix.rfind('\n') {
        Some(idx) => prefix[idx + 1..].chars().count() + 1,
        None => prefix.chars().count() + 1,
    }
}
