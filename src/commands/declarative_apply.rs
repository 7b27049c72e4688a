//! `pgmt apply-sql <path>`: runs the declarative apply engine against a directory (or single
//! file) of hand-written SQL. Independent of `commands::apply`, which drives the differ's
//! generated plan against a dev database from schema files under version control.

use crate::db::connection::connect_with_retry;
use crate::declarative::apply::{ApplyOptions, ApplyStatus};
use crate::declarative::classify::classify_all;
use crate::declarative::discover::discover_sql_files;
use crate::declarative::graph::build_edges as build_declarative_edges;
use crate::declarative::parse::parse_files;
use crate::declarative::refs::extract_refs;
use crate::declarative::toposort::order_statements;
use anyhow::{Context, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct ApplySqlArgs {
    pub path: std::path::PathBuf,
    pub dev_url: String,
    pub max_rounds: usize,
    pub skip_validation: bool,
}

/// Exit-code-bearing outcome: 0 success, 1 error, 2 stuck, matching spec.md §6.3.
pub async fn cmd_apply_sql(args: &ApplySqlArgs) -> Result<i32> {
    let files = discover_sql_files(&args.path)
        .with_context(|| format!("discovering SQL files under {}", args.path.display()))?;
    info!("found {} SQL file(s) under {}", files.len(), args.path.display());

    let (statements, parse_diagnostics) = parse_files(&files);
    for d in &parse_diagnostics {
        warn!("{}: {}", d.code(), d.message());
    }

    let (classes, classify_diagnostics) = classify_all(&statements);
    for d in &classify_diagnostics {
        warn!("{}: {}", d.code(), d.message());
    }

    let refs: Vec<_> = statements
        .iter()
        .zip(&classes)
        .map(|(stmt, class)| extract_refs(stmt, *class))
        .collect();
    let statement_ids: Vec<String> = statements.iter().map(|s| s.id.to_string()).collect();

    let (edges, graph_diagnostics) = build_declarative_edges(&refs, &statement_ids);
    for d in &graph_diagnostics {
        warn!("{}: {}", d.code(), d.message());
    }

    let (order, cycle_diagnostics) =
        order_statements(statements.len(), &edges, &classes, &statement_ids);
    for d in &cycle_diagnostics {
        warn!("{}: {}", d.code(), d.message());
    }
    if !cycle_diagnostics.is_empty() {
        return Ok(2);
    }

    let ordered_statements: Vec<_> = order.into_iter().map(|i| statements[i].clone()).collect();

    let pool = connect_with_retry(&args.dev_url).await?;
    let mut conn = pool.acquire().await.context("acquiring a connection")?;

    let options = ApplyOptions {
        max_rounds: args.max_rounds,
        validate_functions: !args.skip_validation,
    };
    let cancel = CancellationToken::new();

    let report = crate::declarative::apply::run(&mut conn, &ordered_statements, &options, &cancel).await;

    for (i, round) in report.rounds.iter().enumerate() {
        info!(
            "round {}: {} applied, {} deferred, {} failed",
            i + 1,
            round.applied,
            round.deferred,
            round.failed
        );
    }
    for err in &report.errors {
        warn!(
            "{}: {} ({:?}) at {:?}:{:?}",
            err.statement_id, err.message, err.sqlstate, err.line, err.column
        );
    }

    Ok(exit_code(report.status))
}

fn exit_code(status: ApplyStatus) -> i32 {
    match status {
        ApplyStatus::Success => 0,
        ApplyStatus::Error => 1,
        ApplyStatus::Stuck => 2,
    }
}

pub fn resolve_args(path: &Path, database_args: &crate::config::DatabaseArgs, max_rounds: usize, skip_validation: bool) -> Result<ApplySqlArgs> {
    let dev_url = database_args
        .dev_url
        .clone()
        .or_else(|| std::env::var("PGMT_DEV_URL").ok())
        .context("no development database URL provided (--dev-url or PGMT_DEV_URL)")?;
    Ok(ApplySqlArgs {
        path: path.to_path_buf(),
        dev_url,
        max_rounds,
        skip_validation,
    })
}
