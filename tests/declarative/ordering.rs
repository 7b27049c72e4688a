// End-to-end coverage for the declarative apply engine's static pipeline: discover -> parse ->
// classify -> extract refs -> build edges -> order. No live database is involved (that stage is
// `declarative::apply::run`, which needs a real connection); these tests exercise everything up
// to the point an ordered statement list would be handed to the executor.

use pgmt::declarative::classify::classify_all;
use pgmt::declarative::discover::discover_sql_files;
use pgmt::declarative::graph::build_edges;
use pgmt::declarative::parse::parse_files;
use pgmt::declarative::refs::extract_refs;
use pgmt::declarative::toposort::order_statements;
use std::io::Write;

fn write_sql(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

/// Runs the full static pipeline over every `.sql` file under `dir`, returning the ordered
/// statement SQL texts and any cycle diagnostics.
fn plan(dir: &tempfile::TempDir) -> (Vec<String>, Vec<pgmt::diagnostics::Diagnostic>) {
    let files = discover_sql_files(dir.path()).unwrap();
    let (statements, parse_diagnostics) = parse_files(&files);
    assert!(parse_diagnostics.is_empty(), "{parse_diagnostics:?}");

    let (classes, classify_diagnostics) = classify_all(&statements);
    assert!(classify_diagnostics.is_empty(), "{classify_diagnostics:?}");

    let refs: Vec<_> = statements
        .iter()
        .zip(&classes)
        .map(|(stmt, class)| extract_refs(stmt, *class))
        .collect();
    let statement_ids: Vec<String> = statements.iter().map(|s| s.id.to_string()).collect();

    let (edges, graph_diagnostics) = build_edges(&refs, &statement_ids);
    assert!(graph_diagnostics.is_empty(), "{graph_diagnostics:?}");

    let (order, cycle_diagnostics) =
        order_statements(statements.len(), &edges, &classes, &statement_ids);

    let ordered_sql = order.into_iter().map(|i| statements[i].sql.clone()).collect();
    (ordered_sql, cycle_diagnostics)
}

/// Scenario: a unique index backing a foreign key must land between the referenced table and
/// the table that references it, with no unresolved-dependency diagnostic.
#[test]
fn foreign_key_orders_after_referenced_table_and_its_index() {
    let dir = tempfile::tempdir().unwrap();
    write_sql(
        &dir,
        "schema.sql",
        "create table app.users(id bigint primary key, gotrue_id uuid not null);\n\
         create unique index users_gotrue_id_key on app.users(gotrue_id);\n\
         create table app.oauth_apps(\n\
           id bigint primary key,\n\
           user_gotrue_id uuid,\n\
           constraint oauth_apps_user_fkey foreign key (user_gotrue_id) references app.users(gotrue_id)\n\
         );\n",
    );

    let (ordered_sql, diagnostics) = plan(&dir);
    assert!(diagnostics.is_empty());
    assert_eq!(ordered_sql.len(), 3);

    let pos = |needle: &str| ordered_sql.iter().position(|s| s.contains(needle)).unwrap();
    assert!(pos("create table app.users") < pos("oauth_apps"));
    assert!(pos("create table app.users") < pos("users_gotrue_id_key"));
}

/// Scenario: `fn_a()` and `fn_b()` calling each other forms a cycle in the static body-reference
/// graph, but it must not block planning the way a real structural cycle would - both CREATEs
/// are expected to run (and only body validation, which this pipeline stage doesn't perform,
/// could ever catch a genuinely broken reference).
#[test]
fn mutually_calling_functions_still_produce_an_order() {
    let dir = tempfile::tempdir().unwrap();
    write_sql(
        &dir,
        "functions.sql",
        "create function public.fn_a() returns int language plpgsql as $$ begin return public.fn_b(); end; $$;\n\
         create function public.fn_b() returns int language plpgsql as $$ begin return public.fn_a(); end; $$;\n",
    );

    let (ordered_sql, diagnostics) = plan(&dir);
    assert!(
        diagnostics.is_empty(),
        "mutual function references should not be reported as a fatal cycle: {diagnostics:?}"
    );
    assert_eq!(ordered_sql.len(), 2);
}

/// Scenario: two views that each select from the other have no deferred-validation escape hatch
/// and must surface as a genuine `CYCLE_DETECTED` diagnostic.
#[test]
fn mutually_selecting_views_are_a_fatal_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_sql(
        &dir,
        "views.sql",
        "create view v1 as select * from v2;\ncreate view v2 as select * from v1;\n",
    );

    let (ordered_sql, diagnostics) = plan(&dir);
    assert!(ordered_sql.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), "CYCLE_DETECTED");
}
