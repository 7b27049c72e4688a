use std::io::Write;
use std::time::Duration;

use pgmt::declarative::apply::{self, ApplyOptions, ApplyStatus};
use pgmt::declarative::parse::parse_files;
use tokio_util::sync::CancellationToken;

use crate::helpers::harness::with_test_db;

fn write_sql(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

/// A cancellation observed between statements in the same round must be reported as `Error`, not
/// `Stuck` (a cancelled run is not the same failure mode as a wedged migration that made no
/// progress).
#[tokio::test]
async fn cancellation_mid_round_reports_error_not_stuck() {
    with_test_db(async |db| {
        let dir = tempfile::tempdir().unwrap();
        write_sql(&dir, "a.sql", "SELECT pg_sleep(0.3);");
        write_sql(&dir, "b.sql", "SELECT 1;");

        let files = vec![dir.path().join("a.sql"), dir.path().join("b.sql")];
        let (statements, diagnostics) = parse_files(&files);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let mut conn = db.conn().await;
        let options = ApplyOptions {
            max_rounds: 10,
            validate_functions: false,
        };
        let report = apply::run(&mut *conn, &statements, &options, &cancel).await;

        assert_eq!(report.status, ApplyStatus::Error);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(report.rounds[0].applied, 1);
    })
    .await;
}
