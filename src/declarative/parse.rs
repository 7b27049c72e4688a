//! Splits discovered files into individual statements and parses each one, collecting a
//! `Diagnostic::ParseError` per failing statement rather than aborting the whole run.

use crate::diagnostics::Diagnostic;
use std::fmt;
use std::path::Path;

/// `<file_path>:<statement_index>`, 0-based, stable across a single run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatementId {
    pub file: String,
    pub index: usize,
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.index)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedStatement {
    pub id: StatementId,
    pub sql: String,
    pub root: pg_query::NodeEnum,
}

/// Reads and splits every file, parsing each resulting statement. Files that fail to read are
/// reported as a single `ParseError` for the whole file (index 0); statements within a readable
/// file that fail to split or parse are reported individually and skipped, while the rest of the
/// file and other files still proceed.
pub fn parse_files(files: &[std::path::PathBuf]) -> (Vec<ParsedStatement>, Vec<Diagnostic>) {
    let mut statements = Vec::new();
    let mut diagnostics = Vec::new();

    for path in files {
        let file_label = normalize_path(path);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                diagnostics.push(Diagnostic::ParseError {
                    message: format!("could not read {file_label}: {e}"),
                    statement_id: format!("{file_label}:0"),
                    details: None,
                });
                continue;
            }
        };

        let pieces = match pg_query::split_with_parser(&content) {
            Ok(p) => p,
            Err(e) => {
                diagnostics.push(Diagnostic::ParseError {
                    message: format!("failed to split {file_label} into statements: {e}"),
                    statement_id: format!("{file_label}:0"),
                    details: None,
                });
                continue;
            }
        };

        for (index, sql) in pieces.into_iter().enumerate() {
            let id = StatementId {
                file: file_label.clone(),
                index,
            };
            match pg_query::parse(&sql) {
                Ok(result) => {
                    let Some(stmt) = result.protobuf.stmts.first() else {
                        continue;
                    };
                    let Some(node) = stmt.stmt.as_ref().and_then(|n| n.node.clone()) else {
                        continue;
                    };
                    statements.push(ParsedStatement {
                        id,
                        sql: sql.trim().to_string(),
                        root: node,
                    });
                }
                Err(e) => {
                    diagnostics.push(Diagnostic::ParseError {
                        message: format!("failed to parse statement {id}: {e}"),
                        statement_id: id.to_string(),
                        details: Some(sql.trim().to_string()),
                    });
                }
            }
        }
    }

    (statements, diagnostics)
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
