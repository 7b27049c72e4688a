//! Rewrite rule operations

use super::OperationKind;
use crate::catalog::rule::Rule;

#[derive(Debug, Clone)]
pub enum RuleOperation {
    Create {
        rule: Box<Rule>,
    },
    Drop {
        schema: String,
        table: String,
        name: String,
    },
    /// `pg_get_ruledef` changed: Postgres has no ALTER RULE for the action body, so it's
    /// dropped and recreated.
    Replace {
        old_rule: Box<Rule>,
        new_rule: Box<Rule>,
    },
}

impl RuleOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::Replace { .. } => OperationKind::Alter,
        }
    }
}
