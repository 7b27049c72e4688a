//! Role operations

use super::OperationKind;
use crate::catalog::role::Role;

#[derive(Debug, Clone)]
pub enum RoleOperation {
    Create {
        role: Box<Role>,
    },
    Drop {
        name: String,
    },
    /// `ALTER ROLE ... WITH ...` replacing every attribute at once; diffed attribute-by-attribute
    /// at render time so an unchanged flag isn't repeated in the statement.
    Alter {
        name: String,
        old: Box<Role>,
        new: Box<Role>,
    },
}

impl RoleOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::Alter { .. } => OperationKind::Alter,
        }
    }
}
