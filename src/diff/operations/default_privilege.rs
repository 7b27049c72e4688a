//! ALTER DEFAULT PRIVILEGES operations

use super::OperationKind;
use crate::catalog::default_privilege::DefaultAcl;

#[derive(Debug, Clone)]
pub enum DefaultPrivilegeOperation {
    Grant { acl: Box<DefaultAcl> },
    Revoke { acl: Box<DefaultAcl> },
}

impl DefaultPrivilegeOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Grant { .. } => OperationKind::Create,
            Self::Revoke { .. } => OperationKind::Drop,
        }
    }
}
