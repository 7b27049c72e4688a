//! Role membership operations

use super::OperationKind;
use crate::catalog::membership::Membership;

#[derive(Debug, Clone)]
pub enum MembershipOperation {
    Grant { membership: Membership },
    Revoke { membership: Membership },
}

impl MembershipOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Grant { .. } => OperationKind::Create,
            Self::Revoke { .. } => OperationKind::Drop,
        }
    }
}
