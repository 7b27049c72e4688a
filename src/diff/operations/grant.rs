//! Grant operations

use super::OperationKind;
use crate::catalog::grant::Grant;

#[derive(Debug, Clone)]
pub enum GrantOperation {
    Grant { grant: Grant },
    Revoke { grant: Grant },
    /// The grantee keeps `grant.privileges` but loses the ability to pass them on. Emitted
    /// instead of a full revoke+grant cycle when only `with_grant_option` changed from true to
    /// false and the privilege set itself is unchanged.
    RevokeGrantOption { grant: Grant },
}

impl GrantOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Grant { .. } => OperationKind::Create,
            Self::Revoke { .. } => OperationKind::Drop,
            Self::RevokeGrantOption { .. } => OperationKind::Alter,
        }
    }
}
