//! Event trigger operations

use super::OperationKind;
use crate::catalog::event_trigger::EventTrigger;

#[derive(Debug, Clone)]
pub enum EventTriggerOperation {
    Create {
        trigger: Box<EventTrigger>,
    },
    Drop {
        name: String,
    },
    AlterOwner {
        name: String,
        owner: String,
    },
    /// evtenabled changed ('O'/'D'/'R'/'A'); rendered as `ALTER EVENT TRIGGER ... ENABLE [REPLICA|ALWAYS]` / `DISABLE`.
    AlterEnabled {
        name: String,
        enabled: String,
    },
}

impl EventTriggerOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::AlterOwner { .. } | Self::AlterEnabled { .. } => OperationKind::Alter,
        }
    }
}
