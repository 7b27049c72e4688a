//! Logical replication publication operations

use super::OperationKind;
use crate::catalog::publication::Publication;

#[derive(Debug, Clone)]
pub enum PublicationOperation {
    Create {
        publication: Box<Publication>,
    },
    Drop {
        name: String,
    },
    AlterOwner {
        name: String,
        owner: String,
    },
    AlterPublish {
        name: String,
        insert: bool,
        update: bool,
        delete: bool,
        truncate: bool,
    },
    SetTables {
        name: String,
        add: Vec<String>,
        drop: Vec<String>,
    },
}

impl PublicationOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::AlterOwner { .. } | Self::AlterPublish { .. } | Self::SetTables { .. } => {
                OperationKind::Alter
            }
        }
    }
}
