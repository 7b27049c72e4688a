//! Collation operations

use super::{CommentOperation, CommentTarget, OperationKind};
use crate::catalog::collation::Collation;
use crate::catalog::id::DbObjectId;
use crate::render::quote_ident;

#[derive(Debug, Clone)]
pub struct CollationIdentifier {
    pub schema: String,
    pub name: String,
}

impl CommentTarget for CollationIdentifier {
    const OBJECT_TYPE: &'static str = "COLLATION";

    fn identifier(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }

    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Collation {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CollationOperation {
    Create {
        collation: Box<Collation>,
    },
    Drop {
        identifier: CollationIdentifier,
    },
    /// Locale/provider/deterministic changed: Postgres has no ALTER for these, so the only
    /// path is drop and recreate.
    Replace {
        old_collation: Box<Collation>,
        new_collation: Box<Collation>,
    },
    Comment(CommentOperation<CollationIdentifier>),
}

impl CollationOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::Replace { .. } | Self::Comment(_) => OperationKind::Alter,
        }
    }
}
