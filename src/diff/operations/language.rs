//! Procedural language operations

use super::{CommentOperation, CommentTarget, OperationKind};
use crate::catalog::id::DbObjectId;
use crate::catalog::language::Language;

#[derive(Debug, Clone)]
pub struct LanguageIdentifier {
    pub name: String,
}

impl CommentTarget for LanguageIdentifier {
    const OBJECT_TYPE: &'static str = "LANGUAGE";

    fn identifier(&self) -> String {
        crate::render::quote_ident(&self.name)
    }

    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::Language {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LanguageOperation {
    Create { language: Language },
    Drop { name: String },
    AlterOwner { name: String, owner: String },
    Comment(CommentOperation<LanguageIdentifier>),
}

impl LanguageOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::AlterOwner { .. } | Self::Comment(_) => OperationKind::Alter,
        }
    }
}
