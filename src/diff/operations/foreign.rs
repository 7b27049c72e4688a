//! Foreign-data infrastructure operations: foreign-data wrappers, foreign servers, user
//! mappings and foreign tables. Grouped together because the four kinds share one dependency
//! chain and their options-clause handling is identical.

use super::{CommentOperation, CommentTarget, OperationKind};
use crate::catalog::foreign::{ForeignDataWrapper, ForeignServer, ForeignTable, UserMapping};
use crate::catalog::id::DbObjectId;

#[derive(Debug, Clone)]
pub struct ForeignDataWrapperIdentifier {
    pub name: String,
}

impl CommentTarget for ForeignDataWrapperIdentifier {
    const OBJECT_TYPE: &'static str = "FOREIGN DATA WRAPPER";

    fn identifier(&self) -> String {
        crate::render::quote_ident(&self.name)
    }

    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::ForeignDataWrapper {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ForeignDataWrapperOperation {
    Create {
        fdw: Box<ForeignDataWrapper>,
    },
    Drop {
        name: String,
    },
    SetOptions {
        name: String,
        add: Vec<(String, String)>,
        set: Vec<(String, String)>,
        drop: Vec<String>,
    },
    Comment(CommentOperation<ForeignDataWrapperIdentifier>),
}

impl ForeignDataWrapperOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::SetOptions { .. } | Self::Comment(_) => OperationKind::Alter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForeignServerIdentifier {
    pub name: String,
}

impl CommentTarget for ForeignServerIdentifier {
    const OBJECT_TYPE: &'static str = "SERVER";

    fn identifier(&self) -> String {
        crate::render::quote_ident(&self.name)
    }

    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::ForeignServer {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ForeignServerOperation {
    Create {
        server: Box<ForeignServer>,
    },
    Drop {
        name: String,
    },
    SetOptions {
        name: String,
        add: Vec<(String, String)>,
        set: Vec<(String, String)>,
        drop: Vec<String>,
    },
    Comment(CommentOperation<ForeignServerIdentifier>),
}

impl ForeignServerOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::SetOptions { .. } | Self::Comment(_) => OperationKind::Alter,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UserMappingOperation {
    Create {
        mapping: Box<UserMapping>,
    },
    Drop {
        server: String,
        user: String,
    },
    SetOptions {
        server: String,
        user: String,
        add: Vec<(String, String)>,
        set: Vec<(String, String)>,
        drop: Vec<String>,
    },
}

impl UserMappingOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::SetOptions { .. } => OperationKind::Alter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForeignTableIdentifier {
    pub schema: String,
    pub name: String,
}

impl CommentTarget for ForeignTableIdentifier {
    const OBJECT_TYPE: &'static str = "FOREIGN TABLE";

    fn identifier(&self) -> String {
        format!(
            "{}.{}",
            crate::render::quote_ident(&self.schema),
            crate::render::quote_ident(&self.name)
        )
    }

    fn db_object_id(&self) -> DbObjectId {
        DbObjectId::ForeignTable {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ForeignTableOperation {
    Create {
        table: Box<ForeignTable>,
    },
    Drop {
        schema: String,
        name: String,
    },
    SetOptions {
        schema: String,
        name: String,
        add: Vec<(String, String)>,
        set: Vec<(String, String)>,
        drop: Vec<String>,
    },
    Comment(CommentOperation<ForeignTableIdentifier>),
}

impl ForeignTableOperation {
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Drop { .. } => OperationKind::Drop,
            Self::SetOptions { .. } | Self::Comment(_) => OperationKind::Alter,
        }
    }
}

/// Splits an options diff into ADD / SET / DROP lists for an `OPTIONS (...)` clause, shared by
/// all four foreign-data kinds since they all carry `Vec<(String, String)>` options.
pub fn diff_options(
    old: &[(String, String)],
    new: &[(String, String)],
) -> (
    Vec<(String, String)>,
    Vec<(String, String)>,
    Vec<String>,
) {
    let mut add = Vec::new();
    let mut set = Vec::new();
    for (key, value) in new {
        match old.iter().find(|(k, _)| k == key) {
            None => add.push((key.clone(), value.clone())),
            Some((_, old_value)) if old_value != value => set.push((key.clone(), value.clone())),
            Some(_) => {}
        }
    }
    let drop = old
        .iter()
        .filter(|(key, _)| !new.iter().any(|(k, _)| k == key))
        .map(|(key, _)| key.clone())
        .collect();
    (add, set, drop)
}
