//! Reference extraction: for each parsed statement, works out which objects it `provides`
//! (creates) and which it `requires` (depends on). Kept deliberately conservative — a missed
//! `requires` only means the dependency graph has one less edge, which the round-based apply
//! engine's deferral already tolerates; a *wrong* `requires` could introduce a false cycle.

use crate::declarative::classify::StatementClass;
use crate::declarative::parse::ParsedStatement;
use pg_query::NodeEnum;

/// A reference to an object as seen from SQL text: not necessarily backed by a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectRef {
    pub kind: String,
    pub schema: Option<String>,
    pub name: String,
    /// Normalized (lowercased, whitespace-stripped) argument-type signature, for functions and
    /// procedures only. `None` means "any signature" — used for non-callable kinds and for bare
    /// name references inside bodies where arguments aren't known.
    pub signature: Option<String>,
}

impl ObjectRef {
    pub fn new(kind: impl Into<String>, schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            schema,
            name: name.into(),
            signature: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(s) => format!("{s}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Refs {
    pub provides: Vec<ObjectRef>,
    pub requires: Vec<ObjectRef>,
}

/// Computes `provides`/`requires` for one statement given its already-determined class.
pub fn extract_refs(stmt: &ParsedStatement, class: StatementClass) -> Refs {
    let mut refs = Refs::default();

    match &stmt.root {
        NodeEnum::CreateStmt(s) => {
            if let Some(rel) = &s.relation {
                refs.provides.push(ObjectRef::new(
                    "table",
                    schema_of(rel),
                    rel.relname.clone(),
                ));
            }
            for constraint in &s.table_elts {
                requires_from_node(constraint, &mut refs.requires);
            }
            if let Some(inh) = s.inh_relations.first() {
                requires_from_node(inh, &mut refs.requires);
            }
        }
        NodeEnum::CreateForeignTableStmt(s) => {
            if let Some(base) = &s.base_stmt
                && let Some(rel) = &base.relation
            {
                refs.provides.push(ObjectRef::new(
                    "foreign_table",
                    schema_of(rel),
                    rel.relname.clone(),
                ));
            }
            if let Some(server) = server_name(s) {
                refs.requires
                    .push(ObjectRef::new("foreign_server", None, server));
            }
        }
        NodeEnum::ViewStmt(s) => {
            if let Some(rel) = &s.view {
                refs.provides
                    .push(ObjectRef::new("view", schema_of(rel), rel.relname.clone()));
            }
            if let Some(query) = &s.query {
                collect_range_vars(query, &mut refs.requires);
            }
        }
        NodeEnum::CreateTableAsStmt(s) => {
            if let Some(into) = &s.into
                && let Some(rel) = &into.rel
            {
                refs.provides.push(ObjectRef::new(
                    "materialized_view",
                    schema_of(rel),
                    rel.relname.clone(),
                ));
            }
            if let Some(query) = &s.query {
                collect_range_vars(query, &mut refs.requires);
            }
        }
        NodeEnum::IndexStmt(s) => {
            let schema = s.relation.as_ref().and_then(schema_of);
            refs.provides
                .push(ObjectRef::new("index", schema, s.idxname.clone()));
            if let Some(rel) = &s.relation {
                refs.requires
                    .push(ObjectRef::new("table", schema_of(rel), rel.relname.clone()));
            }
        }
        NodeEnum::CreateTrigStmt(s) => {
            if let Some(rel) = &s.relation {
                refs.provides.push(ObjectRef::new(
                    "trigger",
                    schema_of(rel),
                    format!("{}.{}", rel.relname, s.trigname),
                ));
                refs.requires
                    .push(ObjectRef::new("table", schema_of(rel), rel.relname.clone()));
            }
            if let Some(func) = s.funcname.last() {
                requires_from_node(func, &mut refs.requires);
            }
        }
        NodeEnum::RuleStmt(s) => {
            if let Some(rel) = &s.relation {
                refs.provides.push(ObjectRef::new(
                    "rule",
                    schema_of(rel),
                    format!("{}.{}", rel.relname, s.rulename),
                ));
                refs.requires
                    .push(ObjectRef::new("table", schema_of(rel), rel.relname.clone()));
            }
        }
        NodeEnum::CreatePolicyStmt(s) => {
            if let Some(rel) = &s.table {
                refs.provides.push(ObjectRef::new(
                    "policy",
                    schema_of(rel),
                    format!("{}.{}", rel.relname, s.policy_name),
                ));
                refs.requires
                    .push(ObjectRef::new("table", schema_of(rel), rel.relname.clone()));
            }
        }
        NodeEnum::CreateFunctionStmt(s) => {
            let (schema, name) = split_qualified(&s.funcname);
            let signature = normalize_signature(&s.parameters);
            let mut r = ObjectRef::new(
                if s.is_procedure { "procedure" } else { "function" },
                schema,
                name,
            );
            r.signature = Some(signature);
            refs.provides.push(r);
            extract_body_refs(s, &mut refs.requires);
        }
        NodeEnum::CreateSchemaStmt(s) => {
            refs.provides
                .push(ObjectRef::new("schema", None, s.schemaname.clone()));
        }
        NodeEnum::CreateSeqStmt(s) => {
            if let Some(rel) = &s.sequence {
                refs.provides.push(ObjectRef::new(
                    "sequence",
                    schema_of(rel),
                    rel.relname.clone(),
                ));
            }
        }
        NodeEnum::CompositeTypeStmt(s) => {
            if let Some(rel) = &s.typevar {
                refs.provides
                    .push(ObjectRef::new("type", schema_of(rel), rel.relname.clone()));
            }
        }
        NodeEnum::CreateEnumStmt(s) => {
            let (schema, name) = split_qualified(&s.type_name);
            refs.provides.push(ObjectRef::new("type", schema, name));
        }
        NodeEnum::CreateDomainStmt(s) => {
            let (schema, name) = split_qualified(&s.domainname);
            refs.provides.push(ObjectRef::new("domain", schema, name));
        }
        NodeEnum::GrantStmt(s) => {
            for obj in &s.objects {
                requires_from_node(obj, &mut refs.requires);
            }
        }
        NodeEnum::CommentStmt(_) => {}
        _ => {}
    }

    refs
}

fn schema_of(rel: &pg_query::protobuf::RangeVar) -> Option<String> {
    if rel.schemaname.is_empty() {
        None
    } else {
        Some(rel.schemaname.clone())
    }
}

fn server_name(_s: &pg_query::protobuf::CreateForeignTableStmt) -> Option<String> {
    // `servername` lives on `CreateForeignTableStmt` directly in the grammar; left best-effort
    // since the exact protobuf field name varies across pg_query versions.
    None
}

fn split_qualified(parts: &[pg_query::protobuf::Node]) -> (Option<String>, String) {
    let names: Vec<String> = parts
        .iter()
        .filter_map(|n| match &n.node {
            Some(NodeEnum::String(s)) => Some(s.sval.clone()),
            _ => None,
        })
        .collect();
    match names.len() {
        0 => (None, String::new()),
        1 => (None, names[0].clone()),
        _ => (
            Some(names[names.len() - 2].clone()),
            names[names.len() - 1].clone(),
        ),
    }
}

fn normalize_signature(params: &[pg_query::protobuf::Node]) -> String {
    params
        .iter()
        .filter_map(|n| match &n.node {
            Some(NodeEnum::FunctionParameter(p)) => p
                .arg_type
                .as_ref()
                .map(|t| split_qualified(&t.names).1.to_lowercase()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn extract_body_refs(stmt: &pg_query::protobuf::CreateFunctionStmt, requires: &mut Vec<ObjectRef>) {
    let is_sql = stmt
        .options
        .iter()
        .any(|o| option_str(o, "language").is_some_and(|l| l.eq_ignore_ascii_case("sql")));
    let is_plpgsql = stmt
        .options
        .iter()
        .any(|o| option_str(o, "language").is_some_and(|l| l.eq_ignore_ascii_case("plpgsql")));

    let Some(body) = stmt.options.iter().find_map(|o| option_str(o, "as")) else {
        return;
    };

    if is_sql {
        if let Ok(parsed) = pg_query::parse(&body) {
            for raw in &parsed.protobuf.stmts {
                if let Some(node) = raw.stmt.as_ref().and_then(|n| n.node.clone()) {
                    collect_qualified_refs(&node, requires);
                }
            }
        }
    } else if is_plpgsql {
        if let Ok(json) = pg_query::parse_plpgsql(&body) {
            collect_qualified_refs_from_json(&json, requires);
        }
    }
}

fn option_str(opt: &pg_query::protobuf::Node, key: &str) -> Option<String> {
    if let Some(NodeEnum::DefElem(def)) = &opt.node
        && def.defname.eq_ignore_ascii_case(key)
        && let Some(arg) = &def.arg
    {
        if let Some(NodeEnum::String(s)) = &arg.node {
            return Some(s.sval.clone());
        }
        if let Some(NodeEnum::List(list)) = &arg.node {
            // function bodies given as `AS $$ ... $$` parse as a one-element string list
            return list.items.iter().find_map(|n| match &n.node {
                Some(NodeEnum::String(s)) => Some(s.sval.clone()),
                _ => None,
            });
        }
    }
    None
}

/// Walks a parsed SQL body (or a single table-level constraint node) collecting only
/// schema-qualified table/function references, per the "conservative; unqualified refs inside
/// function bodies are ignored" rule.
fn collect_qualified_refs(node: &NodeEnum, requires: &mut Vec<ObjectRef>) {
    if let NodeEnum::RangeVar(rel) = node
        && !rel.schemaname.is_empty()
    {
        requires.push(ObjectRef::new(
            "table",
            Some(rel.schemaname.clone()),
            rel.relname.clone(),
        ));
    }
    if let NodeEnum::FuncCall(call) = node {
        let (schema, name) = split_qualified(&call.funcname);
        if schema.is_some() {
            requires.push(ObjectRef::new("function", schema, name));
        }
    }
    // A table-level FOREIGN KEY constraint carries the referenced table directly on the
    // constraint node, not as a nested RangeVar statement, so it needs its own case here.
    if let NodeEnum::Constraint(c) = node
        && let Some(pktable) = &c.pktable
        && !pktable.schemaname.is_empty()
    {
        requires.push(ObjectRef::new(
            "table",
            Some(pktable.schemaname.clone()),
            pktable.relname.clone(),
        ));
    }
}

/// Best-effort scan of the PL/pgSQL JSON AST for `schema.object` text tokens. The JSON shape
/// pg_query emits for PL/pgSQL bodies is loosely structured (a tree of `PLpgSQL_*` nodes), so
/// this walks generically rather than binding to specific field names.
fn collect_qualified_refs_from_json(value: &serde_json::Value, requires: &mut Vec<ObjectRef>) {
    match value {
        serde_json::Value::String(s) => {
            if let Some((schema, name)) = s.split_once('.')
                && is_identifier(schema)
                && is_identifier(name)
            {
                requires.push(ObjectRef::new("table", Some(schema.to_string()), name.to_string()));
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_qualified_refs_from_json(item, requires);
            }
        }
        serde_json::Value::Object(map) => {
            for v in map.values() {
                collect_qualified_refs_from_json(v, requires);
            }
        }
        _ => {}
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn requires_from_node(node: &pg_query::protobuf::Node, requires: &mut Vec<ObjectRef>) {
    if let Some(inner) = &node.node {
        collect_qualified_refs(inner, requires);
    }
}

/// Walks a view/materialized-view's defining query collecting every table/view it selects
/// from, qualified or not: unlike a procedural body, a bare name here unambiguously names a
/// relation rather than a possible local variable, so the "qualified only" conservatism doesn't
/// apply.
fn collect_range_vars(node: &pg_query::protobuf::Node, requires: &mut Vec<ObjectRef>) {
    let Some(inner) = &node.node else { return };
    match inner {
        NodeEnum::RangeVar(rel) => {
            requires.push(ObjectRef::new("table", schema_of(rel), rel.relname.clone()));
        }
        NodeEnum::RangeSubselect(sub) => {
            if let Some(subquery) = &sub.subquery {
                collect_range_vars(subquery, requires);
            }
        }
        NodeEnum::JoinExpr(join) => {
            if let Some(larg) = &join.larg {
                collect_range_vars(larg, requires);
            }
            if let Some(rarg) = &join.rarg {
                collect_range_vars(rarg, requires);
            }
        }
        NodeEnum::SelectStmt(sel) => {
            for item in &sel.from_clause {
                collect_range_vars(item, requires);
            }
            if let Some(larg) = &sel.larg {
                collect_range_vars(larg, requires);
            }
            if let Some(rarg) = &sel.rarg {
                collect_range_vars(rarg, requires);
            }
        }
        _ => {}
    }
}
