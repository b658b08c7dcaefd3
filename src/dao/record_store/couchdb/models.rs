use serde::Deserialize;
use serde_json::Value;

use crate::dao::record_store::{Document, ID_FIELD, Table};

pub const COUCH_ID: &str = "_id";
pub const COUCH_REV: &str = "_rev";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Prefix shared by every document of a table.
pub fn table_prefix(table: Table) -> String {
    format!("{}::", table.name())
}

/// CouchDB keeps a single database, so documents are namespaced by table.
pub fn doc_id(table: Table, id: &str) -> String {
    format!("{}{}", table_prefix(table), id)
}

/// Body sent to CouchDB: the record plus its document id and revision.
pub fn to_couch_body(table: Table, id: &str, record: &Document, rev: Option<&str>) -> Document {
    let mut body = record.clone();
    body.insert(COUCH_ID.to_owned(), Value::String(doc_id(table, id)));
    if let Some(rev) = rev {
        body.insert(COUCH_REV.to_owned(), Value::String(rev.to_owned()));
    }
    body
}

/// Strip CouchDB bookkeeping fields, returning the record and its revision.
pub fn from_couch_body(mut body: Document) -> (Document, Option<String>) {
    let rev = match body.remove(COUCH_REV) {
        Some(Value::String(rev)) => Some(rev),
        _ => None,
    };
    let couch_id = body.remove(COUCH_ID);
    if !body.contains_key(ID_FIELD) {
        if let Some(Value::String(couch_id)) = couch_id {
            if let Some((_, id)) = couch_id.split_once("::") {
                body.insert(ID_FIELD.to_owned(), Value::String(id.to_owned()));
            }
        }
    }
    (body, rev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bookkeeping_fields_are_stripped() {
        let record = match json!({"id": "p1", "name": "Ana"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let body = to_couch_body(Table::Players, "p1", &record, Some("3-abc"));
        assert_eq!(body.get("_id"), Some(&json!("players::p1")));

        let (restored, rev) = from_couch_body(body);
        assert_eq!(restored, record);
        assert_eq!(rev.as_deref(), Some("3-abc"));
    }
}
