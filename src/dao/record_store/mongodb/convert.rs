//! Lossless-enough mapping between JSON records and BSON documents.
//!
//! Records keep their `id` field and additionally use it as `_id`, which is
//! stripped again when reading.

use mongodb::bson::{Bson, Document as BsonDocument};
use serde_json::{Number, Value};

use crate::dao::record_store::{Document, ID_FIELD};

const MONGO_ID: &str = "_id";

pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(flag) => Bson::Boolean(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => Bson::Int64(int),
            None => Bson::Double(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => Bson::String(text.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(fields_to_bson(map)),
    }
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(flag) => Value::Bool(flag),
        Bson::Int32(int) => Value::from(int),
        Bson::Int64(int) => Value::from(int),
        Bson::Double(float) => Number::from_f64(float).map_or(Value::Null, Value::Number),
        Bson::String(text) => Value::String(text),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        other => Value::String(other.to_string()),
    }
}

/// Convert every field of a record or partial update.
pub fn fields_to_bson(fields: &Document) -> BsonDocument {
    let mut doc = BsonDocument::new();
    for (key, value) in fields {
        doc.insert(key.clone(), json_to_bson(value));
    }
    doc
}

/// Convert a full record, mirroring its identifier into `_id`.
pub fn record_to_bson(id: &str, record: &Document) -> BsonDocument {
    let mut doc = fields_to_bson(record);
    doc.insert(MONGO_ID, id);
    doc
}

pub fn bson_to_record(mut doc: BsonDocument) -> Document {
    let mongo_id = doc.remove(MONGO_ID);
    let mut record = doc
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect::<Document>();
    if !record.contains_key(ID_FIELD) {
        if let Some(Bson::String(id)) = mongo_id {
            record.insert(ID_FIELD.to_owned(), Value::String(id));
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_round_trips_through_bson() {
        let record = match json!({
            "id": "g1",
            "team1_score": 12,
            "ratio": 0.5,
            "finished": false,
            "notes": null,
            "tags": ["a", 1],
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let bson = record_to_bson("g1", &record);
        assert_eq!(bson.get_str("_id").unwrap(), "g1");
        assert_eq!(bson_to_record(bson), record);
    }
}
