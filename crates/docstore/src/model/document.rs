use bson::{doc, oid::ObjectId, Document};
use serde::Serialize;

pub fn query_single_id(id: &ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn query_many_id(ids: &[ObjectId]) -> Document {
    doc! { "_id": { "$in": ids.to_vec() } }
}

/// Matches documents whose `_id` is one of `ids`. A lone id is compared
/// directly rather than through `$in`.
pub fn query_ids(ids: &[ObjectId]) -> Document {
    match ids {
        [id] => query_single_id(id),
        _ => query_many_id(ids),
    }
}

/// Update that sets every top-level field of `fields`, leaving the rest of
/// the stored document alone.
pub fn set_fields<T: Serialize>(fields: &T) -> Result<Document, bson::ser::Error> {
    Ok(doc! { "$set": bson::to_document(fields)? })
}
