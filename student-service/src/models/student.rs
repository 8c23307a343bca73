use mongodb::bson::Bson;
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};

/// A student record, keyed (without enforcement) by `emailId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub firstname: String,
    pub lastname: String,
    pub age: i64,
    pub department: String,
    #[serde(rename = "emailId")]
    pub email_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertOutcome {
    #[serde(rename = "InsertedID")]
    pub inserted_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(rename = "UpsertedID")]
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

fn bson_id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<InsertOneResult> for InsertOutcome {
    fn from(result: InsertOneResult) -> Self {
        Self {
            inserted_id: bson_id_string(&result.inserted_id),
        }
    }
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(result: UpdateResult) -> Self {
        let upserted_id = result.upserted_id.as_ref().map(bson_id_string);
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

impl From<DeleteResult> for DeleteOutcome {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}
