use super::metrics::record_store_operation;
use super::store::{StoreError, StudentStore};
use crate::models::{DeleteOutcome, InsertOutcome, Student, UpdateOutcome};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// In-process student store with the same matching semantics as the MongoDB
/// gateway: insertion order is storage order, and update/delete act on the
/// first record whose `emailId` matches.
pub struct InMemoryStudentStore {
    records: Mutex<Vec<(ObjectId, Student)>>,
    available: AtomicBool,
}

impl Default for InMemoryStudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// When unavailable, every operation fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .map(|records| records.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<(ObjectId, Student)>>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "In-memory student store is offline".to_string(),
            ));
        }
        self.records
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("In-memory store mutex poisoned: {}", e)))
    }

    fn observed<T>(
        &self,
        operation: &'static str,
        call: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let started = Instant::now();
        let result = call();
        record_store_operation(operation, started, &result);
        result
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn insert(&self, student: &Student) -> Result<InsertOutcome, StoreError> {
        self.observed("insert", || {
            let id = ObjectId::new();
            self.records()?.push((id, student.clone()));
            Ok(InsertOutcome {
                inserted_id: id.to_hex(),
            })
        })
    }

    async fn find_one(&self, email_id: &str) -> Result<Student, StoreError> {
        self.observed("find_one", || {
            self.records()?
                .iter()
                .find(|(_, s)| s.email_id == email_id)
                .map(|(_, s)| s.clone())
                .ok_or(StoreError::NotFound)
        })
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        self.observed("find_all", || {
            Ok(self.records()?.iter().map(|(_, s)| s.clone()).collect())
        })
    }

    async fn update_one(
        &self,
        email_id: &str,
        student: &Student,
    ) -> Result<UpdateOutcome, StoreError> {
        self.observed("update_one", || {
            let mut records = self.records()?;
            let (matched_count, modified_count) =
                match records.iter_mut().find(|(_, s)| s.email_id == email_id) {
                    Some((_, existing)) if *existing == *student => (1, 0),
                    Some((_, existing)) => {
                        *existing = student.clone();
                        (1, 1)
                    }
                    None => (0, 0),
                };
            Ok(UpdateOutcome {
                matched_count,
                modified_count,
                upserted_count: 0,
                upserted_id: None,
            })
        })
    }

    async fn delete_one(&self, email_id: &str) -> Result<DeleteOutcome, StoreError> {
        self.observed("delete_one", || {
            let mut records = self.records()?;
            let deleted_count = match records.iter().position(|(_, s)| s.email_id == email_id) {
                Some(index) => {
                    records.remove(index);
                    1
                }
                None => 0,
            };
            Ok(DeleteOutcome { deleted_count })
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.records().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(email: &str, age: i64) -> Student {
        Student {
            firstname: "Ann".to_string(),
            lastname: "Lee".to_string(),
            age,
            department: "CS".to_string(),
            email_id: email.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryStudentStore::new();
        let outcome = store.insert(&student("a@x.com", 20)).await.unwrap();

        assert!(ObjectId::parse_str(&outcome.inserted_id).is_ok());
        assert_eq!(
            store.find_one("a@x.com").await.unwrap(),
            student("a@x.com", 20)
        );
    }

    #[tokio::test]
    async fn duplicate_keys_are_allowed() {
        let store = InMemoryStudentStore::new();
        store.insert(&student("a@x.com", 20)).await.unwrap();
        store.insert(&student("a@x.com", 21)).await.unwrap();

        assert_eq!(store.len(), 2);
        // First match wins.
        assert_eq!(store.find_one("a@x.com").await.unwrap().age, 20);
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let store = InMemoryStudentStore::new();
        assert!(matches!(
            store.find_one("nobody@x.com").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = InMemoryStudentStore::new();
        assert!(store.find_all().await.unwrap().is_empty());

        store.insert(&student("a@x.com", 20)).await.unwrap();
        store.insert(&student("b@x.com", 21)).await.unwrap();

        let all = store.find_all().await.unwrap();
        let emails: Vec<_> = all.iter().map(|s| s.email_id.as_str()).collect();
        assert_eq!(emails, ["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn update_overwrites_every_field_including_key() {
        let store = InMemoryStudentStore::new();
        store.insert(&student("a@x.com", 20)).await.unwrap();

        let replacement = Student {
            firstname: "Bo".to_string(),
            lastname: "Kim".to_string(),
            age: 30,
            department: "EE".to_string(),
            email_id: "b@x.com".to_string(),
        };
        let outcome = store.update_one("a@x.com", &replacement).await.unwrap();

        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);
        assert!(matches!(
            store.find_one("a@x.com").await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.find_one("b@x.com").await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn identical_update_matches_without_modifying() {
        let store = InMemoryStudentStore::new();
        store.insert(&student("a@x.com", 20)).await.unwrap();

        let outcome = store
            .update_one("a@x.com", &student("a@x.com", 20))
            .await
            .unwrap();

        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 0);
    }

    #[tokio::test]
    async fn update_missing_creates_nothing() {
        let store = InMemoryStudentStore::new();
        let outcome = store
            .update_one("a@x.com", &student("a@x.com", 20))
            .await
            .unwrap();

        assert_eq!(outcome.matched_count, 0);
        assert_eq!(outcome.upserted_id, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_only_first_match() {
        let store = InMemoryStudentStore::new();
        store.insert(&student("a@x.com", 20)).await.unwrap();
        store.insert(&student("a@x.com", 21)).await.unwrap();

        assert_eq!(store.delete_one("a@x.com").await.unwrap().deleted_count, 1);
        assert_eq!(store.find_one("a@x.com").await.unwrap().age, 21);
        assert_eq!(store.delete_one("a@x.com").await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_one("a@x.com").await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = InMemoryStudentStore::new();
        store.set_available(false);

        assert!(matches!(
            store.insert(&student("a@x.com", 20)).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.find_all().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.health_check().await.is_err());

        store.set_available(true);
        assert!(store.health_check().await.is_ok());
    }
}
