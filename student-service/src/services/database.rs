use super::metrics::record_store_operation;
use super::store::{StoreError, StudentStore};
use crate::config::{MongoConfig, StoreConfig};
use crate::models::{DeleteOutcome, InsertOutcome, Student, UpdateOutcome};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc, options::ClientOptions, options::IndexOptions, Client as MongoClient, Collection,
    Database, IndexModel,
};
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
    operation_timeout: Duration,
    connect_timeout: Duration,
}

impl MongoDb {
    pub async fn connect(mongo: &MongoConfig, store: &StoreConfig) -> Result<Self, StoreError> {
        let connect_timeout = store.connect_timeout();
        tracing::info!(database = %mongo.database, "Connecting to MongoDB");

        let mut options = tokio::time::timeout(connect_timeout, ClientOptions::parse(&mongo.uri))
            .await
            .map_err(|_| StoreError::Timeout {
                operation: "connect",
                after: connect_timeout,
            })??;
        // Server selection keeps the driver default, longer than any budget
        // enforced by `bounded`.
        options.connect_timeout = Some(connect_timeout);
        options.app_name = Some("student-service".to_string());

        let client = MongoClient::with_options(options)?;
        let db = client.database(&mongo.database);
        tracing::info!(
            database = %mongo.database,
            collection = %mongo.collection,
            "MongoDB client ready"
        );

        Ok(Self {
            client,
            db,
            collection: mongo.collection.clone(),
            operation_timeout: store.operation_timeout(),
            connect_timeout,
        })
    }

    /// Non-unique index on `emailId`. Duplicate keys stay allowed.
    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        tracing::info!("Creating MongoDB indexes for student-service");

        let email_index = IndexModel::builder()
            .keys(doc! { "emailId": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_id_lookup".to_string())
                    .build(),
            )
            .build();

        let students = self.students();
        self.bounded("create_index", self.connect_timeout, async move {
            students.create_index(email_index, None).await?;
            Ok::<_, StoreError>(())
        })
        .await?;
        tracing::info!("Created index on students.emailId");

        Ok(())
    }

    pub fn students(&self) -> Collection<Student> {
        self.db.collection(&self.collection)
    }

    /// Run one store call under its own deadline and record its metrics.
    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        budget: Duration,
        call: F,
    ) -> Result<T, StoreError>
    where
        T: Send,
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(budget, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                after: budget,
            }),
        };

        if let Err(e) = &result {
            if !matches!(e, StoreError::NotFound) {
                tracing::error!(operation, error = %e, "Student store operation failed");
            }
        }
        record_store_operation(operation, started, &result);
        result
    }
}

#[async_trait]
impl StudentStore for MongoDb {
    async fn insert(&self, student: &Student) -> Result<InsertOutcome, StoreError> {
        let students = self.students();
        self.bounded("insert", self.operation_timeout, async move {
            let result = students.insert_one(student, None).await?;
            Ok::<_, StoreError>(InsertOutcome::from(result))
        })
        .await
    }

    async fn find_one(&self, email_id: &str) -> Result<Student, StoreError> {
        let students = self.students();
        self.bounded("find_one", self.operation_timeout, async move {
            students
                .find_one(doc! { "emailId": email_id }, None)
                .await?
                .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let students = self.students();
        self.bounded("find_all", self.operation_timeout, async move {
            let cursor = students.find(doc! {}, None).await?;
            let all: Vec<Student> = cursor.try_collect().await?;
            Ok::<_, StoreError>(all)
        })
        .await
    }

    async fn update_one(
        &self,
        email_id: &str,
        student: &Student,
    ) -> Result<UpdateOutcome, StoreError> {
        let students = self.students();
        let update = doc! {
            "$set": {
                "firstname": &student.firstname,
                "lastname": &student.lastname,
                "age": student.age,
                "department": &student.department,
                "emailId": &student.email_id,
            }
        };
        self.bounded("update_one", self.operation_timeout, async move {
            let result = students
                .update_one(doc! { "emailId": email_id }, update, None)
                .await?;
            Ok::<_, StoreError>(UpdateOutcome::from(result))
        })
        .await
    }

    async fn delete_one(&self, email_id: &str) -> Result<DeleteOutcome, StoreError> {
        let students = self.students();
        self.bounded("delete_one", self.operation_timeout, async move {
            let result = students
                .delete_one(doc! { "emailId": email_id }, None)
                .await?;
            Ok::<_, StoreError>(DeleteOutcome::from(result))
        })
        .await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let admin = self.client.database("admin");
        self.bounded("ping", self.operation_timeout, async move {
            admin.run_command(doc! { "ping": 1 }, None).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }
}
