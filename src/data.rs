use crate::{
    data::student::{NewStudent, Student},
    error::RollcallResult,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod memory_store;
pub mod postgres_store;
pub mod student;

/// Durable storage for students.
///
/// `insert` hands out the id; `save` overwrites the row with the student's id and fails with
/// `MissingStudent` if there isn't one.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn find_by_id(&self, id: i64) -> RollcallResult<Option<Student>>;
    async fn find_all(&self) -> RollcallResult<Vec<Student>>;
    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<Student>;
    async fn save(&self, student: Student) -> RollcallResult<Student>;
    async fn exists_by_id(&self, id: i64) -> RollcallResult<bool>;
    async fn delete_by_id(&self, id: i64) -> RollcallResult<()>;

    async fn close(&self) {}
}
