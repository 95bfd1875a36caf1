use crate::error::StudentsResult;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod memory;
pub mod mongo;
pub mod student;

pub use student::Student;

/// Persistence boundary for [`Student`] records.
///
/// `save` is an upsert keyed by the student's id: a missing id is generated, an existing one
/// replaces whatever is stored under it.
#[async_trait]
pub trait StudentRepository: Debug + Send + Sync {
    async fn save(&self, student: Student) -> StudentsResult<Student>;
    async fn find_all(&self) -> StudentsResult<Vec<Student>>;
    /// Succeeds whether or not anything was stored under `id`.
    async fn delete_by_id(&self, id: &str) -> StudentsResult<()>;

    async fn shutdown(&self) {}
}
