use crate::{
    data::{Student, StudentRepository},
    error::StudentsResult,
};
use std::sync::Arc;

/// One method per student operation, each handed straight to the repository.
#[derive(Clone, Debug)]
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn add_student(&self, student: Student) -> StudentsResult<Student> {
        self.repository.save(student).await
    }

    pub async fn update_student(&self, student: Student) -> StudentsResult<Student> {
        self.repository.save(student).await
    }

    pub async fn get_all_students(&self) -> StudentsResult<Vec<Student>> {
        self.repository.find_all().await
    }

    pub async fn delete_student(&self, id: &str) -> StudentsResult<()> {
        self.repository.delete_by_id(id).await
    }

    pub async fn shutdown(&self) {
        self.repository.shutdown().await;
    }
}
