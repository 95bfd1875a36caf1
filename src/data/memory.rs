use crate::{
    data::{Student, StudentRepository},
    error::StudentsResult,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps students in insertion order inside the process, nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<Vec<Student>>,
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn save(&self, student: Student) -> StudentsResult<Student> {
        let (id, student) = student.identified();

        let mut students = self.students.write().await;
        match students
            .iter_mut()
            .find(|existing| existing.id.as_deref() == Some(id.as_str()))
        {
            Some(existing) => existing.clone_from(&student),
            None => students.push(student.clone()),
        }
        trace!(%id, count = students.len(), "saved student in memory");

        Ok(student)
    }

    async fn find_all(&self) -> StudentsResult<Vec<Student>> {
        Ok(self.students.read().await.clone())
    }

    async fn delete_by_id(&self, id: &str) -> StudentsResult<()> {
        self.students
            .write()
            .await
            .retain(|student| student.id.as_deref() != Some(id));
        Ok(())
    }
}
