use crate::{
    config::DbConfig,
    data::{Student, StudentRepository},
    error::{MakeQuerySnafu, MalformedDocumentSnafu, OpenDatabaseSnafu, StudentsResult},
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    Client, Collection,
    bson::{Bson, Document, doc, oid::ObjectId},
};
use snafu::ResultExt;

#[derive(Clone, Debug)]
pub struct MongoStudentRepository {
    client: Client,
    collection: Collection<Document>,
}

impl MongoStudentRepository {
    pub async fn connect(db_config: &DbConfig) -> StudentsResult<Self> {
        let client = Client::with_uri_str(db_config.get_db_uri())
            .await
            .context(OpenDatabaseSnafu)?;
        let collection = client
            .database(db_config.database())
            .collection(db_config.collection());

        info!(
            database = db_config.database(),
            collection = db_config.collection(),
            "MongoDB client ready"
        );

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn save(&self, student: Student) -> StudentsResult<Student> {
        let (id, document, stored) = prepare_save(student)?;

        let result = self
            .collection
            .replace_one(doc! { "_id": id }, document)
            .upsert(true)
            .await
            .context(MakeQuerySnafu)?;
        debug!(
            id = stored.id.as_deref(),
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "saved student"
        );

        Ok(stored)
    }

    async fn find_all(&self) -> StudentsResult<Vec<Student>> {
        self.collection
            .find(doc! {})
            .await
            .context(MakeQuerySnafu)?
            .map(|document| {
                document
                    .context(MakeQuerySnafu)
                    .and_then(|document| student_from_document(&document))
            })
            .try_collect()
            .await
    }

    async fn delete_by_id(&self, id: &str) -> StudentsResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id_to_bson(id) })
            .await
            .context(MakeQuerySnafu)?;
        debug!(%id, deleted = result.deleted_count, "deleted student");
        Ok(())
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}

/// Ids shaped like an `ObjectId` are stored as one, anything else stays a plain string.
pub fn id_to_bson(id: &str) -> Bson {
    ObjectId::parse_str(id).map_or_else(|_| Bson::String(id.to_string()), Bson::ObjectId)
}

pub fn student_to_document(id: &str, student: &Student) -> Document {
    doc! {
        "_id": id_to_bson(id),
        "name": student.name.as_str(),
        "department": student.department.as_str(),
    }
}

/// The `_id` filter, the document to store, and the student as [`student_from_document`] will
/// later read it back (ObjectId-shaped ids come back as lowercase hex).
pub fn prepare_save(student: Student) -> StudentsResult<(Bson, Document, Student)> {
    let (id, student) = student.identified();
    let document = student_to_document(&id, &student);
    let stored = student_from_document(&document)?;
    Ok((id_to_bson(&id), document, stored))
}

pub fn student_from_document(document: &Document) -> StudentsResult<Student> {
    let id = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id.clone(),
        other => {
            return MalformedDocumentSnafu {
                found: other.map(Bson::element_type),
            }
            .fail();
        }
    };
    let text = |key: &str| document.get_str(key).unwrap_or_default().to_string();

    Ok(Student {
        id: Some(id),
        name: text("name"),
        department: text("department"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudentsError;
    use mongodb::bson::spec::ElementType;

    #[test]
    fn object_id_shaped_ids_are_stored_as_object_ids() {
        let hex = "64b7f0c2a1b2c3d4e5f60718";
        let document = student_to_document(hex, &Student::new("Alice", "CS"));

        assert_eq!(
            document.get_object_id("_id").unwrap(),
            ObjectId::parse_str(hex).unwrap()
        );
        assert_eq!(
            student_from_document(&document).unwrap(),
            Student::new("Alice", "CS").with_id(hex)
        );
    }

    #[test]
    fn other_ids_are_stored_as_strings() {
        let document = student_to_document("123", &Student::new("Bob", "EE"));

        assert_eq!(document.get_str("_id").unwrap(), "123");
        assert_eq!(
            student_from_document(&document).unwrap(),
            Student::new("Bob", "EE").with_id("123")
        );
    }

    #[test]
    fn saved_student_matches_what_is_read_back() {
        let (id, document, stored) =
            prepare_save(Student::new("Bob", "EE").with_id("64B7F0C2A1B2C3D4E5F60718")).unwrap();

        assert_eq!(
            id,
            Bson::ObjectId(ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap())
        );
        assert_eq!(
            stored,
            Student::new("Bob", "EE").with_id("64b7f0c2a1b2c3d4e5f60718")
        );
        assert_eq!(student_from_document(&document).unwrap(), stored);

        let (id, _, stored) = prepare_save(Student::new("Bob", "EE").with_id("123")).unwrap();
        assert_eq!(id, Bson::String("123".to_string()));
        assert_eq!(stored.id.as_deref(), Some("123"));
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let document = doc! { "_id": "7", "name": "Carol" };
        assert_eq!(
            student_from_document(&document).unwrap(),
            Student::new("Carol", "").with_id("7")
        );
    }

    #[test]
    fn unsupported_ids_are_rejected() {
        let err = student_from_document(&doc! { "_id": 42, "name": "Dan" }).unwrap_err();
        assert!(matches!(
            err,
            StudentsError::MalformedDocument {
                found: Some(ElementType::Int32)
            }
        ));

        let err = student_from_document(&doc! { "name": "Dan" }).unwrap_err();
        assert!(matches!(
            err,
            StudentsError::MalformedDocument { found: None }
        ));
    }
}

#[cfg(all(test, feature = "mongo-tests"))]
mod container_tests {
    use super::*;
    use crate::config::DbConfig;
    use testcontainers::{ContainerAsync, runners::AsyncRunner};
    use testcontainers_modules::mongo::Mongo;

    async fn start_repository() -> (MongoStudentRepository, ContainerAsync<Mongo>) {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start mongo container");
        let host = container.get_host().await.expect("Failed to get mongo host");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get mongo port");

        let db_config = DbConfig::for_local_server(host.to_string(), port);
        let repository = MongoStudentRepository::connect(&db_config).await.unwrap();
        (repository, container)
    }

    #[tokio::test]
    async fn saved_students_are_listed_with_a_generated_id() {
        let (repository, _container) = start_repository().await;

        let saved = repository.save(Student::new("Alice", "CS")).await.unwrap();

        let id = saved.id.as_deref().unwrap();
        assert!(ObjectId::parse_str(id).is_ok());
        assert_eq!(repository.find_all().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn saving_a_plain_id_twice_keeps_one_record() {
        let (repository, _container) = start_repository().await;

        repository
            .save(Student::new("Alice", "CS").with_id("123"))
            .await
            .unwrap();
        repository
            .save(Student::new("Bob", "EE").with_id("123"))
            .await
            .unwrap();

        assert_eq!(
            repository.find_all().await.unwrap(),
            vec![Student::new("Bob", "EE").with_id("123")]
        );
    }

    #[tokio::test]
    async fn saving_an_object_id_twice_keeps_one_record() {
        let (repository, _container) = start_repository().await;
        let hex = "64b7f0c2a1b2c3d4e5f60718";

        repository
            .save(Student::new("Alice", "CS").with_id(hex))
            .await
            .unwrap();
        let saved = repository
            .save(Student::new("Bob", "EE").with_id(hex.to_uppercase()))
            .await
            .unwrap();

        assert_eq!(saved, Student::new("Bob", "EE").with_id(hex));
        assert_eq!(repository.find_all().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn deleting_removes_only_the_matching_record() {
        let (repository, _container) = start_repository().await;
        let alice = repository.save(Student::new("Alice", "CS")).await.unwrap();
        let bob = repository
            .save(Student::new("Bob", "EE").with_id("2"))
            .await
            .unwrap();

        repository
            .delete_by_id(alice.id.as_deref().unwrap())
            .await
            .unwrap();
        repository.delete_by_id("999").await.unwrap();

        assert_eq!(repository.find_all().await.unwrap(), vec![bob]);
    }
}
