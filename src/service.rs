use crate::{
    data::{
        StudentStore,
        student::{AddStudentRequestDto, StudentDto, StudentField},
    },
    error::{MissingStudentSnafu, RollcallResult, ValidationSnafu},
};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;
use validator::Validate;

/// Student operations on top of a [`StudentStore`], speaking in DTOs.
///
/// Request bodies for `create_new_student` and `update_student` are expected to have been
/// validated already.
#[derive(Clone, Debug)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_students(&self) -> RollcallResult<Vec<StudentDto>> {
        let students = self.store.find_all().await?;
        Ok(students.into_iter().map(StudentDto::from).collect())
    }

    pub async fn get_student_by_id(&self, id: i64) -> RollcallResult<StudentDto> {
        self.store
            .find_by_id(id)
            .await?
            .map(StudentDto::from)
            .context(MissingStudentSnafu { id })
    }

    pub async fn create_new_student(
        &self,
        request: AddStudentRequestDto,
    ) -> RollcallResult<StudentDto> {
        let student = self.store.insert(request.into()).await?;
        info!(id = student.id, "Created student");
        Ok(student.into())
    }

    pub async fn delete_student(&self, id: i64) -> RollcallResult<()> {
        snafu::ensure!(
            self.store.exists_by_id(id).await?,
            MissingStudentSnafu { id }
        );

        self.store.delete_by_id(id).await?;
        info!(id, "Deleted student");
        Ok(())
    }

    pub async fn update_student(
        &self,
        id: i64,
        request: AddStudentRequestDto,
    ) -> RollcallResult<StudentDto> {
        let mut student = self
            .store
            .find_by_id(id)
            .await?
            .context(MissingStudentSnafu { id })?;

        let AddStudentRequestDto { name, email } = request;
        student.name = name;
        student.email = email;

        let student = self.store.save(student).await?;
        debug!(id, "Replaced student");
        Ok(student.into())
    }

    ///every key gets checked before anything is touched, so a bad key leaves the stored student alone
    pub async fn update_partial_student(
        &self,
        id: i64,
        updates: Map<String, Value>,
    ) -> RollcallResult<StudentDto> {
        let mut student = self
            .store
            .find_by_id(id)
            .await?
            .context(MissingStudentSnafu { id })?;

        let updates = updates
            .into_iter()
            .map(|(field, value)| field.parse::<StudentField>().map(|field| (field, value)))
            .collect::<RollcallResult<Vec<_>>>()?;

        for (field, value) in updates {
            field.apply(&mut student, value);
        }
        student.validate().context(ValidationSnafu)?;

        let student = self.store.save(student).await?;
        debug!(id, "Patched student");
        Ok(student.into())
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::memory_store::InMemoryStudentStore, error::RollcallError};
    use serde_json::json;

    fn service() -> StudentService {
        StudentService::new(Arc::new(InMemoryStudentStore::new()))
    }

    fn request(name: &str, email: &str) -> AddStudentRequestDto {
        AddStudentRequestDto {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn updates(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("updates must be an object");
        };
        map
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let created = service
            .create_new_student(request("Alice Smith", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(service.get_student_by_id(1).await.unwrap(), created);
        assert_eq!(service.get_all_students().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = service();

        assert!(matches!(
            service.get_student_by_id(42).await,
            Err(RollcallError::MissingStudent { id: 42 })
        ));
        assert!(matches!(
            service.delete_student(42).await,
            Err(RollcallError::MissingStudent { id: 42 })
        ));
        assert!(matches!(
            service
                .update_student(42, request("Alice", "alice@example.com"))
                .await,
            Err(RollcallError::MissingStudent { id: 42 })
        ));
        assert!(matches!(
            service
                .update_partial_student(42, updates(json!({"wrong": 1})))
                .await,
            Err(RollcallError::MissingStudent { id: 42 })
        ));
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let service = service();
        let created = service
            .create_new_student(request("Bob Jones", "bob@example.com"))
            .await
            .unwrap();

        service.delete_student(created.id).await.unwrap();
        assert!(matches!(
            service.delete_student(created.id).await,
            Err(RollcallError::MissingStudent { .. })
        ));
    }

    #[tokio::test]
    async fn full_update_replaces_everything_and_is_idempotent() {
        let service = service();
        let created = service
            .create_new_student(request("Carol", "carol@example.com"))
            .await
            .unwrap();

        let replacement = request("Caroline", "caroline@example.com");
        let first = service
            .update_student(created.id, replacement.clone())
            .await
            .unwrap();
        let second = service
            .update_student(created.id, replacement)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, created.id);
        assert_eq!(first.name, "Caroline");
        assert_eq!(first.email, "caroline@example.com");
    }

    #[tokio::test]
    async fn partial_update_touches_only_named_fields() {
        let service = service();
        let created = service
            .create_new_student(request("Dana", "dana@example.com"))
            .await
            .unwrap();

        let renamed = service
            .update_partial_student(created.id, updates(json!({"name": "Danielle"})))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Danielle");
        assert_eq!(renamed.email, "dana@example.com");

        let moved = service
            .update_partial_student(created.id, updates(json!({"email": "dani@example.org"})))
            .await
            .unwrap();
        assert_eq!(moved.name, "Danielle");
        assert_eq!(moved.email, "dani@example.org");
    }

    #[tokio::test]
    async fn unknown_field_leaves_record_unchanged() {
        let service = service();
        let created = service
            .create_new_student(request("Erin", "erin@example.com"))
            .await
            .unwrap();

        let err = service
            .update_partial_student(
                created.id,
                updates(json!({"name": "Changed Name", "age": 12})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RollcallError::InvalidField { ref field } if field == "age"));
        assert_eq!(service.get_student_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn partial_update_keeps_fields_valid() {
        let service = service();
        let created = service
            .create_new_student(request("Frank", "frank@example.com"))
            .await
            .unwrap();

        let err = service
            .update_partial_student(created.id, updates(json!({"email": "nope"})))
            .await
            .unwrap_err();
        assert!(matches!(err, RollcallError::Validation { .. }));
        assert_eq!(service.get_student_by_id(created.id).await.unwrap(), created);
    }
}
