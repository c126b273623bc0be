use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student},
    },
    error::{MissingStudentSnafu, RollcallResult},
};
use async_trait::async_trait;
use snafu::OptionExt;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Student>,
}

/// Keeps students in process memory. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStudentStore {
    table: RwLock<Table>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn find_by_id(&self, id: i64) -> RollcallResult<Option<Student>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RollcallResult<Vec<Student>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<Student> {
        let NewStudent { name, email } = to_be_added;
        let mut table = self.table.write().await;

        table.last_id += 1;
        let student = Student {
            id: table.last_id,
            name,
            email,
        };
        table.rows.insert(student.id, student.clone());

        Ok(student)
    }

    async fn save(&self, student: Student) -> RollcallResult<Student> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&student.id)
            .context(MissingStudentSnafu { id: student.id })?;
        row.clone_from(&student);

        Ok(student)
    }

    async fn exists_by_id(&self, id: i64) -> RollcallResult<bool> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RollcallResult<()> {
        self.table.write().await.rows.remove(&id);
        Ok(())
    }
}
