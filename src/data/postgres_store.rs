use crate::{
    config::DbConfig,
    data::{
        StudentStore,
        student::{NewStudent, Student},
    },
    error::{
        GetDatabaseConnectionSnafu, MakeQuerySnafu, MigrateSnafu, MissingStudentSnafu,
        OpenDatabaseSnafu, RollcallResult,
    },
};
use async_trait::async_trait;
use snafu::{OptionExt, ResultExt};
use sqlx::{Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

#[derive(Debug, Clone)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn new(options: PgPoolOptions, db_config: &DbConfig) -> RollcallResult<Self> {
        let pool = options
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }

    async fn get_connection(&self) -> RollcallResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn find_by_id(&self, id: i64) -> RollcallResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>("SELECT id, name, email FROM public.students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn find_all(&self) -> RollcallResult<Vec<Student>> {
        sqlx::query_as::<_, Student>("SELECT id, name, email FROM public.students ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<Student> {
        let NewStudent { name, email } = to_be_added;
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>(
            "INSERT INTO public.students (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&mut *conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn save(&self, student: Student) -> RollcallResult<Student> {
        let Student { id, name, email } = student;
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>(
            "UPDATE public.students SET name = $2, email = $3 WHERE id = $1 RETURNING id, name, email",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .context(MakeQuerySnafu)?
        .context(MissingStudentSnafu { id })
    }

    async fn exists_by_id(&self, id: i64) -> RollcallResult<bool> {
        let mut conn = self.get_connection().await?;

        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM public.students WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn delete_by_id(&self, id: i64) -> RollcallResult<()> {
        let mut conn = self.get_connection().await?;

        sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
