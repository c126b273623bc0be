use crate::{
    config::{RuntimeConfiguration, StoreBackend},
    data::{StudentStore, memory_store::InMemoryStudentStore, postgres_store::PostgresStudentStore},
    error::RollcallResult,
    payment::PaymentService,
    service::StudentService,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct RollcallState {
    students: StudentService,
    config: RuntimeConfiguration,
    payment: Arc<dyn PaymentService>,
}

impl RollcallState {
    pub async fn new(options: PgPoolOptions, config: RuntimeConfiguration) -> RollcallResult<Self> {
        let store: Arc<dyn StudentStore> = match config.store() {
            StoreBackend::Postgres(db_config) => {
                Arc::new(PostgresStudentStore::new(options, db_config).await?)
            }
            StoreBackend::InMemory => {
                warn!("Using in-memory student store, nothing will be persisted");
                Arc::new(InMemoryStudentStore::new())
            }
        };

        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Arc<dyn StudentStore>, config: RuntimeConfiguration) -> Self {
        let payment = config.payment_provider().service();
        info!(provider = ?config.payment_provider(), "Selected payment provider");

        Self {
            students: StudentService::new(store),
            config,
            payment,
        }
    }

    pub const fn students(&self) -> &StudentService {
        &self.students
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub fn payment(&self) -> Arc<dyn PaymentService> {
        self.payment.clone()
    }

    pub async fn sensible_shutdown(&self) {
        self.students.close().await;
    }
}
