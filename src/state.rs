use crate::{
    config::{RuntimeConfiguration, StoreKind},
    data::{StudentRepository, memory::InMemoryStudentRepository, mongo::MongoStudentRepository},
    error::StudentsResult,
    service::StudentService,
};
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct StudentState {
    service: StudentService,
    config: RuntimeConfiguration,
}

impl StudentState {
    pub async fn new(config: RuntimeConfiguration) -> StudentsResult<Self> {
        let repository: Arc<dyn StudentRepository> = match config.server_config().store_kind() {
            StoreKind::Mongo => {
                Arc::new(MongoStudentRepository::connect(&config.db_config()).await?)
            }
            StoreKind::Memory => {
                warn!("using the in-memory student store, records die with this process");
                Arc::new(InMemoryStudentRepository::default())
            }
        };

        Ok(Self::with_repository(repository, config))
    }

    pub fn with_repository(
        repository: Arc<dyn StudentRepository>,
        config: RuntimeConfiguration,
    ) -> Self {
        Self {
            service: StudentService::new(repository),
            config,
        }
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub async fn sensible_shutdown(&self) {
        self.service.shutdown().await;
    }
}

impl Deref for StudentState {
    type Target = StudentService;

    fn deref(&self) -> &Self::Target {
        &self.service
    }
}
