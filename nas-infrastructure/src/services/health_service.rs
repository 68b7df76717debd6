use std::sync::Arc;

use async_trait::async_trait;
use nas_domain::ports::HealthCheckService;
use nas_domain::SendEventRepository;

pub struct DefaultHealthService {
    event_repo: Arc<dyn SendEventRepository>,
}

impl DefaultHealthService {
    pub fn new(event_repo: Arc<dyn SendEventRepository>) -> Self {
        Self { event_repo }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_database(&self) -> anyhow::Result<bool> {
        self.event_repo.ping().await.map(|_| true)
    }
}
