use std::sync::Arc;

use pragma_common::services::{Service, ServiceRunner};

use crate::service::RefreshService;

pub struct RefreshTask {
    service: Arc<RefreshService>,
}

impl RefreshTask {
    pub const fn new(service: Arc<RefreshService>) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Service for RefreshTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let service = Arc::clone(&self.service);

        runner.spawn_loop(move |ctx| async move {
            if let Some(result) = ctx.run_until_cancelled(service.run_forever()).await {
                result?;
            }

            tracing::info!("[RefreshService] ⏹️ Refresh loop stopped");
            anyhow::Ok(())
        });

        Ok(())
    }
}
