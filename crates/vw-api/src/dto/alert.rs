use serde::Serialize;
use utoipa::ToSchema;
use vaultwatch_kpi::{Alert, AlertThresholds};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertsResponse {
    pub count: usize,
    pub alerts: Vec<Alert>,
    pub thresholds: AlertThresholds,
}
