use actix_web::{HttpResponse, post, web};
use tracing::debug;
use uptime::MonitorRecord;

use crate::error::ApiError;
use crate::server::AppState;

macros_utils::routes! {
    route append_record_route,
}

/// Store one probe record reported by the scheduler
#[post("/monitors/{monitor_id}/records")]
pub async fn append_record_route(
    state: web::Data<AppState>,
    path: web::Path<String>,
    record: web::Json<MonitorRecord>,
) -> Result<HttpResponse, ApiError> {
    let monitor_id = path.into_inner();
    let record = record.into_inner();
    let (region, timestamp) = (record.region, record.timestamp);

    state.store.append(&monitor_id, record).await?;
    debug!(monitor_id = %monitor_id, %region, timestamp, "Stored probe record");

    Ok(HttpResponse::NoContent().finish())
}
