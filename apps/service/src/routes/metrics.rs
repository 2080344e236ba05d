use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use uptime::{Region, validate_monitor_id};

use crate::error::ApiError;
use crate::server::AppState;

macros_utils::routes! {
    route monitor_metrics_route,
    route region_metrics_route,
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// Comma separated regions, the configured list when absent
    regions: Option<String>,
    /// Evaluation time in epoch milliseconds, the current time when absent
    now: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AtQuery {
    now: Option<i64>,
}

fn parse_regions(raw: &str) -> Result<Vec<Region>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Region>().map_err(ApiError::from))
        .collect()
}

/// `MonitorData` of one monitor
#[get("/monitors/{monitor_id}/metrics")]
pub async fn monitor_metrics_route(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MetricsQuery>,
) -> Result<HttpResponse, ApiError> {
    let monitor_id = path.into_inner();
    validate_monitor_id(&monitor_id)?;
    let now = query.now.unwrap_or_else(uptime::now_millis);

    let regions = match query.regions.as_deref() {
        Some(raw) => parse_regions(raw)?,
        None => Vec::new(),
    };

    // An empty list means the configured regions
    let data = if regions.is_empty() {
        state.aggregator.compute_configured(&monitor_id, now).await?
    } else {
        state.aggregator.compute(&monitor_id, &regions, now).await?
    };

    Ok(HttpResponse::Ok().json(data))
}

/// `RegionMetrics` of one monitor in one region
#[get("/monitors/{monitor_id}/regions/{region}/metrics")]
pub async fn region_metrics_route(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<AtQuery>,
) -> Result<HttpResponse, ApiError> {
    let (monitor_id, region) = path.into_inner();
    validate_monitor_id(&monitor_id)?;
    let region: Region = region.parse()?;
    let now = query.now.unwrap_or_else(uptime::now_millis);

    let metrics = state.aggregator.region_aggregator().compute(&monitor_id, region, now).await?;
    Ok(HttpResponse::Ok().json(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regions() {
        assert_eq!(parse_regions("us, asia").unwrap(), vec![Region::Us, Region::Asia]);
        assert_eq!(parse_regions("us,,").unwrap(), vec![Region::Us]);
        assert!(parse_regions("").unwrap().is_empty());
        assert!(parse_regions("us,mars").is_err());
    }
}
