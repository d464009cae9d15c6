use crate::types::Health;
use axum::Json;
use time::OffsetDateTime;

pub async fn health() -> Json<Health> {
    let now = OffsetDateTime::now_utc();

    Json(Health {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        // whole seconds
        timestamp: now.replace_nanosecond(0).unwrap_or(now),
    })
}
