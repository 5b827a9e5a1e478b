use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::env;

const UPSTREAM_URL_VAR: &str = "TRANSIT_UPSTREAM_URL";
const API_KEY_VAR: &str = "TRANSIT_API_KEY";

/// Upstream status code meaning "the line is fine, nothing is running".
const NO_DATA_CODE: &str = "NO_DATA";

#[derive(Deserialize)]
struct PositionsQuery {
    line: Option<String>,
}

/// Shape handed to the web client. Train records pass through untouched;
/// only the upstream's error envelope is normalized away.
#[derive(Serialize)]
struct PositionsPayload {
    diagnostic: Option<String>,
    trains: Vec<serde_json::Value>,
}

/// Collapse the upstream response envelope into the client payload.
///
/// A `NO_DATA` code is a valid answer (no vehicles running), so it maps to
/// an empty train list with a diagnostic rather than an error status.
fn normalize_upstream(body: &serde_json::Value) -> PositionsPayload {
    let code = body
        .get("code")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if code == NO_DATA_CODE {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("no trains currently in service");
        return PositionsPayload {
            diagnostic: Some(message.to_string()),
            trains: Vec::new(),
        };
    }
    let trains = body
        .get("positions")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();
    PositionsPayload {
        diagnostic: None,
        trains,
    }
}

async fn get_positions(query: web::Query<PositionsQuery>) -> HttpResponse {
    let Some(line) = query.line.as_deref().filter(|line| !line.is_empty()) else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "line parameter is required" }));
    };

    let Ok(base) = env::var(UPSTREAM_URL_VAR) else {
        return HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "upstream is not configured" }));
    };
    let key = env::var(API_KEY_VAR).unwrap_or_default();
    let url = format!("{base}/{line}?key={key}");

    match reqwest::get(&url).await {
        Ok(response) => match response.json::<serde_json::Value>().await {
            Ok(body) => HttpResponse::Ok().json(normalize_upstream(&body)),
            Err(_) => HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": "upstream returned an unreadable response" })),
        },
        Err(_) => HttpResponse::BadGateway()
            .json(serde_json::json!({ "error": "upstream is unreachable" })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    println!("Starting server on 0.0.0.0:{port}");

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .route("/api/positions", web::get().to(get_positions))
            .service(Files::new("/", "./dist").index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_passes_positions_through() {
        let body = serde_json::json!({
            "code": "OK",
            "positions": [
                { "trainNo": "2214", "lineId": "loop" },
                { "trainNo": "2216", "lineId": "loop" }
            ]
        });
        let payload = normalize_upstream(&body);
        assert_eq!(payload.diagnostic, None);
        assert_eq!(payload.trains.len(), 2);
    }

    #[test]
    fn test_normalize_no_data_becomes_diagnostic() {
        let body = serde_json::json!({
            "code": "NO_DATA",
            "message": "service has ended for today"
        });
        let payload = normalize_upstream(&body);
        assert_eq!(
            payload.diagnostic.as_deref(),
            Some("service has ended for today")
        );
        assert!(payload.trains.is_empty());
    }

    #[test]
    fn test_normalize_tolerates_missing_fields() {
        let payload = normalize_upstream(&serde_json::json!({}));
        assert_eq!(payload.diagnostic, None);
        assert!(payload.trains.is_empty());
    }
}
