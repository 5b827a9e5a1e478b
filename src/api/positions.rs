use crate::models::PositionsResponse;

const POSITIONS_API: &str = "/api/positions";

/// Fetch live train positions for a line from the proxy.
///
/// A successful response with an empty train list and a diagnostic means
/// "no vehicles currently running" and is not an error; only transport or
/// decode failures surface as `Err`.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP request fails
/// - The response body cannot be deserialized
pub async fn fetch_train_positions(line_id: &str) -> Result<PositionsResponse, String> {
    let url = format!("{POSITIONS_API}?line={line_id}");
    reqwest::get(&url)
        .await
        .map_err(|e| format!("Request failed: {e}"))?
        .json::<PositionsResponse>()
        .await
        .map_err(|e| format!("Failed to deserialize: {e}"))
}
