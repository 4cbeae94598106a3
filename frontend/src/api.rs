use gloo_net::http::Request;
use shared::{ErrorResponse, FeatureRecord, PredictionResponse, StatusResponse};

pub async fn fetch_status() -> Result<StatusResponse, String> {
    let response = Request::get("/api/status")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }
    response
        .json::<StatusResponse>()
        .await
        .map_err(|e| format!("Failed to parse status: {}", e))
}

pub async fn predict(record: &FeatureRecord) -> Result<PredictionResponse, String> {
    let request = Request::post("/api/predict")
        .json(record)
        .map_err(|e| format!("Failed to build request: {}", e))?;
    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        return response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e));
    }

    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => Err(body.error),
        Err(_) => Err(format!("Server error: {}", status)),
    }
}
