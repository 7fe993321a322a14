//! Monitoring point CRUD over the machines API.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::models::{Machine, MonitoringPoint};
use crate::api::ApiClient;
use crate::error::ApiError;

/// Machines resource, relative to the API base URL.
pub const MACHINE_PATH: &str = "machines";
/// Sub-path listing a user's monitoring points.
pub const POINTS_PATH: &str = "by-monitoring-points";
/// Sub-path removing a point from a machine.
pub const DELETE_POINT_PATH: &str = "delete-point";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletePointRequest<'a> {
    monitoring_point_id: &'a str,
}

/// Pass-through client for monitoring point actions.
///
/// No validation, retries or optimistic updates: every call is one
/// request and the backend's answer is returned as is.
pub struct MonitoringPointsClient {
    api: Arc<ApiClient>,
}

impl MonitoringPointsClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// All monitoring points visible to `user_id`.
    pub async fn list_points(&self, user_id: &str) -> Result<Vec<MonitoringPoint>, ApiError> {
        let path = format!(
            "{}/{}/{}",
            MACHINE_PATH,
            POINTS_PATH,
            urlencoding::encode(user_id)
        );
        self.api.get_json(&path).await
    }

    /// Append `point` to `machine` and store the whole machine.
    pub async fn create_point(
        &self,
        machine: &Machine,
        point: MonitoringPoint,
    ) -> Result<Machine, ApiError> {
        let updated = with_point(machine, point);
        debug!(
            "Adding monitoring point to machine {} ({} points)",
            updated.id,
            updated.monitoring_points.len()
        );
        let path = format!("{}/{}", MACHINE_PATH, urlencoding::encode(&updated.id));
        self.api.put_json(&path, &updated).await
    }

    /// Remove point `point_id` from machine `machine_id`.
    ///
    /// The backend answers with either the updated machine or a bare
    /// acknowledgement, so the body is returned undecoded.
    pub async fn delete_point(
        &self,
        machine_id: &str,
        point_id: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let path = format!(
            "{}/{}/{}",
            MACHINE_PATH,
            DELETE_POINT_PATH,
            urlencoding::encode(machine_id)
        );
        self.api
            .put_json(
                &path,
                &DeletePointRequest {
                    monitoring_point_id: point_id,
                },
            )
            .await
    }
}

/// Copy of `machine` with `point` appended after its existing points.
pub fn with_point(machine: &Machine, point: MonitoringPoint) -> Machine {
    let mut updated = machine.clone();
    updated.monitoring_points.push(point);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCookies, MockHttpClient, MockResponse};
    use crate::traits::Response;
    use bytes::Bytes;
    use serde_json::json;

    fn client(http: &MockHttpClient) -> MonitoringPointsClient {
        MonitoringPointsClient::new(Arc::new(ApiClient::new(
            Arc::new(http.clone()),
            Arc::new(InMemoryCookies::with_cookies([("authToken", "abc")])),
            "https://api.example.com",
        )))
    }

    fn ok(body: serde_json::Value) -> MockResponse {
        MockResponse::Success(Response::new(200, Bytes::from(body.to_string())))
    }

    #[test]
    fn test_with_point_appends_last() {
        let machine = Machine::new("m1").with_points([MonitoringPoint::new("p1")]);
        let updated = with_point(&machine, MonitoringPoint::new("p2"));

        let ids: Vec<_> = updated
            .monitoring_points
            .iter()
            .map(|p| p.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(machine.monitoring_points.len(), 1);
    }

    #[tokio::test]
    async fn test_list_points_gets_by_user() {
        let http = MockHttpClient::new();
        http.set_response(
            "https://api.example.com/machines/by-monitoring-points/u1",
            ok(json!([{"id": "p1"}, {"id": "p2"}])),
        );

        let points = client(&http).list_points("u1").await.unwrap();

        assert_eq!(points, vec![MonitoringPoint::new("p1"), MonitoringPoint::new("p2")]);
        let request = &http.get_requests()[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.headers.get("Cookie").map(String::as_str), Some("authToken=abc"));
    }

    #[tokio::test]
    async fn test_create_point_puts_whole_machine() {
        let http = MockHttpClient::new();
        http.set_default_response(ok(
            json!({"_id": "m1", "monitoringPoints": [{"id": "p1"}, {"id": "p2"}]}),
        ));
        let machine: Machine =
            serde_json::from_value(json!({"_id": "m1", "monitoringPoints": [{"id": "p1"}]}))
                .unwrap();

        let saved = client(&http)
            .create_point(&machine, MonitoringPoint::new("p2"))
            .await
            .unwrap();

        let request = &http.get_requests()[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, "https://api.example.com/machines/m1");
        assert_eq!(
            request.json_body(),
            Some(json!({"_id": "m1", "monitoringPoints": [{"id": "p1"}, {"id": "p2"}]}))
        );
        assert_eq!(saved.monitoring_points.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_point_sends_point_id() {
        let http = MockHttpClient::new();
        http.set_default_response(ok(json!({"_id": "m1", "monitoringPoints": []})));

        let saved = client(&http).delete_point("m1", "p1").await.unwrap();

        let request = &http.get_requests()[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, "https://api.example.com/machines/delete-point/m1");
        assert_eq!(request.json_body(), Some(json!({"monitoringPointId": "p1"})));
        assert_eq!(saved["monitoringPoints"], json!([]));
    }

    #[tokio::test]
    async fn test_delete_point_accepts_acknowledgement_body() {
        let http = MockHttpClient::new();
        http.set_default_response(ok(json!({"message": "ok"})));

        let answer = client(&http).delete_point("m1", "p1").await.unwrap();

        assert_eq!(answer, json!({"message": "ok"}));
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let http = MockHttpClient::new();
        http.set_default_response(ok(json!([])));

        client(&http).list_points("a/b c").await.unwrap();

        assert_eq!(
            http.get_requests()[0].url,
            "https://api.example.com/machines/by-monitoring-points/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_backend_error_is_returned() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            404,
            Bytes::from(r#"{"message":"Machine not found"}"#),
        )));

        let err = client(&http).delete_point("m404", "p1").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Machine not found"));
    }
}
