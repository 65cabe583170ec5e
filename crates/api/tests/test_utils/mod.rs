use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use clinicslot_api::{ApiState, build_router};
use clinicslot_core::models::ProviderSession;
use clinicslot_db::mock::memory::InMemoryBookingRepository;
use serde_json::{Value, json};
use uuid::Uuid;

pub struct TestContext {
    pub server: TestServer,
    pub repo: Arc<InMemoryBookingRepository>,
    pub session: ProviderSession,
}

impl TestContext {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let state = Arc::new(ApiState::new(repo.clone()));
        let server = TestServer::new(build_router(state)).expect("Failed to start test server");

        Self {
            server,
            repo,
            session: ProviderSession {
                workspace_id: Uuid::new_v4(),
                provider_id: Uuid::new_v4(),
            },
        }
    }

    /// Adds the provider session headers for `session` to a request.
    pub fn as_provider(request: TestRequest, session: &ProviderSession) -> TestRequest {
        request
            .add_header(
                HeaderName::from_static("x-workspace-id"),
                HeaderValue::from_str(&session.workspace_id.to_string()).unwrap(),
            )
            .add_header(
                HeaderName::from_static("x-provider-id"),
                HeaderValue::from_str(&session.provider_id.to_string()).unwrap(),
            )
    }

    /// Sets up Monday to Friday 09:00-12:00 in 30 minute slots, weekends
    /// closed, and returns the new availability id.
    pub async fn create_weekday_availability(&self) -> Uuid {
        let response = Self::as_provider(self.server.post("/api/availability"), &self.session)
            .json(&weekday_availability_body(30))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

pub fn weekday_availability_body(slot_duration_minutes: i32) -> Value {
    let open = json!({ "startTime": "09:00", "endTime": "12:00" });
    let closed = json!({ "startTime": "00:00", "endTime": "00:00", "disabled": true });
    json!({
        "slotDurationMinutes": slot_duration_minutes,
        "weeklySchedule": {
            "monday": open,
            "tuesday": open,
            "wednesday": open,
            "thursday": open,
            "friday": open,
            "saturday": closed,
            "sunday": closed,
        }
    })
}

pub fn booking_body(availability_id: Uuid, start: &str, email: &str) -> Value {
    json!({
        "availabilityId": availability_id,
        "start": start,
        "name": "Ada Lovelace",
        "email": email,
        "phone": "555-0100",
    })
}
