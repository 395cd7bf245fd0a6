// libs/calendar-cell/src/services/source.rs
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::CalendarError;
use crate::models::{RawAppointment, RawTreatment};

/// The engine's only view of the appointment-fetching collaborator.
#[async_trait]
pub trait AppointmentSource: Send + Sync {
    async fn fetch_appointments(&self) -> Result<Vec<RawAppointment>, CalendarError>;
}

/// The engine's only view of the treatment-fetching collaborator.
#[async_trait]
pub trait TreatmentSource: Send + Sync {
    async fn fetch_treatments(&self) -> Result<Vec<RawTreatment>, CalendarError>;
}

/// Default implementation of both sources against the portal REST API.
pub struct PortalApiSource {
    client: Client,
    base_url: String,
    api_token: String,
}

impl PortalApiSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.portal_api_base_url.clone(),
            api_token: config.portal_api_token.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.api_token.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, CalendarError>
    where
        T: DeserializeOwned,
    {
        if self.base_url.is_empty() {
            return Err(CalendarError::SourceUnavailable(
                "portal API base URL not configured".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).headers(self.headers()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Portal API error ({}): {}", status, body);
            return Err(CalendarError::SourceUnavailable(format!(
                "portal API returned {}",
                status
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AppointmentSource for PortalApiSource {
    async fn fetch_appointments(&self) -> Result<Vec<RawAppointment>, CalendarError> {
        self.get_json("/api/appointments").await
    }
}

#[async_trait]
impl TreatmentSource for PortalApiSource {
    async fn fetch_treatments(&self) -> Result<Vec<RawTreatment>, CalendarError> {
        self.get_json("/api/treatments").await
    }
}
