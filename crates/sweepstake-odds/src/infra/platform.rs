use hyper::header::{ACCEPT, ORIGIN};
use log::error;
use mime::APPLICATION_JSON;
use reqwest_middleware::{
    self,
    reqwest::{Response, StatusCode, Url},
    ClientWithMiddleware,
};
use serde::{de::DeserializeOwned, Deserialize};
use sweepstake_odds_core::{
    deserialize_count, deserialize_id, deserialize_price, null_as_default, Competition,
    EntryPackage,
};
use thiserror::Error;

/// How many recent sweepstakes the listing asks the platform for
pub const RECENT_SWEEPSTAKES: u32 = 30;
/// Participants requested per page when summing entries
pub const PARTICIPANT_PAGE_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum Error {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("problem sending request to platform: {0}")]
    Send(#[from] reqwest_middleware::Error),
    #[error("problem reading platform response: {0}")]
    Decode(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem requesting platform: {0}")]
    Request(String),
    #[error("platform url {0} cannot take path segments")]
    Url(Url),
}

/// Sweepstake as it appears in the platform's recent listing
#[derive(Debug, Clone, Deserialize)]
pub struct SweepstakeSummary {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl From<SweepstakeSummary> for Competition {
    fn from(value: SweepstakeSummary) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub entry_count: u64,
}

/// One page of a sweepstake's participant list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Participant>,
    /// Zero when the platform left it out or sent something unusable
    #[serde(default, deserialize_with = "deserialize_count")]
    pub page_count: u64,
}

impl ParticipantPage {
    pub fn entries(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.entry_count))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPackage {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub entry_count: u64,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl From<UpstreamPackage> for EntryPackage {
    fn from(value: UpstreamPackage) -> Self {
        Self {
            entries: value.entry_count,
            price: value.price,
        }
    }
}

/// Full sweepstake record, only the fields the odds need are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepstakeDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prizes: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_packages: Vec<UpstreamPackage>,
}

#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    async fn recent_sweepstakes(&self) -> Result<Vec<SweepstakeSummary>, Error>;
    async fn participant_page(&self, sweepstake_id: &str, page: u64)
        -> Result<ParticipantPage, Error>;
    async fn sweepstake(&self, sweepstake_id: &str) -> Result<SweepstakeDetail, Error>;
}

#[derive(Clone)]
pub struct PlatformClient {
    pub base_url: Url,
    pub client: ClientWithMiddleware,
    origin: String,
}

impl PlatformClient {
    pub fn new(client: ClientWithMiddleware, base_url: &Url, origin: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            client,
            origin: origin.to_owned(),
        }
    }

    async fn send_request_internal(
        &self,
        url: Url,
        not_found_message: String,
    ) -> Result<Response, Error> {
        let response = self
            .client
            .get(url)
            .header(ORIGIN, &self.origin)
            .header(ACCEPT, APPLICATION_JSON.to_string())
            .send()
            .await
            .map_err(|e| {
                error!("error sending to platform: {}", e);
                Error::Send(e)
            })?;

        if response.status().is_success() {
            Ok(response)
        } else if response.status() == StatusCode::NOT_FOUND {
            Err(Error::NotFound(not_found_message))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Request(format!(
                "error response from platform with status {}: {:?}",
                status, body
            )))
        }
    }

    pub async fn send_request<T>(&self, url: Url, not_found_message: String) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send_request_internal(url, not_found_message).await?;

        response.json::<T>().await.map_err(Into::into)
    }
}

#[async_trait::async_trait]
impl Platform for PlatformClient {
    async fn recent_sweepstakes(&self) -> Result<Vec<SweepstakeSummary>, Error> {
        let mut url = self.endpoint(&["sweepstake"])?;
        url.query_pairs_mut()
            .append_pair("includeRecent", &RECENT_SWEEPSTAKES.to_string());

        self.send_request::<Vec<SweepstakeSummary>>(url, String::from("sweepstakes not found"))
            .await
    }

    async fn participant_page(
        &self,
        sweepstake_id: &str,
        page: u64,
    ) -> Result<ParticipantPage, Error> {
        let mut url = self.endpoint(&["sweepstake", sweepstake_id, "participant"])?;
        url.query_pairs_mut()
            .append_pair("pageSize", &PARTICIPANT_PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());

        self.send_request::<ParticipantPage>(
            url,
            format!("participants of sweepstake {} not found", sweepstake_id),
        )
        .await
    }

    async fn sweepstake(&self, sweepstake_id: &str) -> Result<SweepstakeDetail, Error> {
        let url = self.endpoint(&["sweepstake", sweepstake_id])?;

        self.send_request::<SweepstakeDetail>(
            url,
            format!("sweepstake with id {} not found", sweepstake_id),
        )
        .await
    }
}

impl PlatformClient {
    /// Appends `segments` to the base url path, each percent-encoded as a single segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
