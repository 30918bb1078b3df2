use thiserror::Error;
use tracing::debug;

use crate::route::{OsrmRoute, OsrmRouteResponse};

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("{message}")]
    Service { code: String, message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("A route needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("No route found")]
    NoRoute,
}

pub struct OsrmRouteClientParams {
    pub osrm_url: String,
    pub profile: String,
}

pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/";

pub struct OsrmRouteClient {
    params: OsrmRouteClientParams,
    client: reqwest::Client,
}

impl OsrmRouteClient {
    pub fn new(params: OsrmRouteClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub fn route_url<P>(&self, points: &[P]) -> String
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push_str(&self.params.profile);
        url.push('/');

        for (i, point) in points.iter().enumerate() {
            let point: geo_types::Point = point.into();
            url.push_str(&format!("{},{}", point.x(), point.y()));

            if i < points.len() - 1 {
                url.push(';');
            }
        }

        url
    }

    /// Candidate routes through `points` in order, best candidate first.
    pub async fn fetch_routes<P>(&self, points: &[P]) -> Result<Vec<OsrmRoute>, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(OsrmError::TooFewPoints(points.len()));
        }

        let url = self.route_url(points);
        debug!("OsrmRouteClient: GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        match parse_route_response(bytes.as_ref()) {
            Err(OsrmError::Deserialize(_)) if !status.is_success() => Err(OsrmError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            result => result,
        }
    }
}

/// OSRM reports failures in the body, with a non-`Ok` code and a message.
pub fn parse_route_response(body: &[u8]) -> Result<Vec<OsrmRoute>, OsrmError> {
    let response: OsrmRouteResponse = serde_json::from_slice(body)?;

    if response.code != "Ok" {
        let message = response
            .message
            .unwrap_or_else(|| format!("Routing failed with code {}", response.code));
        return Err(OsrmError::Service {
            code: response.code,
            message,
        });
    }

    if response.routes.is_empty() {
        return Err(OsrmError::NoRoute);
    }

    Ok(response.routes)
}
