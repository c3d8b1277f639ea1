//! Authenticated REST client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::{Client, Request, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::ServerConfig;
use crate::error::{ApiError, Result};
use crate::model::{
    DataElements, DataValueSet, ImportReport, ImportSummary, Metadata, OrganisationUnits, User,
};
use crate::{
    ANALYTICS_ENDPOINT, DATA_ELEMENTS_ENDPOINT, DATA_VALUE_SETS_ENDPOINT, ME_ENDPOINT,
    METADATA_ENDPOINT, ORGANISATION_UNITS_ENDPOINT,
};

/// Query appended to every request, before per-call parameters.
pub const GLOBAL_QUERY: &[(&str, &str)] = &[("paging", "false"), ("skipPaging", "true")];

/// Builds the `Authorization` header value for basic authentication.
#[must_use]
pub fn basic_authorization(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Endpoint relative to the server.
    pub endpoint: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into [`ApiError::Http`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                endpoint: self.endpoint,
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Deserializes the body, mapping shape mismatches to
    /// [`ApiError::MalformedResponse`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::malformed(&self.endpoint, &e))
    }
}

/// Blocking client bound to one DHIS2 server and user.
#[derive(Debug, Clone)]
pub struct Dhis2Client {
    http: Client,
    server: String,
    authorization: HeaderValue,
}

impl Dhis2Client {
    /// Creates a client for the configured server.
    ///
    /// Every request carries `Accept: application/json` and the basic-auth
    /// header built from the configured credentials.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Url::parse(&config.server).map_err(|e| ApiError::InvalidUrl {
            url: config.server.clone(),
            message: e.to_string(),
        })?;

        let mut authorization =
            HeaderValue::from_str(&basic_authorization(&config.username, &config.password))
                .map_err(|e| ApiError::ConfigParse(format!("invalid credentials: {e}")))?;
        authorization.set_sensitive(true);

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::transport(&config.server, &e))?;

        Ok(Self {
            http,
            server: config.server.clone(),
            authorization,
        })
    }

    /// Base URL of the server.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Resolves `endpoint` against the server and appends the global and
    /// per-call query parameters.
    pub fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}/{}", self.server, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .extend_pairs(GLOBAL_QUERY)
            .extend_pairs(query);
        Ok(url)
    }

    /// Builds a request without sending it.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
    ) -> Result<Request> {
        self.request(method, endpoint, body, query)?
            .build()
            .map_err(|e| ApiError::transport(endpoint, &e))
    }

    fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint, query)?;
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, self.authorization.clone());
        Ok(match body {
            Some(body) => builder.json(body),
            None => builder,
        })
    }

    fn execute(&self, endpoint: &str, builder: RequestBuilder) -> Result<ApiResponse> {
        let response = builder
            .send()
            .map_err(|e| ApiError::transport(endpoint, &e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ApiError::transport(endpoint, &e))?;
        tracing::debug!(endpoint, status, bytes = body.len(), "response received");
        Ok(ApiResponse {
            endpoint: endpoint.to_string(),
            status,
            body,
        })
    }

    fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        tracing::debug!(%method, endpoint, "sending request");
        let builder = self.request(method, endpoint, body, query)?;
        self.execute(endpoint, builder)?.error_for_status()
    }

    /// GET `endpoint`.
    pub fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.send::<Value>(Method::GET, endpoint, None, query)
    }

    /// POST `body` as JSON to `endpoint`.
    pub fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.send(Method::POST, endpoint, Some(body), query)
    }

    /// PUT `body` as JSON to `endpoint`.
    pub fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.send(Method::PUT, endpoint, Some(body), query)
    }

    /// PATCH `body` as JSON to `endpoint`.
    pub fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.send(Method::PATCH, endpoint, Some(body), query)
    }

    /// DELETE `endpoint`.
    pub fn delete(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.send::<Value>(Method::DELETE, endpoint, None, query)
    }

    /// Fetches the authenticated user.
    pub fn me(&self) -> Result<User> {
        self.get(ME_ENDPOINT, &[])?.json()
    }

    /// Replaces the authenticated user's record.
    pub fn update_me(&self, user: &User) -> Result<()> {
        self.put(ME_ENDPOINT, user, &[])?;
        Ok(())
    }

    /// Posts a metadata payload and returns the import report.
    ///
    /// A rejected import is still returned as a report when the server
    /// answers with one, whatever the HTTP status.
    pub fn post_metadata(&self, metadata: &Metadata) -> Result<ImportReport> {
        let builder = self.request(Method::POST, METADATA_ENDPOINT, Some(metadata), &[])?;
        let response = self.execute(METADATA_ENDPOINT, builder)?;
        match response.json::<ImportReport>() {
            Ok(report) => Ok(report),
            Err(err) if response.is_success() => Err(err),
            Err(_) => Err(response
                .error_for_status()
                .err()
                .unwrap_or_else(|| ApiError::MalformedResponse {
                    endpoint: METADATA_ENDPOINT.to_string(),
                    message: "missing import report".to_string(),
                })),
        }
    }

    /// Lists org units matching `query`.
    pub fn organisation_units<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let page: OrganisationUnits<T> = self.get(ORGANISATION_UNITS_ENDPOINT, query)?.json()?;
        Ok(page.organisation_units)
    }

    /// Lists data elements matching `query`.
    pub fn data_elements<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let page: DataElements<T> = self.get(DATA_ELEMENTS_ENDPOINT, query)?.json()?;
        Ok(page.data_elements)
    }

    /// Imports a batch of data values.
    pub fn post_data_value_set(
        &self,
        set: &DataValueSet,
        preheat_cache: bool,
    ) -> Result<ImportSummary> {
        let query: &[(&str, &str)] = if preheat_cache {
            &[("preheatCache", "true")]
        } else {
            &[]
        };
        self.post(DATA_VALUE_SETS_ENDPOINT, set, query)?.json()
    }

    /// Requests an analytics table rebuild. The server runs it in the
    /// background; this returns once the request is accepted.
    pub fn run_analytics(&self) -> Result<()> {
        self.post(ANALYTICS_ENDPOINT, &Map::<String, Value>::new(), &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        assert_eq!(
            basic_authorization("admin", "district"),
            "Basic YWRtaW46ZGlzdHJpY3Q="
        );
    }

    #[test]
    fn test_client_creation() {
        let config = ServerConfig::new("https://play.dhis2.org/demo", "admin", "district");
        assert!(Dhis2Client::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_server_rejected() {
        let config = ServerConfig::new("not a url", "admin", "district");
        let err = Dhis2Client::new(&config).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_error_for_status() {
        let ok = ApiResponse {
            endpoint: "api/27/me".to_string(),
            status: 200,
            body: "{}".to_string(),
        };
        assert!(ok.error_for_status().is_ok());

        let denied = ApiResponse {
            endpoint: "api/27/me".to_string(),
            status: 401,
            body: "Unauthorized".to_string(),
        };
        match denied.error_for_status() {
            Err(ApiError::Http { status, body, .. }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_shape_mismatch_is_malformed() {
        let response = ApiResponse {
            endpoint: "api/organisationUnits".to_string(),
            status: 200,
            body: r#"{"pager": {}}"#.to_string(),
        };
        let err = response
            .json::<OrganisationUnits<crate::model::CodedRef>>()
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }
}
