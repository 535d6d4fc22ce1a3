use super::auth::AccessToken;
use super::constants::{self, USER_SELECT, headers};
use super::models::UserCollection;
use super::paging::{Page, PageRequest, PagedLister};
use crate::config::{Config, keys};
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use secrecy::ExposeSecret;

/// Build the blocking HTTP client shared by the token and directory calls.
///
/// `proxy` is a proxy URL for all traffic, `none` to ignore system proxy
/// settings, or `None` to keep reqwest's defaults.
pub fn build_http_client(proxy: Option<&str>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(constants::user_agent());
    match proxy.map(str::trim) {
        None | Some("") => {}
        Some(p) if p.eq_ignore_ascii_case("none") => builder = builder.no_proxy(),
        Some(p) => builder = builder.proxy(reqwest::Proxy::all(p)?),
    }
    builder.build()
}

/// Microsoft Graph user directory
pub struct GraphDirectory {
    users_url: Url,
    http_client: Client,
}

impl GraphDirectory {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = build_http_client(None)
            .map_err(|e| Error::transport("Failed to build HTTP client", e))?;
        Self::with_custom_client(base_url, http_client)
    }

    /// Create a directory client on top of a preconfigured HTTP client
    pub fn with_custom_client(base_url: &str, http_client: Client) -> Result<Self> {
        let endpoint = constants::users_endpoint(base_url);
        let mut users_url = Url::parse(&endpoint).map_err(|e| {
            Error::transport(format!("Invalid directory URL '{}'", endpoint), e)
        })?;
        users_url.query_pairs_mut().append_pair("$select", USER_SELECT);

        Ok(Self {
            users_url,
            http_client,
        })
    }

    pub fn from_config(config: &Config, http_client: Client) -> Result<Self> {
        Self::with_custom_client(config.resolve(keys::GRAPH_BASE_URL)?, http_client)
    }
}

impl PagedLister for GraphDirectory {
    fn first_page(&self) -> PageRequest {
        PageRequest::new(self.users_url.clone())
    }

    fn fetch_page(&self, token: &AccessToken, request: &PageRequest) -> Result<Page> {
        let url = request.url();
        debug!("Fetching directory page: {}", url);

        let response = self
            .http_client
            .get(url.clone())
            .header(headers::AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON)
            .send()
            .map_err(|e| Error::transport(format!("GET {} failed", url), e))?;

        let status = response.status();
        debug!("Directory response status: {}", status);

        let body = response
            .text()
            .map_err(|e| Error::transport(format!("Failed to read response from {}", url), e))?;

        if status != StatusCode::OK {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let collection = UserCollection::from_json(&body).map_err(|e| {
            Error::transport(format!("Malformed user collection from {}", url), e)
        })?;

        let next = match collection.next_link {
            Some(link) => Some(PageRequest::new(Url::parse(&link).map_err(|e| {
                Error::transport(format!("Invalid next page link '{}'", link), e)
            })?)),
            None => None,
        };

        Ok(Page {
            entries: collection.value,
            next,
        })
    }
}
