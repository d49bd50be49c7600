use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use super::{scrape, Download, SubtitleSite};
use crate::domain::models::{MediaMetadata, RawCandidate};
use crate::error::{Error, Result};

pub const BASE_URL: &str = "https://www.legendasdivx.pt";
const LOGIN_URL: &str = "https://www.legendasdivx.pt/forum/ucp.php?mode=login";
const SEARCH_URL: &str = "https://www.legendasdivx.pt/modules.php?name=Downloads&d_op=search";
const CLEAR_SESSION_URL: &str = "https://www.legendasdivx.pt/sair.php?referer=login";

const SESSION_COOKIE: &str = "PHPSESSID";
const SID_COOKIE: &str = "phpbb3_2z8zs_sid";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for legendasdivx.pt. Call [`LegendasDivxClient::login`] before searching.
#[derive(Debug)]
pub struct LegendasDivxClient {
    // login requests must not follow redirects, search and download do
    session: Client,
    http: Client,
    jar: Arc<Jar>,
}

impl LegendasDivxClient {
    pub fn new() -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let builder = || {
            Client::builder()
                .cookie_provider(Arc::clone(&jar))
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(60))
        };
        let session = builder().redirect(Policy::none()).build()?;
        let http = builder().build()?;
        Ok(Self { session, http, jar })
    }

    /// Two-step login: fetch a fresh session, then post the credentials.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        self.clear_session()?;
        self.login_stage(username, password)?;
        info!(username, "Logged in");
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let response = self.session.get(CLEAR_SESSION_URL).send()?;
        check_login_status(response.status()).map_err(Error::Login)?;

        if self.cookie(SESSION_COOKIE).is_none() {
            return Err(Error::Login(format!("no {SESSION_COOKIE} cookie received")));
        }
        Ok(())
    }

    fn login_stage(&self, username: &str, password: &str) -> Result<()> {
        let sid = self.cookie(SID_COOKIE).unwrap_or_default();
        let form = [
            ("username", username),
            ("password", password),
            ("redirect", "./ucp.php?mode=login"),
            ("sid", sid.as_str()),
            ("redirect", "index.php"),
            ("login", "Ligue-se"),
        ];

        let response = self.session.post(LOGIN_URL).form(&form).send()?;
        check_login_status(response.status()).map_err(Error::Login)?;

        match self.cookie(SID_COOKIE).as_deref() {
            None | Some("") | Some("1") => Err(Error::Login("credentials rejected".to_string())),
            Some(_) => Ok(()),
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let url = Url::parse(LOGIN_URL).ok()?;
        let header = self.jar.cookies(&url)?;
        cookie_value(header.to_str().ok()?, name).map(str::to_string)
    }
}

impl SubtitleSite for LegendasDivxClient {
    fn search(&self, metadata: &MediaMetadata) -> Result<Vec<RawCandidate>> {
        let query = build_query(metadata);
        let url = Url::parse_with_params(SEARCH_URL, &[("query", query.as_str())])
            .map_err(|e| Error::Search(e.to_string()))?;
        debug!(%query, %url, movie = metadata.is_movie(), "Searching");

        let response = self.http.get(url).send()?;
        debug!(status = %response.status(), "Search response");
        check_status(response.status()).map_err(Error::Search)?;

        let html = response.text()?;
        Ok(scrape::parse_candidates(&html))
    }

    fn download(&self, url: &str) -> Result<Download> {
        let url = absolute_url(url).map_err(|e| Error::Download(e.to_string()))?;
        let response = self.http.get(url).send()?;
        check_status(response.status()).map_err(Error::Download)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes()?.to_vec();
        debug!(%content_type, size = bytes.len(), "Downloaded");

        Ok(Download {
            content_type,
            bytes,
        })
    }
}

fn check_status(status: StatusCode) -> std::result::Result<(), String> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(format!("response status {status}"))
    }
}

// The login endpoints answer with a redirect on success.
fn check_login_status(status: StatusCode) -> std::result::Result<(), String> {
    if status == StatusCode::FOUND {
        Ok(())
    } else {
        check_status(status)
    }
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub fn build_query(metadata: &MediaMetadata) -> String {
    metadata
        .short_title
        .split(' ')
        .chain(std::iter::once(metadata.year_or_episode()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves a download link from the results page against the site root.
pub fn absolute_url(url: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(BASE_URL)?.join(url)
}
