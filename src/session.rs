//! Session and transport plumbing.
//!
//! A [`Session`] is the capability object every operation takes: it owns
//! the `reqwest::Client` (one uniform timeout, optional proxy), the
//! credentials, the `app_id` the mobile API expects on read calls, and the
//! endpoint table. It has no per-call state; cancellation and timeouts are
//! entirely the transport's business.

use std::time::Duration;

use log::debug;
use reqwest::multipart;
use reqwest::{Client, Proxy, Response};
use serde::de::DeserializeOwned;

use crate::api::Endpoints;
use crate::error::ClientError;
use crate::response::parse_validated;

const USER_AGENT: &str = concat!("dcgall/", env!("CARGO_PKG_VERSION"));
const DEFAULT_APP_ID: &str = "dcgall";

/// Cookies captured from a handshake, replayed verbatim on the paired
/// mutating call.
pub(crate) type CookieSet = Vec<(String, String)>;

#[derive(Debug, Clone)]
enum SessionKind {
    /// Nomember session: local nickname/password pair, no account.
    Guest { nick: String, password: String },
    /// Registered account. Only read operations are supported for members;
    /// the deleter rejects member sessions outright.
    Member { id: String, password: String },
}

/// Authentication plus transport state, supplied to every operation.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    kind: SessionKind,
    app_id: String,
    endpoints: Endpoints,
}

impl Session {
    /// Nomember session with default transport settings.
    pub fn guest(nick: &str, password: &str) -> Result<Self, ClientError> {
        Self::builder().guest(nick, password).build()
    }

    /// Member session. Carries the account credentials but performs no
    /// login call; login management lives outside this crate.
    pub fn member(id: &str, password: &str) -> Result<Self, ClientError> {
        Self::builder().member(id, password).build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.kind, SessionKind::Guest { .. })
    }

    /// Display name / password pair used when signing content.
    pub(crate) fn credentials(&self) -> (&str, &str) {
        match &self.kind {
            SessionKind::Guest { nick, password } => (nick, password),
            SessionKind::Member { id, password } => (id, password),
        }
    }

    pub(crate) fn app_id(&self) -> &str {
        &self.app_id
    }

    pub(crate) fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Plain GET, failing on non-success status.
    pub(crate) async fn get_raw(&self, url: &str) -> Result<Response, ClientError> {
        debug!("GET {url}");
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp)
    }

    /// GET with query pairs, validated against the result envelope and
    /// deserialized into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        debug!("GET {url} {query:?}");
        let body = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_validated(&body)
    }

    /// URL-encoded POST, with the handshake cookie set attached when given.
    pub(crate) async fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
        cookies: Option<&CookieSet>,
    ) -> Result<Response, ClientError> {
        debug!("POST {url}");
        let mut req = self.client.post(url).form(fields);
        if let Some(jar) = cookies {
            req = req.header(reqwest::header::COOKIE, join_cookies(jar));
        }
        Ok(req.send().await?.error_for_status()?)
    }

    /// Multipart POST, with the handshake cookie set attached when given.
    pub(crate) async fn post_multipart(
        &self,
        url: &str,
        form: multipart::Form,
        cookies: Option<&CookieSet>,
    ) -> Result<Response, ClientError> {
        debug!("POST (multipart) {url}");
        let mut req = self.client.post(url).multipart(form);
        if let Some(jar) = cookies {
            req = req.header(reqwest::header::COOKIE, join_cookies(jar));
        }
        Ok(req.send().await?.error_for_status()?)
    }
}

fn join_cookies(jar: &CookieSet) -> String {
    jar.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builder for [`Session`]: credentials plus transport configuration.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    kind: Option<SessionKind>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    app_id: Option<String>,
    endpoints: Option<Endpoints>,
}

impl SessionBuilder {
    pub fn guest(mut self, nick: &str, password: &str) -> Self {
        self.kind = Some(SessionKind::Guest {
            nick: nick.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn member(mut self, id: &str, password: &str) -> Self {
        self.kind = Some(SessionKind::Member {
            id: id.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// One timeout applied uniformly to every call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Route all traffic through `url` (http or socks).
    pub fn proxy(mut self, url: &str) -> Self {
        self.proxy = Some(url.to_string());
        self
    }

    /// Override the `app_id` sent on read calls.
    pub fn app_id(mut self, app_id: &str) -> Self {
        self.app_id = Some(app_id.to_string());
        self
    }

    /// Point the session at a different endpoint table (embedders, tests).
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn build(self) -> Result<Session, ClientError> {
        let mut client = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        if let Some(proxy) = &self.proxy {
            client = client.proxy(Proxy::all(proxy)?);
        }
        Ok(Session {
            client: client.build()?,
            kind: self.kind.unwrap_or(SessionKind::Guest {
                nick: String::new(),
                password: String::new(),
            }),
            app_id: self.app_id.unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            endpoints: self.endpoints.unwrap_or_default(),
        })
    }
}
