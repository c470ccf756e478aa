//! Pre-flight authorization handshake.
//!
//! Every mutating call is preceded by a POST that hands back a short-lived
//! authorization key in a `{msg, data}` envelope plus a set of cookies.
//! Key and cookies are a matched pair valid for exactly one operation:
//! they are never cached or shared across calls.

use log::debug;

use crate::error::ClientError;
use crate::forms::FieldPairs;
use crate::response::KeyEnvelope;
use crate::session::{CookieSet, Session};

/// The single-use result of one handshake.
#[derive(Debug)]
pub(crate) struct Handshake {
    pub key: String,
    pub cookies: CookieSet,
}

impl Session {
    pub(crate) async fn authorize(
        &self,
        fields: FieldPairs,
        url: &str,
    ) -> Result<Handshake, ClientError> {
        let resp = self.post_form(url, &fields, None).await?;

        let cookies: CookieSet = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|line| {
                let pair = line.split(';').next()?;
                let (k, v) = pair.split_once('=')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .collect();

        let body = resp.text().await?;
        let key = KeyEnvelope::parse(&body)?
            .data
            .ok_or(ClientError::AuthKeyMissing)?;
        debug!("handshake ok: {} cookies", cookies.len());
        Ok(Handshake { key, cookies })
    }
}
