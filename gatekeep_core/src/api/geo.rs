use super::error::{self, Error};
use crate::ActivityEntry;
use serde::{Deserialize, Serialize};
use url::Url;

/// What an ipinfo-compatible lookup service tells us about the caller.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Resp {
    /// Public IP address
    pub ip: Option<String>,

    /// Reverse DNS name of the IP
    pub hostname: Option<String>,

    /// City name
    pub city: Option<String>,

    /// Region or state
    pub region: Option<String>,

    /// Two-letter country code
    pub country: Option<String>,

    /// Latitude and longitude, as `"lat,long"`
    pub loc: Option<String>,

    /// Network operator, e.g. `"AS15169 Google LLC"`
    pub org: Option<String>,

    /// Postal code
    pub postal: Option<String>,

    /// IANA time zone name
    pub timezone: Option<String>,
}

impl From<Resp> for ActivityEntry {
    fn from(resp: Resp) -> Self {
        Self {
            city: resp.city,
            ip_address: resp.ip,
            region: resp.region,
            country: resp.country,
            postal: resp.postal,
            org: resp.org,
            location: resp.loc,
            timezone: resp.timezone,
            hostname: resp.hostname,
        }
    }
}

/// Where the lookup endpoint lives, relative to the service root.
pub const PATH: &str = "/json";

/// Ask the lookup service where we are.
///
/// ## Errors
///
/// `Error::UrlParse` if `service` is not a URL, `Error::Http` if the service
/// can't be reached or sends something other than JSON, and `Error::Server`
/// for any non-success status (we don't get to interpret a third party's
/// rejections.)
pub async fn lookup(
    client: &reqwest::Client,
    service: &str,
    token: Option<&str>,
) -> error::Result<Resp> {
    let mut url = Url::parse(service)?.join(PATH)?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Server);
    }

    Ok(resp.json().await?)
}
