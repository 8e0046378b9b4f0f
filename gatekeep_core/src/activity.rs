use serde::{Deserialize, Serialize};

/// A client's network and location context at some point in time. The
/// backend stores these as-is, so every field is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// City name
    pub city: Option<String>,

    /// Public IP address
    pub ip_address: Option<String>,

    /// Region or state
    pub region: Option<String>,

    /// Country code
    pub country: Option<String>,

    /// Postal code
    pub postal: Option<String>,

    /// Network operator
    pub org: Option<String>,

    /// Latitude and longitude, as `"lat,long"`
    pub location: Option<String>,

    /// IANA time zone name
    pub timezone: Option<String>,

    /// Reverse DNS name of the IP
    pub hostname: Option<String>,
}

impl ActivityEntry {
    /// A one-line description of where this entry came from, for display.
    pub fn place(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            "<unknown>".to_string()
        } else {
            parts.join(", ")
        }
    }
}
