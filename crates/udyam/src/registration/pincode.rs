use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a successful directory lookup resolves to. `city` carries the
/// upstream district name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLocality {
    pub state: String,
    pub city: String,
}

/// Lookup failures are confined to these two kinds so callers can decide
/// whether to surface or silently ignore them. Nothing panics across this
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum PinLookupError {
    #[error("PIN not found")]
    NotFound,
    #[error("PIN lookup failed")]
    Upstream(#[source] Option<reqwest::Error>),
}

/// Seam over the external postal-code directory so tests and the wizard can
/// run against an in-memory implementation.
#[async_trait]
pub trait PinDirectory: Send + Sync {
    async fn resolve(&self, pin_code: &str) -> Result<PinLocality, PinLookupError>;
}

/// Shape of one entry in the postal directory's response array.
#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice")]
    post_offices: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "State")]
    state: Option<String>,
    #[serde(rename = "District")]
    district: Option<String>,
}

/// Map the upstream response body to a locality. The directory answers with a
/// one-element array whose `Status` is `"Success"` when the code exists.
fn locality_from_entries(entries: Vec<DirectoryEntry>) -> Result<PinLocality, PinLookupError> {
    let entry = entries.into_iter().next().ok_or(PinLookupError::NotFound)?;
    if entry.status != "Success" {
        return Err(PinLookupError::NotFound);
    }

    let office = entry
        .post_offices
        .and_then(|offices| offices.into_iter().next())
        .ok_or(PinLookupError::NotFound)?;

    Ok(PinLocality {
        state: office.state.unwrap_or_default(),
        city: office.district.unwrap_or_default(),
    })
}

/// Live directory client forwarding to `<base>/pincode/<code>`.
pub struct HttpPinDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPinDirectory {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl PinDirectory for HttpPinDirectory {
    async fn resolve(&self, pin_code: &str) -> Result<PinLocality, PinLookupError> {
        let url = format!("{}/pincode/{}", self.base_url, pin_code);
        debug!(%pin_code, "resolving pin code upstream");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| PinLookupError::Upstream(Some(err)))?;

        if !response.status().is_success() {
            return Err(PinLookupError::Upstream(None));
        }

        let entries: Vec<DirectoryEntry> = response
            .json()
            .await
            .map_err(|err| PinLookupError::Upstream(Some(err)))?;

        locality_from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<DirectoryEntry> {
        serde_json::from_str(raw).expect("valid directory json")
    }

    #[test]
    fn maps_first_post_office_to_state_and_district() {
        let entries = parse(
            r#"[{"Status":"Success","PostOffice":[
                {"State":"Maharashtra","District":"Pune"},
                {"State":"Maharashtra","District":"Elsewhere"}
            ]}]"#,
        );
        let locality = locality_from_entries(entries).expect("resolves");
        assert_eq!(locality.state, "Maharashtra");
        assert_eq!(locality.city, "Pune");
    }

    #[test]
    fn error_status_maps_to_not_found() {
        let entries = parse(r#"[{"Status":"Error","PostOffice":null}]"#);
        assert!(matches!(
            locality_from_entries(entries),
            Err(PinLookupError::NotFound)
        ));
    }

    #[test]
    fn empty_body_and_missing_offices_map_to_not_found() {
        assert!(matches!(
            locality_from_entries(Vec::new()),
            Err(PinLookupError::NotFound)
        ));

        let entries = parse(r#"[{"Status":"Success","PostOffice":[]}]"#);
        assert!(matches!(
            locality_from_entries(entries),
            Err(PinLookupError::NotFound)
        ));
    }
}
