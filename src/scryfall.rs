use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::ResolveError;
use crate::resolver::{Resolution, Resolver};

const NAMED_ENDPOINT: &str = "https://api.scryfall.com/cards/named";

/// Error body the API returns for failed lookups.
#[derive(Deserialize)]
struct ApiError {
    code: String,
}

pub struct Scryfall;

impl Scryfall {
    fn lookup_url(card: &str) -> String {
        format!(
            "{}?exact={}&format=image",
            NAMED_ENDPOINT,
            urlencoding::encode(card)
        )
    }
}

impl Resolver for Scryfall {
    fn name(&self) -> &'static str {
        "Scryfall"
    }

    fn resolve(&self, client: &Client, card: &str) -> Result<Resolution, ResolveError> {
        let url = Self::lookup_url(card);
        let response = client
            .get(&url)
            .send()
            .map_err(|source| ResolveError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .map_err(|source| ResolveError::Transport {
                    url: url.clone(),
                    source,
                })?;
            if bytes.is_empty() {
                return Err(ResolveError::EmptyBody { url });
            }
            return Ok(Resolution::Bytes(bytes.to_vec()));
        }
        // Misses come back as a JSON error object, not a bare 404
        let body = response.text().unwrap_or_default();
        if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
            if api_error.code == "not_found" {
                return Err(ResolveError::NotFound {
                    source_name: self.name(),
                    card: card.to_string(),
                });
            }
        }
        Err(ResolveError::Status { url, status })
    }
}
