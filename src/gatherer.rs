use reqwest::blocking::Client;
use url::Url;

use crate::error::ResolveError;
use crate::resolver::{Resolution, Resolver};

const SEARCH_ENDPOINT: &str = "http://gatherer.wizards.com/Pages/Search/Default.aspx";
const IMAGE_ENDPOINT: &str = "http://gatherer.wizards.com/Handlers/Image.ashx";

pub struct Gatherer;

impl Gatherer {
    fn search_url(card: &str) -> String {
        format!("{}?name=+[{}]", SEARCH_ENDPOINT, urlencoding::encode(card))
    }

    /// A name search with a single hit redirects to the card details page,
    /// which carries the multiverse id in its query string.
    fn multiverse_id(final_url: &Url) -> Option<String> {
        final_url
            .query_pairs()
            .find(|(key, _)| key == "multiverseid")
            .map(|(_, id)| id.into_owned())
    }

    fn image_url(multiverse_id: &str) -> String {
        format!("{}?multiverseid={}&type=card", IMAGE_ENDPOINT, multiverse_id)
    }
}

impl Resolver for Gatherer {
    fn name(&self) -> &'static str {
        "Gatherer"
    }

    fn resolve(&self, client: &Client, card: &str) -> Result<Resolution, ResolveError> {
        let url = Self::search_url(card);
        let response = client
            .get(&url)
            .send()
            .map_err(|source| ResolveError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status { url, status });
        }
        match Self::multiverse_id(response.url()) {
            Some(id) => Ok(Resolution::Url(Self::image_url(&id))),
            None => Err(ResolveError::NotFound {
                source_name: self.name(),
                card: card.to_string(),
            }),
        }
    }
}
