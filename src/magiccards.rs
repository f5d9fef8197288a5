use regex::Regex;
use reqwest::blocking::Client;
use url::Url;

use crate::error::ResolveError;
use crate::resolver::{Resolution, Resolver};

const ORIGIN: &str = "https://magiccards.info";

pub struct MagicCards;

impl MagicCards {
    fn search_url(card: &str) -> String {
        format!("{}/query?q={}&v=card&s=cname", ORIGIN, card.replace(' ', "+"))
    }

    /// First image on the result page whose alt text is exactly the card
    /// name wins.
    fn image_url_from_page(page: &str, card: &str) -> Option<String> {
        let pattern = format!(r#"img\s+src="([^"]+)"\s+alt="{}""#, regex::escape(card));
        let re = Regex::new(&pattern).unwrap();
        re.captures(page).map(|caps| caps[1].to_string())
    }

    /// Scan URLs on the page are usually relative.
    fn absolute(src: &str) -> Option<String> {
        let base = Url::parse(ORIGIN).unwrap();
        base.join(src).ok().map(|url| url.to_string())
    }
}

impl Resolver for MagicCards {
    fn name(&self) -> &'static str {
        "magiccards.info"
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
        let page = response.text().map_err(|source| ResolveError::Transport {
            url: url.clone(),
            source,
        })?;
        Self::image_url_from_page(&page, card)
            .and_then(|src| Self::absolute(&src))
            .map(Resolution::Url)
            .ok_or_else(|| ResolveError::NotFound {
                source_name: self.name(),
                card: card.to_string(),
            })
    }
}
