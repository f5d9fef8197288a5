use indicatif::ProgressBar;
use reqwest::blocking::Client;
use tracing::{error, info, warn};

use crate::confirm::OverwritePolicy;
use crate::deck::Deck;
use crate::error::{CompileError, ResolveError};
use crate::imagemagick;
use crate::resolver::{Resolution, Resolver};
use crate::store::ImageStore;

/// What happened to each unique card over one run.
#[derive(Default)]
pub struct Summary {
    pub cached: usize,
    pub downloaded: usize,
    pub failed: Vec<String>,
}

pub struct Pipeline<'a> {
    client: &'a Client,
    store: &'a ImageStore,
    resolvers: Vec<Box<dyn Resolver>>,
    policy: &'a OverwritePolicy,
    card_size: (u32, u32),
}

impl<'a> Pipeline<'a> {
    pub fn new(
        client: &'a Client,
        store: &'a ImageStore,
        resolvers: Vec<Box<dyn Resolver>>,
        policy: &'a OverwritePolicy,
        card_size: (u32, u32),
    ) -> Self {
        Pipeline {
            client,
            store,
            resolvers,
            policy,
            card_size,
        }
    }

    /// Fetch every unique card in the deck, skipping cache hits. A card
    /// that cannot be fetched is logged and left out; only an overwrite
    /// refusal or an IO failure aborts the run.
    pub fn run(&self, deck: &Deck) -> Result<Summary, CompileError> {
        let mut summary = Summary::default();
        let progress = ProgressBar::new(deck.entries().len() as u64);
        for entry in deck.entries() {
            let card = entry.name.as_str();
            if self.store.contains(card) {
                info!("Found cached: {}", card);
                summary.cached += 1;
                progress.inc(1);
                continue;
            }
            info!("Downloading: {}", card);
            match self.acquire(card) {
                Some(bytes) => {
                    let path = self.store.write(card, &bytes, self.policy)?;
                    let (width, height) = self.card_size;
                    // Cached images are assumed normalized, so this runs on
                    // every fresh download and never on a hit
                    if let Err(err) = imagemagick::resize(&path, width, height) {
                        warn!("Could not resize {}: {}", path.display(), err);
                    }
                    summary.downloaded += 1;
                }
                None => {
                    error!("No source could provide an image for {}", card);
                    summary.failed.push(card.to_string());
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        Ok(summary)
    }

    /// Try each source in order; the first usable answer wins.
    fn acquire(&self, card: &str) -> Option<Vec<u8>> {
        for resolver in &self.resolvers {
            match resolver.resolve(self.client, card) {
                Ok(Resolution::Bytes(bytes)) => return Some(bytes),
                Ok(Resolution::Url(url)) => {
                    // One fetch per resolved URL; a dud URL abandons the card
                    match self.store.fetch_bytes(self.client, &url) {
                        Ok(bytes) => return Some(bytes),
                        Err(err) => {
                            error!("Fetching {} for {} failed: {}", url, card, err);
                            return None;
                        }
                    }
                }
                Err(err @ ResolveError::NotFound { .. }) => {
                    info!("{}", err);
                }
                Err(err) => {
                    warn!("{} lookup for {} failed: {}", resolver.name(), card, err);
                }
            }
        }
        None
    }
}
