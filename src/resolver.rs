use reqwest::blocking::Client;

use crate::error::ResolveError;
use crate::gatherer::Gatherer;
use crate::magiccards::MagicCards;
use crate::scryfall::Scryfall;

/// What a source hands back for a card: the image itself, or a URL to
/// fetch it from.
pub enum Resolution {
    Bytes(Vec<u8>),
    Url(String),
}

pub trait Resolver {
    fn name(&self) -> &'static str;

    fn resolve(&self, client: &Client, card: &str) -> Result<Resolution, ResolveError>;
}

/// Sources in the order they are tried.
pub fn default_chain() -> Vec<Box<dyn Resolver>> {
    vec![Box::new(Scryfall), Box::new(MagicCards), Box::new(Gatherer)]
}
