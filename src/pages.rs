use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::confirm::OverwritePolicy;
use crate::deck::Deck;
use crate::error::CompileError;
use crate::imagemagick;
use crate::store::ImageStore;

/// Cards per printed page (3x3 grid).
pub const CARDS_PER_PAGE: usize = 9;

/// One cache path per physical copy, in deck order. Cards that never made
/// it into the cache are left off the pages.
pub fn card_copies(deck: &Deck, store: &ImageStore) -> Vec<PathBuf> {
    let mut copies = Vec::new();
    for entry in deck.entries() {
        if !store.contains(&entry.name) {
            warn!("Leaving {} off the pages: no cached image", entry.name);
            continue;
        }
        let path = store.path_for(&entry.name);
        for _ in 0..entry.count {
            copies.push(path.clone());
        }
    }
    copies
}

pub fn page_count(copies: usize) -> usize {
    copies.div_ceil(CARDS_PER_PAGE)
}

fn page_path(prefix: &str, index: usize, format: &str) -> PathBuf {
    PathBuf::from(format!("{}{}.{}", prefix, index, format))
}

/// Montage the copies into numbered page images, nine per page, the last
/// page holding whatever remains.
pub fn compose(
    copies: &[PathBuf],
    prefix: &str,
    format: &str,
    card_size: (u32, u32),
    policy: &OverwritePolicy,
) -> Result<Vec<PathBuf>, CompileError> {
    let mut pages = Vec::new();
    for (index, chunk) in copies.chunks(CARDS_PER_PAGE).enumerate() {
        let output = page_path(prefix, index, format);
        policy.check(&output)?;
        imagemagick::montage3x3(chunk, card_size, &output)?;
        pages.push(output);
    }
    Ok(pages)
}

/// Merge the page images into one PDF and, unless asked to keep them,
/// remove the intermediates.
pub fn merge(
    pages: &[PathBuf],
    target: &Path,
    keep_pages: bool,
    policy: &OverwritePolicy,
) -> Result<PathBuf, CompileError> {
    let target = pdf_target(target);
    policy.check(&target)?;
    imagemagick::merge_to_pdf(pages, &target)?;
    if !keep_pages {
        for page in pages {
            if let Err(err) = fs::remove_file(page) {
                warn!("Could not remove {}: {}", page.display(), err);
            }
        }
    }
    Ok(target)
}

fn pdf_target(target: &Path) -> PathBuf {
    match target.extension() {
        Some(ext) if ext == "pdf" => target.to_path_buf(),
        _ => {
            let mut with_ext = target.as_os_str().to_owned();
            with_ext.push(".pdf");
            PathBuf::from(with_ext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_cards_fill_exactly_one_page() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(9), 1);
        assert_eq!(page_count(10), 2);
        assert_eq!(page_count(18), 2);
        assert_eq!(page_count(19), 3);
    }

    #[test]
    fn copies_repeat_in_deck_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        store.write("Forest", b"a", &OverwritePolicy::Allow).unwrap();
        store.write("Island", b"b", &OverwritePolicy::Allow).unwrap();
        let deck = Deck::parse("2 Forest\n1 Island\n").unwrap();
        let copies = card_copies(&deck, &store);
        assert_eq!(
            copies,
            vec![
                store.path_for("Forest"),
                store.path_for("Forest"),
                store.path_for("Island"),
            ]
        );
    }

    #[test]
    fn uncached_cards_are_left_off() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        store.write("Forest", b"a", &OverwritePolicy::Allow).unwrap();
        let deck = Deck::parse("1 Missing Card\n3 Forest\n").unwrap();
        let copies = card_copies(&deck, &store);
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|path| path == &store.path_for("Forest")));
    }

    #[test]
    fn the_last_page_holds_the_remainder() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        store.write("Forest", b"a", &OverwritePolicy::Allow).unwrap();
        let deck = Deck::parse("10 Forest\n").unwrap();
        let copies = card_copies(&deck, &store);
        let chunks: Vec<usize> = copies
            .chunks(CARDS_PER_PAGE)
            .map(|chunk| chunk.len())
            .collect();
        assert_eq!(chunks, vec![9, 1]);
    }

    #[test]
    fn page_files_are_prefix_index_format() {
        assert_eq!(
            page_path("deck-", 0, "png"),
            PathBuf::from("deck-0.png")
        );
        assert_eq!(
            page_path("deck-", 11, "jpg"),
            PathBuf::from("deck-11.jpg")
        );
    }

    #[test]
    fn merge_target_gains_a_pdf_extension_when_missing() {
        assert_eq!(pdf_target(Path::new("out")), PathBuf::from("out.pdf"));
        assert_eq!(pdf_target(Path::new("out.pdf")), PathBuf::from("out.pdf"));
        assert_eq!(
            pdf_target(Path::new("deck.final")),
            PathBuf::from("deck.final.pdf")
        );
    }
}
