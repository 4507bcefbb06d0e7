//! In-memory album store with single-flight lazy seeding
//!
//! The store owns the authoritative album collection. It seeds itself
//! exactly once before the first read completes: concurrent first callers
//! wait on the one in-flight seeding attempt instead of racing their own.
//! A failed attempt leaves the store unseeded so a later call can retry;
//! it can never end up half-seeded or seeded twice.

use std::collections::BTreeMap;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

use super::album::{Album, NewAlbum};
use crate::error::{Error, Result};

/// Produces the initial album set.
///
/// Boxed so callers can swap in a different source: a future dynamic
/// backing store, or a failing double in tests.
pub type SeedSource = Box<dyn Fn() -> Result<Vec<NewAlbum>> + Send + Sync>;

/// In-memory album store
pub struct CatalogStore {
    shelf: OnceCell<RwLock<Shelf>>,
    seed: SeedSource,
}

/// Seeded album collection.
///
/// Ids come from a monotonic counter, so BTreeMap iteration order is
/// insertion order.
#[derive(Debug)]
struct Shelf {
    albums: BTreeMap<i64, Album>,
    next_id: i64,
}

impl Shelf {
    fn new() -> Self {
        Self {
            albums: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, new: NewAlbum) -> Result<Album> {
        if new.title.trim().is_empty() {
            return Err(Error::InvalidInput("album title must not be empty".to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        let album = Album {
            id,
            title: new.title,
            catalog: new.catalog,
            cover_image: new.cover_image,
            release_date: new.release_date,
            price: new.price,
            is_released: new.is_released,
            preview_url: new.preview_url,
            purchase_url: new.purchase_url,
        };
        self.albums.insert(id, album.clone());
        Ok(album)
    }
}

/// The fixed catalog served until a real backing source exists
pub fn default_seed() -> Vec<NewAlbum> {
    vec![
        // Wicked Generation - upcoming
        NewAlbum {
            title: "WICKED GENERATION".to_string(),
            catalog: "CEAZY".to_string(),
            cover_image: "/src/assets/NS008.jpg".to_string(),
            release_date: Some("2025-06-26".to_string()),
            price: None,
            is_released: false,
            preview_url: None,
            purchase_url: None,
        },
        // Evolution - already released
        NewAlbum {
            title: "EVOLUTION".to_string(),
            catalog: "CEAZY".to_string(),
            cover_image: "/src/assets/EVOLUTION.png".to_string(),
            release_date: Some("2024-12-01".to_string()),
            price: Some("5.00".to_string()),
            is_released: true,
            preview_url: Some("/preview/evolution.mp3".to_string()),
            purchase_url: Some("/purchase/evolution".to_string()),
        },
    ]
}

impl CatalogStore {
    /// Store seeded from the default catalog on first access
    pub fn new() -> Self {
        Self::with_seed(Box::new(|| Ok(default_seed())))
    }

    /// Store with an injected seed source
    pub fn with_seed(seed: SeedSource) -> Self {
        Self {
            shelf: OnceCell::new(),
            seed,
        }
    }

    /// Seed the collection if it has not been seeded yet.
    ///
    /// Concurrent callers wait on the in-flight attempt and share its
    /// result. On failure the cell stays empty, the error surfaces to the
    /// caller that triggered the attempt, and the next call retries from
    /// scratch. Each attempt builds a complete collection before the cell
    /// is populated, so readers never observe partial data.
    async fn ensure_seeded(&self) -> Result<&RwLock<Shelf>> {
        self.shelf
            .get_or_try_init(|| async move {
                let drafts = (self.seed)()?;
                let mut shelf = Shelf::new();
                for draft in drafts {
                    let album = shelf.insert(draft)?;
                    debug!(id = album.id, title = %album.title, "seeded album");
                }
                info!(count = shelf.albums.len(), "album catalog seeded");
                Ok(RwLock::new(shelf))
            })
            .await
    }

    /// All albums in insertion order
    pub async fn all_albums(&self) -> Result<Vec<Album>> {
        let shelf = self.ensure_seeded().await?;
        let guard = shelf.read().await;
        Ok(guard.albums.values().cloned().collect())
    }

    /// Single album by id
    pub async fn album(&self, id: i64) -> Result<Option<Album>> {
        let shelf = self.ensure_seeded().await?;
        let guard = shelf.read().await;
        Ok(guard.albums.get(&id).cloned())
    }

    /// Insert a new album, assigning the next sequential id
    pub async fn create_album(&self, new: NewAlbum) -> Result<Album> {
        let shelf = self.ensure_seeded().await?;
        let mut guard = shelf.write().await;
        guard.insert(new)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
