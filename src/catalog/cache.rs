//! Single-writer in-memory catalog cache.
//!
//! One spawned task owns the property list and the favorite id set.
//! Mutations arrive as commands over an mpsc channel and are
//! acknowledged only after the new state has been published on a watch
//! channel, so an awaited mutation is always visible to reads that
//! follow it. Reads never touch the actor; they borrow the latest
//! published snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::domain::property::Property;

/// Immutable snapshot of the catalog
///
/// Cheap to clone; observers hold it across renders without blocking
/// the cache.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    properties: Arc<Vec<Property>>,
    favorite_ids: Arc<HashSet<String>>,
}

impl CatalogState {
    /// Returns the cached property list with favorite flags applied
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns the favorite property ids of the current session
    pub fn favorite_ids(&self) -> &HashSet<String> {
        &self.favorite_ids
    }

    /// Returns whether a property id is favorited in this snapshot
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorite_ids.contains(id)
    }
}

enum Command {
    ReplaceAll {
        properties: Vec<Property>,
        ack: oneshot::Sender<Vec<Property>>,
    },
    Upsert {
        property: Property,
        ack: oneshot::Sender<()>,
    },
    Remove {
        id: String,
        ack: oneshot::Sender<()>,
    },
    SetFavorites {
        ids: HashSet<String>,
        ack: oneshot::Sender<()>,
    },
    AddFavorite {
        id: String,
        ack: oneshot::Sender<()>,
    },
    RemoveFavorite {
        id: String,
        ack: oneshot::Sender<()>,
    },
    ClearFavorites {
        ack: oneshot::Sender<()>,
    },
}

struct CacheActor {
    rx: mpsc::UnboundedReceiver<Command>,
    tx_state: watch::Sender<CatalogState>,
    properties: Vec<Property>,
    favorite_ids: HashSet<String>,
}

impl CacheActor {
    async fn run(mut self) {
        debug!("catalog cache started");
        while let Some(command) = self.rx.recv().await {
            self.apply(command);
        }
        debug!("catalog cache stopped");
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::ReplaceAll { properties, ack } => {
                self.properties = properties;
                self.apply_overlay();
                self.publish();
                let _ = ack.send(self.properties.clone());
            }
            Command::Upsert { property, ack } => {
                self.upsert(property);
                self.publish();
                let _ = ack.send(());
            }
            Command::Remove { id, ack } => {
                self.properties.retain(|property| property.id() != id);
                self.publish();
                let _ = ack.send(());
            }
            Command::SetFavorites { ids, ack } => {
                self.favorite_ids = ids;
                self.apply_overlay();
                self.publish();
                let _ = ack.send(());
            }
            Command::AddFavorite { id, ack } => {
                self.favorite_ids.insert(id.clone());
                self.flag_property(&id, true);
                self.publish();
                let _ = ack.send(());
            }
            Command::RemoveFavorite { id, ack } => {
                self.favorite_ids.remove(&id);
                self.flag_property(&id, false);
                self.publish();
                let _ = ack.send(());
            }
            Command::ClearFavorites { ack } => {
                self.favorite_ids.clear();
                self.apply_overlay();
                self.publish();
                let _ = ack.send(());
            }
        }
    }

    /// Re-derives every favorite flag from the id set
    fn apply_overlay(&mut self) {
        let favorites = &self.favorite_ids;
        for property in self.properties.iter_mut() {
            let flagged = favorites.contains(property.id());
            property.set_favorite(flagged);
        }
    }

    fn flag_property(&mut self, id: &str, flagged: bool) {
        if let Some(property) = self
            .properties
            .iter_mut()
            .find(|property| property.id() == id)
        {
            property.set_favorite(flagged);
        }
    }

    fn upsert(&mut self, mut property: Property) {
        let flagged = self.favorite_ids.contains(property.id());
        property.set_favorite(flagged);
        match self
            .properties
            .iter()
            .position(|existing| existing.id() == property.id())
        {
            Some(index) => self.properties[index] = property,
            None => self.properties.push(property),
        }
    }

    fn publish(&self) {
        self.tx_state.send_replace(CatalogState {
            properties: Arc::new(self.properties.clone()),
            favorite_ids: Arc::new(self.favorite_ids.clone()),
        });
    }
}

/// Handle to the catalog cache
///
/// Cheap to clone; every clone talks to the same cache task. Mutations
/// are async and resolve once the new state is published; reads are
/// synchronous against the latest snapshot.
#[derive(Clone)]
pub struct CacheHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<CatalogState>,
}

impl CacheHandle {
    /// Spawns the cache task and returns its handle
    ///
    /// Must be called from within a tokio runtime. The task exits when
    /// the last handle is dropped.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (tx_state, state) = watch::channel(CatalogState::default());
        let actor = CacheActor {
            rx,
            tx_state,
            properties: Vec::new(),
            favorite_ids: HashSet::new(),
        };
        tokio::spawn(actor.run());
        Self { tx, state }
    }

    /// Replaces the whole property list, returning it with the
    /// favorite overlay applied
    pub async fn replace_all(&self, properties: Vec<Property>) -> Vec<Property> {
        let (ack, done) = oneshot::channel();
        if self
            .tx
            .send(Command::ReplaceAll { properties, ack })
            .is_ok()
        {
            if let Ok(published) = done.await {
                return published;
            }
        }
        Vec::new()
    }

    /// Inserts or replaces a single property by id
    pub async fn upsert(&self, property: Property) {
        self.send(|ack| Command::Upsert { property, ack }).await;
    }

    /// Removes a property by id; unknown ids are ignored
    pub async fn remove(&self, id: String) {
        self.send(|ack| Command::Remove { id, ack }).await;
    }

    /// Replaces the favorite id set and re-derives every flag
    pub async fn set_favorites(&self, ids: HashSet<String>) {
        self.send(|ack| Command::SetFavorites { ids, ack }).await;
    }

    /// Adds one id to the favorite set
    pub async fn add_favorite(&self, id: String) {
        self.send(|ack| Command::AddFavorite { id, ack }).await;
    }

    /// Removes one id from the favorite set
    pub async fn remove_favorite(&self, id: String) {
        self.send(|ack| Command::RemoveFavorite { id, ack }).await;
    }

    /// Empties the favorite set; used on sign-out
    pub async fn clear_favorites(&self) {
        self.send(|ack| Command::ClearFavorites { ack }).await;
    }

    /// Returns a copy of the cached property list
    pub fn snapshot(&self) -> Vec<Property> {
        self.state.borrow().properties().to_vec()
    }

    /// Returns whether a property id is currently favorited
    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.borrow().is_favorite(id)
    }

    /// Returns a copy of the current favorite id set
    pub fn favorite_ids(&self) -> HashSet<String> {
        self.state.borrow().favorite_ids().clone()
    }

    /// Subscribes to catalog snapshots
    ///
    /// The receiver yields a new `CatalogState` after every mutation;
    /// this is the surface observable UIs bind to.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.clone()
    }

    async fn send(&self, command: impl FnOnce(oneshot::Sender<()>) -> Command) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(command(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

impl Default for CacheHandle {
    fn default() -> Self {
        Self::new()
    }
}
