//! The authoritative in-memory hero collection.
//!
//! Every mutation runs under the write lock as: copy the collection, apply
//! the change to the copy, persist the copy, then swap it in. A failed
//! persist therefore leaves both memory and disk at the previous snapshot.
//!
//! Lookups are linear scans in collection order, which is also the order
//! used for listing.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::hero::{Hero, HeroId, HeroPatch, NewHero};
use crate::query::{HeroPage, HeroQuery};
use crate::storage::{JsonFileStorage, SnapshotStorage};

/// Owns the hero collection and its backing snapshot.
pub struct HeroStore {
    heroes: RwLock<Vec<Hero>>,
    storage: Arc<dyn SnapshotStorage>,
}

impl std::fmt::Debug for HeroStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroStore")
            .field("storage", &self.storage.describe())
            .finish_non_exhaustive()
    }
}

impl HeroStore {
    /// Loads the collection from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is missing or malformed.
    pub async fn load(storage: Arc<dyn SnapshotStorage>) -> Result<Self> {
        let heroes = storage.load().await?;

        let duplicates = duplicate_ids(&heroes);
        if !duplicates.is_empty() {
            tracing::warn!(
                source = %storage.describe(),
                ?duplicates,
                "Snapshot contains duplicate hero ids; lookups by id return the first match"
            );
        }

        tracing::info!(
            source = %storage.describe(),
            heroes = heroes.len(),
            "Hero collection loaded"
        );

        Ok(Self::with_heroes(heroes, storage))
    }

    /// Loads the collection from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(Arc::new(JsonFileStorage::new(path))).await
    }

    /// Wraps an already loaded collection. Nothing is written until the
    /// first mutation.
    #[must_use]
    pub fn with_heroes(heroes: Vec<Hero>, storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            heroes: RwLock::new(heroes),
            storage,
        }
    }

    /// Number of heroes.
    pub async fn len(&self) -> usize {
        self.heroes.read().await.len()
    }

    /// Returns `true` if the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.heroes.read().await.is_empty()
    }

    /// A copy of the whole collection in insertion order.
    pub async fn snapshot(&self) -> Vec<Hero> {
        self.heroes.read().await.clone()
    }

    /// Ids that appear on more than one hero.
    pub async fn duplicate_ids(&self) -> Vec<HeroId> {
        duplicate_ids(&self.heroes.read().await)
    }

    /// Runs a list query against the current collection.
    pub async fn list(&self, query: &HeroQuery) -> HeroPage {
        query.run(&self.heroes.read().await)
    }

    /// Returns the first hero whose display name contains `query`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for a blank query, [`Error::HeroNotFound`]
    /// if nothing matches.
    pub async fn find_by_localized_name(&self, query: &str) -> Result<Hero> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_request("Hero name is required."));
        }

        let folded = query.to_lowercase();
        self.heroes
            .read()
            .await
            .iter()
            .find(|hero| hero.localized_name_contains(&folded))
            .cloned()
            .ok_or_else(|| Error::hero_not_found(query))
    }

    /// Position of the hero with `id`, if any.
    pub async fn find_index_by_id(&self, id: HeroId) -> Option<usize> {
        position_of(&self.heroes.read().await, id)
    }

    /// Returns the hero with `id`.
    ///
    /// # Errors
    ///
    /// [`Error::HeroNotFound`] if no hero has this id.
    pub async fn get(&self, id: HeroId) -> Result<Hero> {
        let heroes = self.heroes.read().await;
        position_of(&heroes, id)
            .map(|index| heroes[index].clone())
            .ok_or_else(|| Error::hero_not_found(id))
    }

    /// Validates and appends a new hero, then persists.
    ///
    /// The id is one more than the largest id in use, so ids freed by
    /// deletion are never handed out again while a larger one exists.
    ///
    /// # Errors
    ///
    /// Validation errors, or a storage error if the snapshot cannot be
    /// written (in which case nothing changes).
    pub async fn insert(&self, new_hero: NewHero) -> Result<Hero> {
        new_hero.validate()?;

        let mut heroes = self.heroes.write().await;
        let hero = new_hero.into_hero(next_id(&heroes));

        let mut next = heroes.clone();
        next.push(hero.clone());
        self.storage.save(&next).await?;
        *heroes = next;

        tracing::info!(id = hero.id, name = %hero.localized_name, "Hero created");
        Ok(hero)
    }

    /// Shallow-merges `patch` into the hero with `id`, then persists.
    ///
    /// # Errors
    ///
    /// [`Error::HeroNotFound`] for an unknown id, validation errors, or a
    /// storage error (in which case nothing changes).
    pub async fn update(&self, id: HeroId, patch: HeroPatch) -> Result<Hero> {
        patch.validate()?;

        let mut heroes = self.heroes.write().await;
        let index = position_of(&heroes, id).ok_or_else(|| Error::hero_not_found(id))?;

        let mut next = heroes.clone();
        patch.apply_to(&mut next[index]);
        let updated = next[index].clone();
        self.storage.save(&next).await?;
        *heroes = next;

        tracing::info!(id, name = %updated.localized_name, "Hero updated");
        Ok(updated)
    }

    /// Removes the hero with `id`, then persists.
    ///
    /// # Errors
    ///
    /// [`Error::HeroNotFound`] for an unknown id (nothing is written), or a
    /// storage error (in which case nothing changes).
    pub async fn delete(&self, id: HeroId) -> Result<Hero> {
        let mut heroes = self.heroes.write().await;
        let index = position_of(&heroes, id).ok_or_else(|| Error::hero_not_found(id))?;

        let mut next = heroes.clone();
        let removed = next.remove(index);
        self.storage.save(&next).await?;
        *heroes = next;

        tracing::info!(id, name = %removed.localized_name, "Hero deleted");
        Ok(removed)
    }

    /// Writes the current collection to storage.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot cannot be written.
    pub async fn persist(&self) -> Result<()> {
        // Held as a write lock so no mutation can interleave with this save.
        let heroes = self.heroes.write().await;
        self.storage.save(&heroes).await
    }

    /// Where the snapshot lives.
    #[must_use]
    pub fn storage_location(&self) -> String {
        self.storage.describe()
    }
}

fn position_of(heroes: &[Hero], id: HeroId) -> Option<usize> {
    heroes.iter().position(|hero| hero.id == id)
}

fn next_id(heroes: &[Hero]) -> HeroId {
    heroes.iter().map(|hero| hero.id).max().map_or(1, |max| max + 1)
}

fn duplicate_ids(heroes: &[Hero]) -> Vec<HeroId> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<HeroId> = heroes
        .iter()
        .filter(|hero| !seen.insert(hero.id))
        .map(|hero| hero.id)
        .collect();
    duplicates.sort_unstable();
    duplicates.dedup();
    duplicates
}
