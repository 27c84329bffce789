//! Wishlist store - named folders of influencer ids.
//!
//! The reserved [`ALL_FOLDER`] always exists and holds every id that was ever
//! added to any folder (until toggled off). Folder order is insertion order
//! and survives renames.
//!
//! All operations are total: guards such as deleting `"All"` or renaming onto
//! an existing name are silently ignored.
//!
//! State lives in memory only; a [`SharedWishlist`] handle is injected where
//! several callers need the same store.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Name of the folder that can never be deleted.
pub const ALL_FOLDER: &str = "All";

/// A folder as exposed to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub name: String,
    pub influencer_ids: Vec<String>,
}

/// Ordered mapping of folder name to ordered, duplicate-free id list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistStore {
    folders: Vec<(String, Vec<String>)>,
}

impl WishlistStore {
    /// A store holding only the empty `"All"` folder.
    pub fn new() -> Self {
        Self {
            folders: vec![(ALL_FOLDER.to_string(), Vec::new())],
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.folders.iter().position(|(n, _)| n == name)
    }

    fn ids_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.folders
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, ids)| ids)
    }

    fn all_mut(&mut self) -> &mut Vec<String> {
        // "All" can be neither deleted nor renamed, so it is always present.
        let pos = self.position(ALL_FOLDER).unwrap_or(0);
        &mut self.folders[pos].1
    }

    /// Flip membership of `id` in `"All"`. Other folders are left as they are.
    pub fn toggle(&mut self, id: &str) {
        let all = self.all_mut();
        if let Some(pos) = all.iter().position(|x| x == id) {
            all.remove(pos);
        } else {
            all.push(id.to_string());
        }
    }

    /// Whether `id` is in `"All"`.
    pub fn is_wished(&self, id: &str) -> bool {
        self.folder(ALL_FOLDER)
            .is_some_and(|ids| ids.iter().any(|x| x == id))
    }

    /// Append `id` to `folder` (created if absent) and to `"All"`.
    pub fn add_to_folder(&mut self, id: &str, folder: &str) {
        self.create_folder(folder);
        if let Some(ids) = self.ids_mut(folder) {
            if !ids.iter().any(|x| x == id) {
                ids.push(id.to_string());
            }
        }
        let all = self.all_mut();
        if !all.iter().any(|x| x == id) {
            all.push(id.to_string());
        }
    }

    /// Add an empty folder; no-op if the name is taken.
    pub fn create_folder(&mut self, name: &str) {
        if self.position(name).is_none() {
            self.folders.push((name.to_string(), Vec::new()));
        }
    }

    /// Remove a folder; `"All"` is never removed.
    pub fn delete_folder(&mut self, name: &str) {
        if name == ALL_FOLDER {
            return;
        }
        if let Some(pos) = self.position(name) {
            self.folders.remove(pos);
        }
    }

    /// Move the list under `old` to `new`, keeping its position.
    ///
    /// No-op when `old` is missing or `new` already exists. `"All"` keeps
    /// its name.
    pub fn rename_folder(&mut self, old: &str, new: &str) {
        if old == ALL_FOLDER || self.position(new).is_some() {
            return;
        }
        if let Some(pos) = self.position(old) {
            self.folders[pos].0 = new.to_string();
        }
    }

    /// Ids in `name`, if the folder exists.
    pub fn folder(&self, name: &str) -> Option<&[String]> {
        self.folders
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ids)| ids.as_slice())
    }

    /// Folder names in order.
    pub fn folder_names(&self) -> Vec<&str> {
        self.folders.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.folders.iter().map(|(n, ids)| (n.as_str(), ids.as_slice()))
    }

    /// Snapshot of all folders for serialization.
    pub fn folders(&self) -> Vec<Folder> {
        self.iter()
            .map(|(name, ids)| Folder {
                name: name.to_string(),
                influencer_ids: ids.to_vec(),
            })
            .collect()
    }
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle to one wishlist shared between request handlers.
#[derive(Debug, Clone, Default)]
pub struct SharedWishlist {
    inner: Arc<RwLock<WishlistStore>>,
}

impl SharedWishlist {
    pub fn new(store: WishlistStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` with shared access.
    pub async fn read<R>(&self, f: impl FnOnce(&WishlistStore) -> R) -> R {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Run `f` with exclusive access.
    pub async fn update<R>(&self, f: impl FnOnce(&mut WishlistStore) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_folder_member_is_in_all(store: &WishlistStore) -> bool {
        let all = store.folder(ALL_FOLDER).unwrap_or(&[]);
        store
            .iter()
            .flat_map(|(_, ids)| ids.iter())
            .all(|id| all.contains(id))
    }

    #[test]
    fn test_new_store_has_only_all() {
        let store = WishlistStore::new();
        assert_eq!(store.folder_names(), vec![ALL_FOLDER]);
        assert_eq!(store.folder(ALL_FOLDER), Some(&[][..]));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut store = WishlistStore::new();
        assert!(!store.is_wished("1"));
        store.toggle("1");
        assert!(store.is_wished("1"));
        store.toggle("1");
        assert!(!store.is_wished("1"));
    }

    #[test]
    fn test_add_to_folder_keeps_all_superset() {
        let mut store = WishlistStore::new();
        let ops = [
            ("1", "Fashion"),
            ("2", "Beauty"),
            ("1", "Beauty"),
            ("3", "All"),
            ("2", "Fashion"),
        ];
        for (id, folder) in ops {
            store.add_to_folder(id, folder);
            assert!(every_folder_member_is_in_all(&store));
        }
        assert_eq!(store.folder("Beauty"), Some(&["2".to_string(), "1".to_string()][..]));
        assert_eq!(store.folder_names(), vec!["All", "Fashion", "Beauty"]);
    }

    #[test]
    fn test_add_to_folder_is_idempotent() {
        let mut store = WishlistStore::new();
        store.add_to_folder("4", "Travel");
        store.add_to_folder("4", "Travel");
        assert_eq!(store.folder("Travel").map(|ids| ids.len()), Some(1));
        assert_eq!(store.folder(ALL_FOLDER).map(|ids| ids.len()), Some(1));
    }

    #[test]
    fn test_create_folder_existing_is_noop() {
        let mut store = WishlistStore::new();
        store.add_to_folder("1", "Favorites");
        store.create_folder("Favorites");
        assert_eq!(store.folder("Favorites"), Some(&["1".to_string()][..]));
    }

    #[test]
    fn test_delete_all_is_noop() {
        let mut store = WishlistStore::new();
        store.add_to_folder("1", "Favorites");
        let before = store.clone();
        store.delete_folder(ALL_FOLDER);
        assert_eq!(store, before);

        store.delete_folder("Favorites");
        assert_eq!(store.folder_names(), vec![ALL_FOLDER]);
        assert!(store.is_wished("1"));
    }

    #[test]
    fn test_rename_onto_existing_is_noop() {
        let mut store = WishlistStore::new();
        store.add_to_folder("1", "A");
        store.add_to_folder("2", "B");
        let before = store.clone();
        store.rename_folder("A", "B");
        store.rename_folder("A", ALL_FOLDER);
        store.rename_folder("missing", "C");
        store.rename_folder(ALL_FOLDER, "Everything");
        assert_eq!(store, before);
    }

    #[test]
    fn test_rename_moves_members_and_keeps_order() {
        let mut store = WishlistStore::new();
        store.create_folder("Favorites");
        store.create_folder("Later");
        store.add_to_folder("2", "Favorites");
        store.rename_folder("Favorites", "Top Picks");

        assert!(store.folder("Favorites").is_none());
        assert_eq!(store.folder("Top Picks"), Some(&["2".to_string()][..]));
        assert_eq!(store.folder_names(), vec!["All", "Top Picks", "Later"]);
    }

    #[tokio::test]
    async fn test_shared_handle_sees_updates() {
        let shared = SharedWishlist::default();
        let other = shared.clone();
        shared.update(|w| w.add_to_folder("3", "Film")).await;
        assert!(other.read(|w| w.is_wished("3")).await);
    }
}
