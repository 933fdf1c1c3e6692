//! Snapshot compression
//!
//! A snapshot keeps only what checkout needs: the inventory, the images (left
//! out of the encoding when empty) and derived summary counts. Any other
//! dataset fields are dropped on the way in and do not come back on checkout.

use serde::{Deserialize, Serialize};
use tally_core::{Dataset, ImageMap, Item};

/// Dataset projection stored inside a commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default, skip_serializing_if = "ImageMap::is_empty")]
    pub images: ImageMap,
    /// Derived counts; informational only
    #[serde(default)]
    pub summary: SnapshotSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub inventory_count: usize,
    pub image_count: usize,
}

/// Project a dataset into its stored form
pub fn compress(dataset: &Dataset) -> Snapshot {
    Snapshot {
        inventory: dataset.inventory.clone(),
        images: dataset.images.clone(),
        summary: SnapshotSummary {
            inventory_count: dataset.inventory.len(),
            image_count: dataset.images.len(),
        },
    }
}

/// Rebuild a usable dataset from a snapshot
pub fn decompress(snapshot: &Snapshot) -> Dataset {
    Dataset::new(snapshot.inventory.clone(), snapshot.images.clone())
}
