use std::collections::HashMap;

use msgs::BusInfo;
use tokio::sync::RwLock;

/// Latest position of every bus ever reported, keyed by bus id.
///
/// Writers (one per publisher connection) take the lock exclusively, readers
/// (one per web client) share it. Entries are never removed.
#[derive(Debug, Default)]
pub struct BusStorage {
    buses: RwLock<HashMap<String, BusInfo>>,
}

impl BusStorage {
    pub fn new() -> BusStorage {
        BusStorage::default()
    }

    /// Inserts or overwrites the entry for `bus.id`. Last write wins.
    pub async fn add(&self, bus: BusInfo) {
        self.buses.write().await.insert(bus.id.clone(), bus);
    }

    /// Copies out every stored bus whose position passes `filter`.
    ///
    /// The result owns its records, so later writes never show through.
    pub async fn list(&self, filter: impl Fn(f64, f64) -> bool) -> Vec<BusInfo> {
        self.buses
            .read()
            .await
            .values()
            .filter(|bus| filter(bus.lat, bus.lng))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.buses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buses.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use msgs::{BoundingBox, Point};

    use super::*;

    fn bus(id: &str, lat: f64, lng: f64) -> BusInfo {
        BusInfo::new(id, "r", Point::new(lat, lng))
    }

    fn ids(mut buses: Vec<BusInfo>) -> Vec<String> {
        buses.sort_by(|a, b| a.id.cmp(&b.id));
        buses.into_iter().map(|b| b.id).collect()
    }

    #[tokio::test]
    async fn list_filters_by_bounding_box() {
        let storage = BusStorage::new();
        storage.add(bus("A", 5.0, 5.0)).await;
        storage.add(bus("B", 20.0, 20.0)).await;

        let bbox = BoundingBox { east_lng: 10.0, west_lng: 0.0, north_lat: 10.0, south_lat: 0.0 };
        let found = storage.list(|lat, lng| bbox.contains(lat, lng)).await;
        assert_eq!(found, vec![bus("A", 5.0, 5.0)]);
    }

    #[tokio::test]
    async fn list_accepts_any_predicate() {
        let storage = BusStorage::new();
        storage.add(bus("A", 1.0, 1.0)).await;
        storage.add(bus("B", -1.0, 1.0)).await;

        let north = storage.list(|lat: f64, _lng: f64| lat > 0.0).await;
        assert_eq!(ids(north), ["A"]);
        assert_eq!(ids(storage.list(|_: f64, _: f64| true).await), ["A", "B"]);
    }

    #[tokio::test]
    async fn add_overwrites_same_id() {
        let storage = BusStorage::new();
        storage.add(bus("A", 1.0, 1.0)).await;
        storage.add(bus("A", 2.0, 2.0)).await;

        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.list(|_: f64, _: f64| true).await, vec![bus("A", 2.0, 2.0)]);
    }

    #[tokio::test]
    async fn repeated_add_is_idempotent() {
        let storage = BusStorage::new();
        storage.add(bus("A", 1.0, 1.0)).await;
        let before = storage.list(|_: f64, _: f64| true).await;
        storage.add(bus("A", 1.0, 1.0)).await;
        storage.add(bus("A", 1.0, 1.0)).await;
        assert_eq!(storage.list(|_: f64, _: f64| true).await, before);
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn list_matches_filter_regardless_of_insertion_order() {
        let points: Vec<(String, f64, f64)> = (0..50)
            .map(|i| (format!("bus{i}"), f64::from(i) - 25.0, f64::from(i % 7) * 3.0 - 9.0))
            .collect();
        let bbox = BoundingBox { east_lng: 5.0, west_lng: -5.0, north_lat: 10.0, south_lat: -10.0 };
        let expected: Vec<String> = {
            let mut v: Vec<_> = points
                .iter()
                .filter(|(_, lat, lng)| bbox.contains(*lat, *lng))
                .map(|(id, _, _)| id.clone())
                .collect();
            v.sort();
            v
        };

        let forward = BusStorage::new();
        for (id, lat, lng) in &points {
            forward.add(bus(id, *lat, *lng)).await;
        }
        let backward = BusStorage::new();
        for (id, lat, lng) in points.iter().rev() {
            backward.add(bus(id, *lat, *lng)).await;
        }

        assert_eq!(ids(forward.list(|lat, lng| bbox.contains(lat, lng)).await), expected);
        assert_eq!(ids(backward.list(|lat, lng| bbox.contains(lat, lng)).await), expected);
    }

    #[tokio::test]
    async fn empty_box_lists_nothing() {
        let storage = BusStorage::new();
        storage.add(bus("A", 0.0, 0.0)).await;
        assert!(storage.list(|lat, lng| BoundingBox::EMPTY.contains(lat, lng)).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_never_tear_a_record() {
        let storage = Arc::new(BusStorage::new());
        let mut writers = Vec::new();
        for w in 0..8 {
            let storage = storage.clone();
            writers.push(tokio::spawn(async move {
                for step in 0..200 {
                    // lat and lng always move together
                    let v = f64::from(step);
                    storage.add(bus(&format!("bus{w}"), v, v)).await;
                }
            }));
        }
        let mut readers = Vec::new();
        for _ in 0..4 {
            let storage = storage.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    for b in storage.list(|_: f64, _: f64| true).await {
                        assert_eq!(b.lat, b.lng, "torn record for {}", b.id);
                    }
                }
            }));
        }
        for handle in writers.into_iter().chain(readers) {
            handle.await.unwrap();
        }
        assert_eq!(storage.len().await, 8);
    }
}
