use std::{sync::Arc, time::Duration};

use msgs::{BusInfo, RouteInfo};
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub fn bus_id(route_name: &str, index: usize) -> String {
    format!("{route_name}-{index}")
}

/// Random starting point in the first half of a route with `points` points,
/// so buses sharing a route are spread out.
pub fn random_offset(points: usize) -> usize {
    let half = points / 2;
    if half == 0 {
        return 0;
    }
    rand::rng().random_range(0..half)
}

/// Drives one bus along `route` forever, starting at `offset` and wrapping
/// back to the first point after the last.
///
/// Each position blocks until the channel accepts it, then the bus waits
/// `interval` before moving on. Returns when `token` is cancelled or the
/// receiving side of `buses` is gone.
pub async fn run_bus(
    id: String,
    route: Arc<RouteInfo>,
    offset: usize,
    interval: Duration,
    buses: mpsc::Sender<BusInfo>,
    token: CancellationToken,
) {
    let Some(first) = route.coordinates.first() else { return };
    let mut bus = BusInfo::new(id, route.name.as_str(), *first);

    for point in route.coordinates.iter().cycle().skip(offset) {
        bus.set_position(*point);

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = buses.send(bus.clone()) => {
                if result.is_err() {
                    break;
                }
            }
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!(bus_id = %bus.id, "bus stopped");
}

#[cfg(test)]
mod tests {
    use msgs::Point;

    use super::*;

    fn route(points: &[(f64, f64)]) -> Arc<RouteInfo> {
        Arc::new(RouteInfo {
            name: "r".to_owned(),
            first_station_name: "first".to_owned(),
            last_station_name: "last".to_owned(),
            coordinates: points.iter().map(|&(lat, lng)| Point::new(lat, lng)).collect(),
        })
    }

    async fn collect(offset: usize, count: usize) -> Vec<(f64, f64)> {
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_bus(
            bus_id("r", 0),
            route(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]),
            offset,
            Duration::from_millis(1),
            tx,
            token.clone(),
        ));

        let mut seen = Vec::new();
        while seen.len() < count {
            let bus = rx.recv().await.unwrap();
            assert_eq!(bus.id, "r-0");
            assert_eq!(bus.route, "r");
            seen.push((bus.lat, bus.lng));
        }
        token.cancel();
        handle.await.unwrap();
        seen
    }

    #[tokio::test]
    async fn emits_route_in_order_and_wraps() {
        assert_eq!(
            collect(0, 7).await,
            [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 0.0)]
        );
    }

    #[tokio::test]
    async fn offset_shifts_the_phase() {
        assert_eq!(collect(1, 4).await, [(1.0, 1.0), (2.0, 2.0), (0.0, 0.0), (1.0, 1.0)]);
    }

    #[tokio::test]
    async fn cancel_stops_a_blocked_bus() {
        let (tx, _rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_bus(
            bus_id("r", 1),
            route(&[(0.0, 0.0), (1.0, 1.0)]),
            0,
            Duration::ZERO,
            tx,
            token.clone(),
        ));

        // first position fills the channel, the second blocks on send
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("bus ignored cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_channel_is_closed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = tokio::spawn(run_bus(
            bus_id("r", 2),
            route(&[(0.0, 0.0), (1.0, 1.0)]),
            0,
            Duration::ZERO,
            tx,
            CancellationToken::new(),
        ));
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("bus kept running without a receiver")
            .unwrap();
    }

    #[test]
    fn offset_is_in_first_half() {
        for _ in 0..1000 {
            assert!(random_offset(10) < 5);
        }
        for _ in 0..100 {
            assert_eq!(random_offset(2), 0);
            assert_eq!(random_offset(3), 0);
        }
        assert_eq!(random_offset(1), 0);
        assert_eq!(random_offset(0), 0);
    }

    #[test]
    fn ids_keep_route_and_index_apart() {
        assert_eq!(bus_id("12", 3), "12-3");
        assert_ne!(bus_id("1", 23), bus_id("12", 3));
    }
}
