use msgs::BoundingBox;
use tokio::sync::RwLock;

/// The region one web client is currently looking at.
///
/// Shared by exactly the two loops of that client's connection: the receive
/// loop replaces it, the send loop copies it out once per tick.
#[derive(Debug, Default)]
pub struct Viewport {
    bounds: RwLock<BoundingBox>,
}

impl Viewport {
    pub fn new() -> Viewport {
        Viewport {
            bounds: RwLock::new(BoundingBox::EMPTY),
        }
    }

    /// Replaces all four bounds at once.
    pub async fn update(&self, bounds: BoundingBox) {
        *self.bounds.write().await = bounds;
    }

    pub async fn bounds(&self) -> BoundingBox {
        *self.bounds.read().await
    }
}
