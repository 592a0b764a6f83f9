use std::{convert::Infallible, sync::Arc, time::Duration};

use warp::{reject::Rejection, Filter, Reply};

use crate::{handler, storage::BusStorage};

/// Publisher endpoint. Any path upgrades to the ingestion socket.
pub fn bus_route(storage: Arc<BusStorage>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::ws()
        .and(warp::addr::remote())
        .and(with_storage(storage))
        .and_then(handler::bus_ws_handler)
}

/// Web client endpoint. Any path upgrades to the viewport/broadcast socket.
pub fn webclients_route(
    storage: Arc<BusStorage>,
    interval: Duration,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::ws()
        .and(warp::addr::remote())
        .and(with_storage(storage))
        .and(warp::any().map(move || interval))
        .and_then(handler::webclient_ws_handler)
}

fn with_storage(storage: Arc<BusStorage>) -> impl Filter<Extract = (Arc<BusStorage>,), Error = Infallible> + Clone {
    warp::any().map(move || storage.clone())
}
