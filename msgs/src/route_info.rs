use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Geographic point, encoded on the wire as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Point {
        Point { lat, lng }
    }
}

impl From<[f64; 2]> for Point {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Point { lat, lng }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.lat, point.lng]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("unable to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("route {name} in {} has {points} point(s), at least 2 are required", path.display())]
    TooShort {
        path: PathBuf,
        name: String,
        points: usize,
    },
}

/// One route file: a named, ordered path the buses drive along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub name: String,
    #[serde(rename = "station_start_name")]
    pub first_station_name: String,
    #[serde(rename = "station_stop_name")]
    pub last_station_name: String,
    pub coordinates: Vec<Point>,
}

impl RouteInfo {
    pub fn load(path: impl AsRef<Path>) -> Result<RouteInfo, RouteError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.to_owned(),
            source,
        })?;
        let route = serde_json::from_str::<RouteInfo>(&json).map_err(|source| RouteError::Json {
            path: path.to_owned(),
            source,
        })?;
        if route.coordinates.len() < 2 {
            return Err(RouteError::TooShort {
                path: path.to_owned(),
                name: route.name,
                points: route.coordinates.len(),
            });
        }
        Ok(route)
    }

    /// Loads every `*.json` file in `dir`, ordered by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<RouteInfo>, RouteError> {
        let dir = dir.as_ref();
        let io_err = |source| RouteError::Io { path: dir.to_owned(), source };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(RouteInfo::load).collect()
    }
}
