use serde::{Deserialize, Serialize};

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Axis-aligned geographic bounding box.
///
/// Union and extension are plain min/max over degrees; there is no
/// antimeridian handling.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl LngLatBounds {
    pub fn new(sw: LngLat, ne: LngLat) -> Self {
        Self { sw, ne }
    }

    pub fn from_point(point: LngLat) -> Self {
        Self {
            sw: point,
            ne: point,
        }
    }

    /// Grows the box to include `point`.
    pub fn extend(&mut self, point: LngLat) {
        self.sw.lng = self.sw.lng.min(point.lng);
        self.sw.lat = self.sw.lat.min(point.lat);
        self.ne.lng = self.ne.lng.max(point.lng);
        self.ne.lat = self.ne.lat.max(point.lat);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.extend(other.sw);
        out.extend(other.ne);
        out
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.sw.lng + self.ne.lng) / 2.0,
            (self.sw.lat + self.ne.lat) / 2.0,
        )
    }

    pub fn contains(&self, point: LngLat) -> bool {
        point.lng >= self.sw.lng
            && point.lng <= self.ne.lng
            && point.lat >= self.sw.lat
            && point.lat <= self.ne.lat
    }
}

/// Unions an iterator of boxes; `None` when the iterator is empty.
pub fn union_all(boxes: impl IntoIterator<Item = LngLatBounds>) -> Option<LngLatBounds> {
    let mut iter = boxes.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, b| acc.union(&b)))
}
