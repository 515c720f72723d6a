//! Single nearest-first ranking routine.

use std::cmp::Ordering;

use serde::Serialize;

use crate::geo::haversine_km;
use crate::types::{Collector, Coordinate, DropOffPoint};

/// Anything with a stable id and a position.
pub trait Locatable {
    fn id(&self) -> &str;
    fn location(&self) -> Coordinate;
}

impl Locatable for Collector {
    fn id(&self) -> &str {
        &self.id
    }
    fn location(&self) -> Coordinate {
        self.home
    }
}

impl Locatable for DropOffPoint {
    fn id(&self) -> &str {
        &self.id
    }
    fn location(&self) -> Coordinate {
        self.location
    }
}

/// An item paired with its distance from the ranking origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Order `items` by ascending great-circle distance from `origin`, ties by id.
///
/// With `max_km = Some(r)`, items farther than `r` are dropped.
pub fn rank_by_distance<T, I>(origin: Coordinate, items: I, max_km: Option<f64>) -> Vec<Ranked<T>>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let distance_km = haversine_km(origin, item.location());
            Ranked { item, distance_km }
        })
        .filter(|r| max_km.map_or(true, |max| r.distance_km <= max))
        .collect();

    sort_ranked(&mut ranked);
    ranked
}

/// Nearest first, ties by id. For callers that already hold distances.
pub(crate) fn sort_ranked<T: Locatable>(ranked: &mut [Ranked<T>]) {
    ranked.sort_by(compare_ranked);
}

fn compare_ranked<T: Locatable>(a: &Ranked<T>, b: &Ranked<T>) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.item.id().cmp(b.item.id()))
}

/// Active drop-off points, nearest first, no distance cap.
pub fn nearest_drop_off_points(
    origin: Coordinate,
    points: impl IntoIterator<Item = DropOffPoint>,
) -> Vec<Ranked<DropOffPoint>> {
    rank_by_distance(origin, points.into_iter().filter(|p| p.active), None)
}
