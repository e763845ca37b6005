//! Obstacle proximity classification
//!
//! Splits the spatial cache into obstacles close enough to matter (relevant:
//! zoom and labels) and obstacles close enough to block movement (colliding).
//! Distances stay squared; the square root is only taken for the zoom ratio.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::spatial::{CachedObstacle, SpatialCache};
use crate::consts::LABEL_LIFT;

/// A cached obstacle with its squared distance to the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyObstacle {
    pub id: String,
    pub rect: Rect,
    pub center: DVec2,
    pub interactable: bool,
    pub distance_sq: f64,
}

impl NearbyObstacle {
    fn from_cached(cached: &CachedObstacle, distance_sq: f64) -> Self {
        Self {
            id: cached.id.clone(),
            rect: cached.rect,
            center: cached.center,
            interactable: cached.interactable,
            distance_sq,
        }
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Relevant and colliding sets, both in cache order
///
/// Every colliding entry is also relevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    pub relevant: Vec<NearbyObstacle>,
    pub colliding: Vec<NearbyObstacle>,
}

impl Proximity {
    /// Closest relevant obstacle; the first one wins on ties
    pub fn nearest(&self) -> Option<&NearbyObstacle> {
        self.relevant.iter().fold(None, |best, candidate| match best {
            Some(best) if best.distance_sq <= candidate.distance_sq => Some(best),
            _ => Some(candidate),
        })
    }

    pub fn is_relevant(&self, id: &str) -> bool {
        self.relevant.iter().any(|o| o.id == id)
    }

    pub fn is_colliding(&self, id: &str) -> bool {
        self.colliding.iter().any(|o| o.id == id)
    }

    /// Overlay state for every cached obstacle (debug gizmos)
    pub fn overlays(&self, cache: &SpatialCache) -> Vec<ObstacleOverlay> {
        cache
            .entries()
            .iter()
            .map(|entry| ObstacleOverlay {
                id: entry.id.clone(),
                rect: entry.rect,
                in_relevance: self.is_relevant(&entry.id),
                in_collision: self.is_colliding(&entry.id),
            })
            .collect()
    }

    /// Floating labels for relevant interactable obstacles
    pub fn labels(&self) -> Vec<Label> {
        self.relevant
            .iter()
            .filter(|o| o.interactable)
            .map(|o| Label {
                id: o.id.clone(),
                anchor: DVec2::new(o.rect.center().x, o.rect.top() - LABEL_LIFT),
            })
            .collect()
    }
}

/// Per-obstacle overlay state for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleOverlay {
    pub id: String,
    pub rect: Rect,
    pub in_relevance: bool,
    pub in_collision: bool,
}

/// A label anchored above an obstacle (screen space)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub anchor: DVec2,
}

/// Classify cached obstacles around the character center
///
/// A collision radius above the relevance radius is clamped to it.
pub fn classify(
    cache: &SpatialCache,
    center: DVec2,
    relevance_radius: f64,
    collision_radius: f64,
) -> Proximity {
    let relevance_sq = relevance_radius * relevance_radius;
    let collision_radius = collision_radius.min(relevance_radius);
    let collision_sq = collision_radius * collision_radius;

    let relevant: Vec<NearbyObstacle> = cache
        .entries()
        .iter()
        .filter_map(|entry| {
            let distance_sq = entry.center.distance_squared(center);
            (distance_sq <= relevance_sq).then(|| NearbyObstacle::from_cached(entry, distance_sq))
        })
        .collect();

    let colliding = relevant
        .iter()
        .filter(|o| o.distance_sq <= collision_sq)
        .cloned()
        .collect();

    Proximity { relevant, colliding }
}
