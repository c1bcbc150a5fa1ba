//! Physical qubit indices and the index/coordinate map.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Position2D;

/// Index of a physical qubit in a sealed circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitIndex(pub u32);

impl fmt::Display for QubitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitIndex {
    fn from(index: u32) -> Self {
        QubitIndex(index)
    }
}

impl QubitIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional map between qubit indices and coordinates.
///
/// Coordinates are stored sorted, so the index of a qubit is its rank in
/// coordinate order and lookups by coordinate are binary searches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Position2D>", into = "Vec<Position2D>")]
pub struct QubitMap {
    coordinates: Vec<Position2D>,
}

impl QubitMap {
    /// Build a map from coordinates in any order; duplicates are dropped.
    pub fn from_coordinates(coordinates: impl IntoIterator<Item = Position2D>) -> Self {
        let mut coordinates: Vec<Position2D> = coordinates.into_iter().collect();
        coordinates.sort_unstable();
        coordinates.dedup();
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Index of the qubit at `coordinate`.
    pub fn index_of(&self, coordinate: Position2D) -> Option<QubitIndex> {
        self.coordinates
            .binary_search(&coordinate)
            .ok()
            .and_then(|i| u32::try_from(i).ok())
            .map(QubitIndex)
    }

    /// Coordinate of the qubit with the given index.
    pub fn coordinate(&self, index: QubitIndex) -> Option<Position2D> {
        self.coordinates.get(index.as_usize()).copied()
    }

    /// `(index, coordinate)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitIndex, Position2D)> + '_ {
        (0u32..)
            .zip(self.coordinates.iter())
            .map(|(i, c)| (QubitIndex(i), *c))
    }
}

impl From<Vec<Position2D>> for QubitMap {
    fn from(coordinates: Vec<Position2D>) -> Self {
        QubitMap::from_coordinates(coordinates)
    }
}

impl From<QubitMap> for Vec<Position2D> {
    fn from(map: QubitMap) -> Self {
        map.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitIndex(3)), "q3");
    }

    #[test]
    fn test_qubit_map_sorted_indices() {
        let map = QubitMap::from_coordinates([
            Position2D::new(2, 0),
            Position2D::new(0, 2),
            Position2D::new(0, 0),
            Position2D::new(0, 2),
        ]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of(Position2D::new(0, 0)), Some(QubitIndex(0)));
        assert_eq!(map.index_of(Position2D::new(2, 0)), Some(QubitIndex(2)));
        assert_eq!(map.coordinate(QubitIndex(1)), Some(Position2D::new(0, 2)));
        assert_eq!(map.index_of(Position2D::new(1, 1)), None);
    }
}
