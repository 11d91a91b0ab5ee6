//! Warehouse (depot) record.

use serde::{Deserialize, Serialize};

use super::{Point, WarehouseId};

/// A warehouse: the depot every route of its agents starts from.
///
/// Immutable for the duration of an allocation run.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::{Point, Warehouse, WarehouseId};
///
/// let wh = Warehouse::new(WarehouseId(1), Point::new(50.0, 50.0));
/// assert_eq!(wh.id(), WarehouseId(1));
/// assert_eq!(wh.location().x, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    id: WarehouseId,
    location: Point,
}

impl Warehouse {
    /// Creates a warehouse at the given coordinate.
    pub fn new(id: WarehouseId, location: Point) -> Self {
        Self { id, location }
    }

    /// Warehouse ID.
    pub fn id(&self) -> WarehouseId {
        self.id
    }

    /// Depot coordinate.
    pub fn location(&self) -> Point {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_new() {
        let wh = Warehouse::new(WarehouseId(3), Point::new(1.0, 2.0));
        assert_eq!(wh.id(), WarehouseId(3));
        assert_eq!(wh.location(), Point::new(1.0, 2.0));
    }
}
