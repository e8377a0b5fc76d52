use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a food instance owned by the kitchen.
    pub struct FoodId;

    /// Identifies a seated customer.
    pub struct CustomerId;
}

/// A cell on the kitchen grid. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePoint {
    pub column: i32,
    pub row: i32,
}

impl TilePoint {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}

impl std::fmt::Display for TilePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}
