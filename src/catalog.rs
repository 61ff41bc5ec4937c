//! Fixed item catalog
//!
//! The contract stores stock per item index; the names here are what the
//! front-end displays. Order matches the contract's indexes.

use serde::Serialize;

use crate::VendingError;

/// One vending machine slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Item {
    pub index: usize,
    pub name: &'static str,
}

/// All items, in contract index order
pub const CATALOG: [Item; 4] = [
    Item {
        index: 0,
        name: "Apple Juice",
    },
    Item {
        index: 1,
        name: "Grape Juice",
    },
    Item {
        index: 2,
        name: "Coke",
    },
    Item {
        index: 3,
        name: "Water",
    },
];

/// Number of catalog entries
pub const ITEM_COUNT: usize = CATALOG.len();

/// Look up an item by index
pub fn item(index: usize) -> Result<&'static Item, VendingError> {
    CATALOG
        .get(index)
        .ok_or(VendingError::UnknownItem(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_indexes_match_positions() {
        for (position, item) in CATALOG.iter().enumerate() {
            assert_eq!(item.index, position);
        }
        assert_eq!(item(2).map(|i| i.name), Ok("Coke"));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        assert_eq!(item(ITEM_COUNT), Err(VendingError::UnknownItem(ITEM_COUNT)));
    }
}
