//! Preset schema and category order for the San Francisco Fire Department
//! calls-for-service dataset this tool was built around.
//!
//! The upstream export groups raw call types into seven coarse categories
//! and pivots them into one count column per category. Both that wide shape
//! and the pre-pivot long shape are described here so either file can be fed
//! to the loader without extra flags.

use crate::domain::{CategoryOrder, TableSchema, TableShape, WideColumn};

/// The seven call groups, in stacking (and legend) order.
pub const FIRE_CALL_GROUPS: [&str; 7] = [
    "Aid Other Agency",
    "Chemical / Electrical",
    "Fire",
    "Medical",
    "Misc Emergency",
    "Rescue",
    "Various Other",
];

pub const FIRE_DATE_COLUMN: &str = "Call Date";
pub const FIRE_DATE_FORMAT: &str = "%m/%d/%Y";

pub fn fire_category_order() -> CategoryOrder {
    CategoryOrder::new(FIRE_CALL_GROUPS)
}

/// Wide shape: one count column per call group, named after the group.
pub fn fire_wide_schema() -> TableSchema {
    TableSchema {
        date_column: FIRE_DATE_COLUMN.to_string(),
        date_format: FIRE_DATE_FORMAT.to_string(),
        shape: TableShape::Wide {
            columns: FIRE_CALL_GROUPS
                .iter()
                .map(|group| WideColumn {
                    column: group.to_string(),
                    category: group.to_string(),
                })
                .collect(),
        },
    }
}

/// Long shape: the pre-pivot grouped export, one `(date, group, count)` row.
pub fn fire_long_schema() -> TableSchema {
    TableSchema {
        date_column: FIRE_DATE_COLUMN.to_string(),
        date_format: FIRE_DATE_FORMAT.to_string(),
        shape: TableShape::Long {
            category_column: "Custom Grouping".to_string(),
            count_column: "Count".to_string(),
        },
    }
}
