//! Engine-side types shared by the Arrow extension bridge.
//!
//! - [`LogicalType`]: the engine's logical type catalog, including the
//!   extension and opaque variants that carry Arrow annotations.
//! - [`NativeColumn`] / [`ColumnData`]: one column of engine values.
//! - [`NativeTable`]: an ordered set of equally long named columns, the shape
//!   of a materialized query result.
//! - [`internal`]: fixed-width byte layouts used where native values and Arrow
//!   storage share bytes (UUIDs).

pub mod internal;

pub mod errors;
pub use errors::*;

pub mod logical_type;
pub use logical_type::{ExtensionType, LogicalType, OpaqueType, TextLayout};

pub mod column;
pub use column::{ColumnData, NativeColumn};

pub mod table;
pub use table::NativeTable;

pub use uuid::Uuid;
