mod value;
pub use value::*;

/// A row returned by the warehouse: column name and cell, in projection order
pub type Row = Vec<(String, DataValue)>;
