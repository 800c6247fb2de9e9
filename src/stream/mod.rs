//! Result-set reading
//!
//! * `RowCursor`: the cursor surface drivers expose
//! * `MaskingRowReader`: drop-in cursor wrapper that masks configured columns
//! * `MaskedRowStream`: the same masking for async row streams

mod cursor;
mod masked_stream;
mod masking_reader;

pub use cursor::{ColumnType, MemoryCursor, ResultSet, RowCursor, Value};
pub use masked_stream::MaskedRowStream;
pub use masking_reader::MaskingRowReader;
