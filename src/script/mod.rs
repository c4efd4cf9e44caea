//! Table-of-tables script files: evaluation, table-stack reading and
//! path-assignment writing.

mod parse;
mod read;
mod value;
mod write;

pub use parse::{parse_script, ParseError};
pub use read::ScriptReader;
pub use value::{ScriptKey, ScriptTable, ScriptValue};
pub use write::ScriptWriter;
