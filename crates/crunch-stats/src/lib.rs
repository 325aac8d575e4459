#![doc = "Summaries of benchmark timing runs rendered as comparison tables."]

pub mod aggregate;
pub mod summary;
pub mod table;
pub mod timing;

pub use aggregate::{aggregate, StatsConfig};
pub use summary::Summary;
pub use table::{render_tables, Row, Table, TableFormat};
pub use timing::{load_times, result_path, Side};
