pub mod charts;
pub mod export;
pub mod tables;

pub use charts::render_all;
pub use export::{ensure_output_dir, write_capm_csv, write_stats_csv};
pub use tables::{CapmTable, StatsTable};
