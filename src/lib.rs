//a Rust-based CAPM regression and return statistics tool for stocks

pub mod analysis;
pub mod config;
pub mod data;
pub mod report;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{
        align, daily_returns, fit_capm, AlignedReturns, CapmResult, ColumnStats, DescriptiveStats,
        RegressionError, ReturnPoint, ReturnSeries,
    };
    pub use crate::config::AnalysisConfiguration;
    pub use crate::data::{DataError, PriceError, PricePoint, PriceSeries, YahooProvider};
    pub use crate::report::{
        ensure_output_dir, render_all, write_capm_csv, write_stats_csv, CapmTable, StatsTable,
    };
}
