pub mod descriptive;
pub mod regression;
pub mod returns;

pub use descriptive::{ColumnStats, DescriptiveStats};
pub use regression::{fit_capm, CapmResult, RegressionError};
pub use returns::{
    align, daily_returns, AlignedReturns, ReturnPoint, ReturnSeries, MIN_REGRESSION_OBS,
    MIN_VARIANCE_OBS,
};
