pub mod price;
pub mod yahoo;

pub use price::{PriceError, PricePoint, PriceSeries};
pub use yahoo::{DataError, YahooProvider};
