use crate::analysis::{CapmResult, DescriptiveStats};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};

//statistic row labels, in display order
pub const STAT_ROWS: [&str; 8] = [
    "Mean",
    "SD/Volatility",
    "Min.",
    "Max.",
    "Median",
    "Skewness",
    "Kurtosis",
    "Correlation",
];

//coefficient row labels, in display order
pub const CAPM_ROWS: [&str; 5] = ["Alpha", "Beta", "R2", "Adj. R2", "N"];

//descriptive statistics as a flat tabular record
//rows keyed by statistic name, columns are the two ticker labels
//correlation is stored once and reported under both columns
#[derive(Debug, Clone)]
pub struct StatsTable {
    pub asset_label: String,
    pub market_label: String,
    rows: IndexMap<String, (Option<f64>, Option<f64>)>,
}

impl StatsTable {
    pub fn from_stats(stats: &DescriptiveStats, asset_label: &str, market_label: &str) -> Self {
        let mut rows = IndexMap::new();
        rows.insert("Mean".to_string(), (stats.asset.mean, stats.market.mean));
        rows.insert(
            "SD/Volatility".to_string(),
            (stats.asset.std_dev, stats.market.std_dev),
        );
        rows.insert("Min.".to_string(), (stats.asset.min, stats.market.min));
        rows.insert("Max.".to_string(), (stats.asset.max, stats.market.max));
        rows.insert(
            "Median".to_string(),
            (stats.asset.median, stats.market.median),
        );
        rows.insert(
            "Skewness".to_string(),
            (stats.asset.skewness, stats.market.skewness),
        );
        rows.insert(
            "Kurtosis".to_string(),
            (stats.asset.kurtosis, stats.market.kurtosis),
        );
        rows.insert(
            "Correlation".to_string(),
            (stats.correlation, stats.correlation),
        );

        StatsTable {
            asset_label: asset_label.to_string(),
            market_label: market_label.to_string(),
            rows,
        }
    }

    //looks up one row by statistic name
    pub fn get(&self, statistic: &str) -> Option<(Option<f64>, Option<f64>)> {
        self.rows.get(statistic).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, Option<f64>, Option<f64>)> {
        self.rows.iter().map(|(name, &(a, m))| (name.as_str(), a, m))
    }

    //prints the record in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![
            Cell::new("Statistic"),
            Cell::new(&self.asset_label),
            Cell::new(&self.market_label),
        ]));

        for (name, asset, market) in self.rows() {
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format_value(asset)),
                Cell::new(&format_value(market)),
            ]));
        }

        table.printstd();
    }
}

//CAPM regression estimates as a flat tabular record
//rows keyed by coefficient name with an estimate and an optional p-value
#[derive(Debug, Clone)]
pub struct CapmTable {
    rows: IndexMap<String, (Option<f64>, Option<f64>)>,
}

impl CapmTable {
    pub fn from_result(result: &CapmResult) -> Self {
        let mut rows = IndexMap::new();
        rows.insert("Alpha".to_string(), (Some(result.alpha), result.p_alpha));
        rows.insert("Beta".to_string(), (Some(result.beta), result.p_beta));
        rows.insert("R2".to_string(), (result.r_squared, None));
        rows.insert("Adj. R2".to_string(), (result.adj_r_squared, None));
        rows.insert("N".to_string(), (Some(result.nobs as f64), None));

        CapmTable { rows }
    }

    //looks up one row by coefficient name
    pub fn get(&self, coefficient: &str) -> Option<(Option<f64>, Option<f64>)> {
        self.rows.get(coefficient).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, Option<f64>, Option<f64>)> {
        self.rows.iter().map(|(name, &(e, p))| (name.as_str(), e, p))
    }

    //prints the record in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![
            Cell::new("Coefficient"),
            Cell::new("Estimate"),
            Cell::new("p-value"),
        ]));

        for (name, estimate, p_value) in self.rows() {
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format_value(estimate)),
                Cell::new(&format_value(p_value)),
            ]));
        }

        table.printstd();
    }
}

//display formatting only, exported values keep full precision
fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v),
        Some(v) => format!("{:.6}", v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ColumnStats;

    fn sample_stats() -> DescriptiveStats {
        DescriptiveStats {
            asset: ColumnStats::from_values(&[0.02, -0.0098, 0.0396]),
            market: ColumnStats::from_values(&[0.01, -0.00495, 0.02985]),
            correlation: Some(0.997),
        }
    }

    #[test]
    fn stats_table_has_all_rows_in_order() {
        let table = StatsTable::from_stats(&sample_stats(), "MSFT", "SPY");
        let names: Vec<_> = table.rows().map(|(name, _, _)| name.to_string()).collect();
        assert_eq!(names, STAT_ROWS);
    }

    #[test]
    fn correlation_is_reported_for_both_columns() {
        let table = StatsTable::from_stats(&sample_stats(), "MSFT", "SPY");
        let (asset, market) = table.get("Correlation").unwrap();
        assert_eq!(asset, market);
        assert_eq!(asset, Some(0.997));
    }

    #[test]
    fn capm_table_populates_p_values_only_for_coefficients() {
        let result = CapmResult {
            alpha: 0.0004,
            beta: 1.1,
            r_squared: Some(0.62),
            adj_r_squared: Some(0.61),
            nobs: 250,
            p_alpha: Some(0.41),
            p_beta: Some(0.0001),
        };
        let table = CapmTable::from_result(&result);

        let names: Vec<_> = table.rows().map(|(name, _, _)| name.to_string()).collect();
        assert_eq!(names, CAPM_ROWS);

        assert_eq!(table.get("Alpha").unwrap().1, Some(0.41));
        assert_eq!(table.get("Beta").unwrap().1, Some(0.0001));
        assert_eq!(table.get("R2").unwrap().1, None);
        assert_eq!(table.get("Adj. R2").unwrap().1, None);
        assert_eq!(table.get("N").unwrap(), (Some(250.0), None));
    }

    #[test]
    fn missing_values_render_as_na() {
        assert_eq!(format_value(None), "n/a");
        assert_eq!(format_value(Some(250.0)), "250");
        assert_eq!(format_value(Some(0.123456789)), "0.123457");
    }
}
