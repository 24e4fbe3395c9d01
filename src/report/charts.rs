use crate::analysis::{AlignedReturns, DescriptiveStats};
use crate::config::AnalysisConfiguration;
use crate::data::PriceSeries;
use anyhow::Result;
use plotters::prelude::*;
use statrs::distribution::{Continuous, Normal};
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1280, 720);
const HISTOGRAM_BINS: usize = 30;

//renders every chart for the run into the output folder
pub fn render_all(
    dir: &Path,
    config: &AnalysisConfiguration,
    stock_prices: &PriceSeries,
    market_prices: &PriceSeries,
    aligned: &AlignedReturns,
    stats: &DescriptiveStats,
) -> Result<()> {
    price_chart(
        &dir.join("price_chart.png"),
        config,
        stock_prices,
        market_prices,
    )?;
    returns_chart(&dir.join("returns_chart.png"), config, aligned, stats)?;
    returns_histogram(&dir.join("returns_hist.png"), config, aligned, stats)?;
    cumulative_return_chart(&dir.join("cumulative_return_chart.png"), config, aligned)?;
    scatter_chart(&dir.join("returns_correlation.png"), config, aligned)?;
    Ok(())
}

//close price over time for both tickers in one plot
fn price_chart(
    path: &Path,
    config: &AnalysisConfiguration,
    stock: &PriceSeries,
    market: &PriceSeries,
) -> Result<()> {
    let Some((stock_first, stock_last)) = stock.date_range() else {
        return Ok(());
    };
    let Some((market_first, market_last)) = market.date_range() else {
        return Ok(());
    };

    let x_min = stock_first.min(market_first);
    let x_max = stock_last.max(market_last);
    let (y_min, y_max) = padded_bounds(stock.closes().chain(market.closes()));
    if x_min >= x_max {
        return Ok(());
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Price over Time for {} and {} ({} to {})",
                config.stock, config.market, config.start, config.end
            ),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_desc("Date")
        .y_desc("Close Price in USD")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            stock.points().iter().map(|p| (p.date, p.close)),
            &BLUE,
        ))?
        .label(config.stock.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            market.points().iter().map(|p| (p.date, p.close)),
            &RED,
        ))?
        .label(config.market.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

//daily returns over time, one panel per ticker, with mean and +-1 sigma bands
fn returns_chart(
    path: &Path,
    config: &AnalysisConfiguration,
    aligned: &AlignedReturns,
    stats: &DescriptiveStats,
) -> Result<()> {
    if aligned.len() < 2 {
        return Ok(());
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));

    let columns = [
        (&config.stock, &aligned.asset, &stats.asset),
        (&config.market, &aligned.market, &stats.market),
    ];

    for (panel, (label, values, column_stats)) in panels.iter().zip(columns) {
        let x_min = aligned.dates[0];
        let x_max = aligned.dates[aligned.len() - 1];
        let (y_min, y_max) = padded_bounds(values.iter().copied());

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("{} Daily Returns", label), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_desc("Date")
            .y_desc("Daily Return")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                aligned.dates.iter().copied().zip(values.iter().copied()),
                &BLUE,
            ))?
            .label("Daily Returns")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        if let (Some(mean), Some(sd)) = (column_stats.mean, column_stats.std_dev) {
            for (level, name, color) in [
                (mean, "Mean", RED),
                (mean + sd, "+1 sigma", full_palette::GREY),
                (mean - sd, "-1 sigma", full_palette::GREY),
            ] {
                chart
                    .draw_series(LineSeries::new(
                        [(x_min, level), (x_max, level)],
                        color.stroke_width(1),
                    ))?
                    .label(name)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

//density histograms of daily returns with the fitted normal curve overlaid
fn returns_histogram(
    path: &Path,
    config: &AnalysisConfiguration,
    aligned: &AlignedReturns,
    stats: &DescriptiveStats,
) -> Result<()> {
    if aligned.len() < 2 {
        return Ok(());
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let columns = [
        (&config.stock, &aligned.asset, &stats.asset),
        (&config.market, &aligned.market, &stats.market),
    ];

    for (panel, (label, values, column_stats)) in panels.iter().zip(columns) {
        let (Some(min), Some(max)) = (column_stats.min, column_stats.max) else {
            continue;
        };
        let width = (max - min) / HISTOGRAM_BINS as f64;
        if width <= 0.0 {
            continue;
        }

        let densities = bin_densities(values, min, width);

        //the normal pdf peaks at the mean
        let (normal, peak_pdf) = match (column_stats.mean, column_stats.std_dev) {
            (Some(mean), Some(sd)) if sd > 0.0 => match Normal::new(mean, sd) {
                Ok(n) => {
                    let peak = n.pdf(mean);
                    (Some(n), peak)
                }
                Err(_) => (None, 0.0),
            },
            _ => (None, 0.0),
        };

        let peak_density = densities.iter().copied().fold(0.0, f64::max);
        let y_max = peak_density.max(peak_pdf) * 1.1;

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("Density Plot of {} Daily Returns", label),
                ("sans-serif", 20),
            )
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(min..max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_desc("Daily Returns")
            .y_desc("Density")
            .draw()?;

        chart.draw_series(densities.iter().enumerate().map(|(i, &density)| {
            let x0 = min + i as f64 * width;
            Rectangle::new([(x0, 0.0), (x0 + width, density)], BLUE.mix(0.4).filled())
        }))?;

        if let Some(normal) = normal {
            chart
                .draw_series(LineSeries::new(
                    linspace(min, max, 100).map(|x| (x, normal.pdf(x))),
                    RED.stroke_width(2),
                ))?
                .label("Normal Curve")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
    }

    root.present()?;
    Ok(())
}

//cumulative return over time as the running product of 1 + r
fn cumulative_return_chart(
    path: &Path,
    config: &AnalysisConfiguration,
    aligned: &AlignedReturns,
) -> Result<()> {
    if aligned.len() < 2 {
        return Ok(());
    }

    let stock_cum = running_product(&aligned.asset);
    let market_cum = running_product(&aligned.market);

    let x_min = aligned.dates[0];
    let x_max = aligned.dates[aligned.len() - 1];
    let (y_min, y_max) = padded_bounds(stock_cum.iter().chain(&market_cum).copied());

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Cumulative Return over Time for {} and {} ({} to {})",
                config.stock, config.market, config.start, config.end
            ),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_desc("Date")
        .y_desc("Cumulative Return")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            aligned.dates.iter().copied().zip(stock_cum),
            &BLUE,
        ))?
        .label(config.stock.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            aligned.dates.iter().copied().zip(market_cum),
            &RED,
        ))?
        .label(config.market.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

//scatter of asset returns against market returns
fn scatter_chart(
    path: &Path,
    config: &AnalysisConfiguration,
    aligned: &AlignedReturns,
) -> Result<()> {
    if aligned.is_empty() {
        return Ok(());
    }

    let (x_min, x_max) = padded_bounds(aligned.market.iter().copied());
    let (y_min, y_max) = padded_bounds(aligned.asset.iter().copied());
    if x_min >= x_max || y_min >= y_max {
        return Ok(());
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Correlation Between {} and {} Daily Returns ({} to {})",
                config.market, config.stock, config.start, config.end
            ),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} Daily Return", config.market))
        .y_desc(format!("{} Daily Return", config.stock))
        .draw()?;

    chart.draw_series(
        aligned
            .market
            .iter()
            .zip(&aligned.asset)
            .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

//min and max with a small margin so lines do not touch the frame
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let pad = (max - min).abs().max(1e-9) * 0.05;
    (min - pad, max + pad)
}

fn bin_densities(values: &[f64], min: f64, width: f64) -> Vec<f64> {
    let mut counts = vec![0usize; HISTOGRAM_BINS];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }

    let norm = values.len() as f64 * width;
    counts.iter().map(|&c| c as f64 / norm).collect()
}

fn linspace(min: f64, max: f64, steps: usize) -> impl Iterator<Item = f64> {
    let step = (max - min) / (steps - 1) as f64;
    (0..steps).map(move |i| min + i as f64 * step)
}

//running product of 1 + r, the compounded growth of one unit
fn running_product(returns: &[f64]) -> Vec<f64> {
    let mut acc = 1.0;
    returns
        .iter()
        .map(|r| {
            acc *= 1.0 + r;
            acc
        })
        .collect()
}
