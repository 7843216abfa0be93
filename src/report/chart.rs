//! 融资时间线图表

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use crate::error::ChartError;
use crate::types::FundingRound;

/// 按 `%Y-%m-%d` 严格解析每一轮的日期
///
/// 归一化阶段只做字典序排序，不保证日期格式，因此这里遇到非法日期直接报错。
pub fn chart_points(timeline: &[FundingRound]) -> Result<Vec<(NaiveDate, f64)>, ChartError> {
    timeline
        .iter()
        .map(|round| {
            NaiveDate::parse_from_str(&round.date, "%Y-%m-%d")
                .map(|date| (date, round.amount_usd))
                .map_err(|_| ChartError::InvalidDate {
                    date: round.date.clone(),
                })
        })
        .collect()
}

/// 绘制带标记点的折线图，写入 `path`
pub fn plot_funding_timeline(
    timeline: &[FundingRound],
    company_name: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<PathBuf, ChartError> {
    let points = chart_points(timeline)?;
    plot_chart_points(&points, company_name, path, size)
}

/// 绘制已解析的时间线数据点
pub fn plot_chart_points(
    points: &[(NaiveDate, f64)],
    company_name: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<PathBuf, ChartError> {
    let draw_err = |e: &dyn std::fmt::Display| ChartError::Draw {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let series: Vec<(f64, f64)> = points
        .iter()
        .map(|(date, amount)| (day_number(date), *amount))
        .collect();
    let (x_min, x_max) = x_range(&series);
    let y_max = series
        .iter()
        .map(|(_, amount)| *amount)
        .fold(0f64, f64::max)
        .max(1.0)
        * 1.1;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} Funding Timeline", company_name), ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| draw_err(&e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Funding (USD)")
        .x_labels(6)
        .x_label_formatter(&|x| format_day(*x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(|e| draw_err(&e))?;

    chart
        .draw_series(LineSeries::new(series.iter().copied(), &BLUE))
        .map_err(|e| draw_err(&e))?;
    chart
        .draw_series(
            series
                .iter()
                .map(|point| Circle::new(*point, 4, BLUE.filled())),
        )
        .map_err(|e| draw_err(&e))?;

    root.present().map_err(|e| draw_err(&e))?;
    Ok(path.to_path_buf())
}

fn day_number(date: &NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 横轴范围；没有数据或只有一个日期时两侧各留出30天
fn x_range(series: &[(f64, f64)]) -> (f64, f64) {
    let min = series.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max = series
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        let today = day_number(&chrono::Utc::now().date_naive());
        return (today - 30.0, today + 30.0);
    }
    if max - min < 1.0 {
        return (min - 30.0, max + 30.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
