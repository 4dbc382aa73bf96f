//! Export tests: the CSV download must carry the same boundaries the report
//! hands to the chart layer.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;
use trendscope::io::format_timestamp;
use trendscope::{
    detect_trends, write_intervals_csv_file, AnalysisConfig, TimeSeries, TrendDirection,
    TrendMethod,
};

fn minute_series(values: &[f64]) -> TimeSeries {
    let t0 = Utc.with_ymd_and_hms(2024, 9, 2, 14, 0, 0).unwrap();
    TimeSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (t0 + TimeDelta::minutes(i as i64), Some(*v)))
            .collect(),
    )
    .unwrap()
}

fn sawtooth() -> TimeSeries {
    let values: Vec<f64> = (0..60).map(|i| ((i % 12) as f64 - 6.0).abs()).collect();
    minute_series(&values)
}

fn read_rows(csv_text: &str) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["method", "direction", "start", "end", "slope"]
    );
    reader.records().map(|r| r.unwrap()).collect()
}

#[test]
fn csv_rows_match_report_intervals() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        [analysis]
        window = "5min"
        methods = ["ols_slope", "linreg_slope", "kendall_tau"]
        direction = "decreasing"
        top_k = 3
        "#,
    )
    .unwrap();
    let request = config.to_request().unwrap();

    let report = detect_trends(&sawtooth(), &request).unwrap();
    let intervals = report.intervals();
    assert_eq!(intervals.len(), 9);

    let rows = read_rows(&report.to_csv_string().unwrap());
    assert_eq!(rows.len(), intervals.len());

    for (row, interval) in rows.iter().zip(&intervals) {
        assert_eq!(&row[0], interval.method.as_str());
        assert_eq!(&row[1], "Decreasing");
        assert_eq!(row[2], format_timestamp(&interval.start));
        assert_eq!(row[3], format_timestamp(&interval.end));
        assert_eq!(row[4].parse::<f64>().unwrap(), interval.score);

        let start: DateTime<Utc> = row[2].parse().unwrap();
        let end: DateTime<Utc> = row[3].parse().unwrap();
        assert_eq!(end - start, TimeDelta::minutes(5));
    }
}

#[test]
fn report_json_carries_the_same_boundaries() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        [analysis]
        window = "4min"
        methods = ["kendall_tau"]
        direction = "increasing"
        top_k = 2
        "#,
    )
    .unwrap();
    let report = detect_trends(&sawtooth(), &config.to_request().unwrap()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let exported = &json["results"][0]["intervals"];
    let intervals = report.for_method(TrendMethod::KendallTau).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), intervals.len());

    for (value, interval) in exported.as_array().unwrap().iter().zip(intervals) {
        let start: DateTime<Utc> = serde_json::from_value(value["start"].clone()).unwrap();
        assert_eq!(start, interval.start);
        assert_eq!(interval.end - interval.start, TimeDelta::minutes(4));
        assert_eq!(value["direction"], "increasing");
    }
}

#[test]
fn export_file_uses_configured_name() {
    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        "[analysis]\nwindow = \"3min\"\nmethods = [\"ols_slope\"]\n\n[export]\nfilename = \"drops.csv\""
    )
    .unwrap();

    let config = AnalysisConfig::from_file(config_file.path()).unwrap();
    let report = detect_trends(&sawtooth(), &config.to_request().unwrap()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = config.export_path(dir.path());
    write_intervals_csv_file(&report.intervals(), &path).unwrap();

    assert!(path.ends_with("drops.csv"));
    let rows = read_rows(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "ols_slope");
    assert!(rows[0][4].parse::<f64>().unwrap() < 0.0);
    assert_eq!(report.direction, TrendDirection::Decreasing);
}

#[test]
fn empty_report_exports_header_only() {
    let config = AnalysisConfig::from_toml_str("[analysis]\nmethods = [\"ols_slope\"]").unwrap();
    let report = detect_trends(&minute_series(&[1.0]), &config.to_request().unwrap()).unwrap();

    assert!(report.is_empty());
    assert_eq!(
        report.to_csv_string().unwrap(),
        "method,direction,start,end,slope\n"
    );
}
