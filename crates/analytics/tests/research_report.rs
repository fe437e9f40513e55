use analytics::{AtmosphericAnalyzer, Severity, TrendClassification};
use chrono::{Duration, TimeZone, Utc};
use core_types::{HourlySample, Variable};

/// A week of hourly weather with a diurnal cycle, a slow pressure fall, some
/// dropped readings, one sensor spike and one physically impossible value.
fn week_of_weather() -> Vec<HourlySample> {
    let start = Utc.with_ymd_and_hms(2024, 4, 8, 0, 0, 0).unwrap();
    (0..168)
        .map(|h| {
            let x = h as f64;
            let diurnal = (x / 24.0 * std::f64::consts::TAU).sin();
            let mut sample = HourlySample::new(start + Duration::hours(h))
                .with(Variable::Temperature, 12.0 + 6.0 * diurnal)
                .with(Variable::RelativeHumidity, 70.0 - 15.0 * diurnal)
                .with(Variable::Pressure, 1020.0 - 0.05 * x + 0.3 * (x * 0.7).cos())
                .with(Variable::WindSpeed, 5.0 + 2.0 * (x * 0.3).sin())
                .with(Variable::Irradiance, (600.0 * diurnal).max(0.0));
            if h % 17 == 0 {
                sample.fields.remove(&Variable::RelativeHumidity);
            }
            if h == 100 {
                sample = sample.with(Variable::WindSpeed, 40.0);
            }
            if h == 150 {
                sample = sample.with(Variable::Pressure, 640.0);
            }
            sample
        })
        .collect()
}

#[test]
fn full_report_over_a_week() {
    let series = week_of_weather();
    let report = AtmosphericAnalyzer::default().analyze("Bergen / 2024-W15", &series);

    assert_eq!(report.sample_count, 168);
    for (variable, stats) in &report.statistics {
        assert_eq!(
            stats.count + stats.missing_count,
            series.len(),
            "count invariant broken for {variable}"
        );
    }
    assert_eq!(report.statistics[&Variable::RelativeHumidity].missing_count, 10);
    assert_eq!(report.statistics[&Variable::Precipitation].count, 0);

    let matrix = report.correlations.as_ref().unwrap();
    assert!(!matrix.variables.contains(&Variable::Precipitation));
    let r = matrix
        .coefficient(Variable::Temperature, Variable::RelativeHumidity)
        .unwrap();
    assert!(r < -0.95);

    let anomalies = report.anomalies.as_ref().unwrap();
    let spike = anomalies
        .iter()
        .find(|a| a.variable == Variable::WindSpeed)
        .expect("wind spike should be flagged");
    assert_eq!(spike.observed, 40.0);
    assert_eq!(spike.severity, Severity::Extreme);

    let quality = &report.quality;
    assert_eq!(quality.outlier_count, 1);
    assert_eq!(quality.suspicious_values[0].variable, Variable::Pressure);
    assert_eq!(quality.complete_samples, 158);
    assert!(quality.quality_score > 0.0 && quality.quality_score < 100.0);
}

#[test]
fn analysis_is_deterministic() {
    let series = week_of_weather();
    let analyzer = AtmosphericAnalyzer::default();
    let first = analyzer.analyze("site", &series);
    let second = analyzer.analyze("site", &series);
    assert_eq!(first, second);
}

#[test]
fn empty_series_produces_zeroed_report() {
    let report = AtmosphericAnalyzer::default().analyze("nowhere", &[]);
    assert_eq!(report.sample_count, 0);
    assert!(report.period_start.is_none());
    assert!(report.statistics.values().all(|s| s.count == 0 && s.missing_count == 0));
    assert_eq!(report.quality.quality_score, 0.0);
    assert!(report.trends.unwrap().is_empty());
    assert!(report.anomalies.unwrap().is_empty());
    assert!(report.correlations.unwrap().variables.is_empty());
}

#[test]
fn pressure_fall_is_detected_as_decreasing() {
    let series: Vec<HourlySample> = week_of_weather()
        .into_iter()
        .filter(|s| s.get(Variable::Pressure).is_some_and(|p| p > 800.0))
        .collect();
    let report = AtmosphericAnalyzer::default().analyze("site", &series);
    let trend = report
        .trends
        .unwrap()
        .into_iter()
        .find(|t| t.variable == Variable::Pressure)
        .unwrap();
    assert_eq!(trend.classification, TrendClassification::Decreasing);
    assert!(trend.slope < 0.0);
}
