use chrono::{Duration, NaiveDate, Weekday};
use sales_forecast::models::{AdditiveModel, ForecastModel, TrainedForecastModel};
use sales_forecast::series::WeekdaySeries;
use sales_math::TrimPolicy;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sales Forecast: Basic Weekday Forecast Example");
    println!("==============================================\n");

    // Twenty Saturdays: not on sale for five weeks, then a slow upward trend
    let start = NaiveDate::from_ymd_opt(2024, 9, 7).ok_or("invalid start date")?;
    let dates: Vec<NaiveDate> = (0..20).map(|w| start + Duration::weeks(w)).collect();
    let values: Vec<f64> = (0..20)
        .map(|w| if w < 5 { 0.0 } else { 10.0 + 0.5 * w as f64 + (w % 3) as f64 })
        .collect();

    // The last four Saturdays are held out to score the forecast
    let holdout = values[16..].to_vec();
    let series = WeekdaySeries::new(
        Weekday::Sat,
        dates[..16].to_vec(),
        values[..16].to_vec(),
        4,
        TrimPolicy::FirstRun,
    )?;
    println!(
        "Series: {} Saturdays, {} dropped as pre-introduction\n",
        series.len(),
        series.trim_index()
    );

    let model = AdditiveModel::new(0.8)?;
    let trained = model.train(&series)?;
    println!("Trained {} model", trained.name());

    let forecast = trained.forecast(holdout.len())?;
    println!("\nForecast with {:.0}% intervals:", forecast.interval_width() * 100.0);
    for point in forecast.points() {
        println!(
            "  {}: {:.1} ({:.1}, {:.1})",
            point.date, point.value, point.lower, point.upper
        );
    }

    println!("\nPredicted: {:.1?}", forecast.values());
    println!("Actual:    {:.1?}", holdout);
    let mae = forecast.mean_absolute_error(&holdout)?;
    println!("Holdout mean absolute error: {:.2}", mae);

    Ok(())
}
