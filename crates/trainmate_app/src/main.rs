use std::sync::Arc;

use anyhow::{Context, bail};
use trainmate_app::Session;
use trainmate_app::screens::{CategoriesScreen, HomeScreen, ProfileScreen};
use trainmate_client::config::Config;
use trainmate_client::http_client::ReqwestTrainmateClient;

const USAGE: &str = "usage: trainmate <dashboard|categories|profile>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `TRAINMATE_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("TRAINMATE_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Keep the HTTP stack quiet unless asked for explicitly
    let combined_filter = format!("{log_env},hyper=warn,reqwest=warn");
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("trainmate: log filter: {}", log_env);

    let screen = std::env::args().nth(1).unwrap_or_else(|| "dashboard".into());

    let config = Config::from_env().context("loading configuration")?;
    let client = ReqwestTrainmateClient::new(&config.base_url).context("building HTTP client")?;
    let session =
        Session::new(Arc::new(client), config.token).with_user_email(config.user_email);
    tracing::info!("trainmate: using API at {}", config.base_url);

    match screen.as_str() {
        "dashboard" => dashboard(session).await,
        "categories" => categories(session).await,
        "profile" => profile(session).await,
        other => bail!("unknown screen {other:?}\n{USAGE}"),
    }
}

async fn dashboard(session: Session) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let mut home = HomeScreen::new(session, today);
    if let Err(e) = home.init().await {
        // Partial data is still worth showing.
        tracing::warn!("dashboard loaded with errors: {e}");
    }

    println!("Workouts");
    for row in home.workout_rows() {
        println!(
            "  {:<6} {:<20} {:>5.0} min {:>7.0} kcal  [{:?}]",
            row.date_label, row.exercise, row.duration_minutes, row.calories, row.glyph
        );
    }
    println!("Calories per day");
    for point in home.chart() {
        println!("  {}  {:>7.0}", point.label, point.calories);
    }
    let rejected = home.calories_per_day().rejected();
    if !rejected.is_empty() {
        println!("  ({} malformed records skipped)", rejected.len());
    }
    Ok(())
}

async fn categories(session: Session) -> anyhow::Result<()> {
    let mut screen = CategoriesScreen::new(session);
    screen.init().await?;
    for entry in screen.categories() {
        let icon = entry.icon().map(|h| h.name()).unwrap_or("-");
        let marker = if entry.category.is_custom { " (custom)" } else { "" };
        println!("{} [{}]{}", entry.category.name, icon, marker);
        for exercise in &entry.exercises {
            println!("  {:<24} {:>6.0} kcal/h", exercise.name, exercise.calories_per_hour);
        }
    }
    Ok(())
}

async fn profile(session: Session) -> anyhow::Result<()> {
    let mut screen = ProfileScreen::new(session);
    screen.init().await?;
    let form = screen.form();
    println!("Name:     {}", form.full_name);
    println!("Email:    {}", screen.email().unwrap_or("-"));
    println!("Gender:   {}", form.gender);
    println!("Weight:   {} kg", form.weight);
    println!("Height:   {} cm", form.height);
    println!("Birthday: {}", form.birthday);
    if screen.has_missing_fields() {
        println!("Profile is incomplete; fill in the missing fields.");
    }
    Ok(())
}
