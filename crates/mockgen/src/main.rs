use anyhow::Context;
use clap::{Parser, Subcommand};
use cloudsave_core::assistant::fixture::{FileFixtureSource, FixtureSource};
use cloudsave_core::assistant::{compose_reply, AssistantRequest};
use cloudsave_core::mock::recommendations::RecommendationGenerator;
use cloudsave_core::mock::timelines::TimelineGenerator;
use cloudsave_core::seed;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cloudsave_mockgen")]
#[command(about = "Print the deterministic dashboard mock data as JSON")]
struct Args {
    /// UTC date (YYYY-MM-DD or RFC 3339). Defaults to today.
    #[arg(long, global = true)]
    date: Option<String>,

    /// Fixed seed; bypasses the daily seed. Falls back to MOCK_SEED.
    #[arg(long, global = true)]
    seed: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved date and seed.
    Seed,
    Recommendations,
    Timelines {
        /// Days per series (minimum 10).
        #[arg(long, default_value_t = cloudsave_core::mock::timelines::DEFAULT_WINDOW_DAYS)]
        window_days: usize,
    },
    /// Answer a prompt from the assistant fixture.
    Assistant {
        #[arg(long)]
        prompt: String,

        /// Overrides ASSISTANT_FIXTURE_PATH.
        #[arg(long)]
        fixture: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = cloudsave_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(args, &settings).await {
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args, settings: &cloudsave_core::config::Settings) -> anyhow::Result<()> {
    let date = seed::resolve_date(args.date.as_deref(), chrono::Utc::now())?;
    let seed = args
        .seed
        .or(settings.mock_seed)
        .unwrap_or_else(|| seed::daily_seed(date));

    tracing::info!(%date, seed, "resolved mock inputs");

    let output = match args.command {
        Command::Seed => json!({ "date": date, "seed": seed }),
        Command::Recommendations => {
            let items = RecommendationGenerator::default()
                .generate_with(&mut seed::create_seeded_random(seed))?;
            json!({ "date": date, "seed": seed, "items": items })
        }
        Command::Timelines { window_days } => {
            let items = TimelineGenerator::default()
                .with_window_days(window_days)?
                .generate_with(&mut seed::create_seeded_random(seed), date)?;
            json!({ "date": date, "seed": seed, "items": items })
        }
        Command::Assistant { prompt, fixture } => {
            let request = AssistantRequest { prompt };
            let prompt = request.validated_prompt()?;
            let path = fixture
                .or_else(|| settings.assistant_fixture_path.clone())
                .context("pass --fixture or set ASSISTANT_FIXTURE_PATH")?;
            let source = FileFixtureSource::new(path);
            let fixture = source.load().await?;
            serde_json::to_value(compose_reply(&fixture, prompt)?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_sentry(settings: &cloudsave_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "cloudsave_mockgen",
            "timelines",
            "--window-days",
            "14",
            "--date",
            "2024-01-15",
            "--seed",
            "1327",
        ])
        .unwrap();
        assert_eq!(args.date.as_deref(), Some("2024-01-15"));
        assert_eq!(args.seed, Some(1327));
        assert!(matches!(args.command, Command::Timelines { window_days: 14 }));
    }

    #[test]
    fn timelines_default_to_thirty_days() {
        let args = Args::try_parse_from(["cloudsave_mockgen", "timelines"]).unwrap();
        assert!(matches!(args.command, Command::Timelines { window_days: 30 }));
    }

    #[test]
    fn assistant_requires_prompt() {
        assert!(Args::try_parse_from(["cloudsave_mockgen", "assistant"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_seed() {
        assert!(Args::try_parse_from(["cloudsave_mockgen", "seed", "--seed", "abc"]).is_err());
    }
}
