pub mod assistant;
pub mod domain;
pub mod error;
pub mod mock;
pub mod random;
pub mod seed;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_STREAM_CHUNK_SIZE: usize = 24;
    const DEFAULT_STREAM_CHUNK_DELAY_MS: u64 = 40;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub assistant_fixture_path: Option<String>,
        pub mock_seed: Option<u32>,
        pub stream_chunk_size: usize,
        pub stream_chunk_delay_ms: u64,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            // A seed that silently falls back to the daily seed defeats the point of setting it.
            let mock_seed = match std::env::var("MOCK_SEED") {
                Ok(s) if !s.trim().is_empty() => Some(
                    s.trim()
                        .parse::<u32>()
                        .with_context(|| format!("MOCK_SEED must be a u32 (got {s:?})"))?,
                ),
                _ => None,
            };

            let stream_chunk_size = std::env::var("ASSISTANT_STREAM_CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n >= 1)
                .unwrap_or(DEFAULT_STREAM_CHUNK_SIZE);

            let stream_chunk_delay_ms = std::env::var("ASSISTANT_STREAM_CHUNK_DELAY_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_STREAM_CHUNK_DELAY_MS);

            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                assistant_fixture_path: std::env::var("ASSISTANT_FIXTURE_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                mock_seed,
                stream_chunk_size,
                stream_chunk_delay_ms,
            })
        }

        pub fn stream_options(&self) -> crate::assistant::stream::StreamOptions {
            crate::assistant::stream::StreamOptions {
                chunk_size: self.stream_chunk_size,
                delay: Duration::from_millis(self.stream_chunk_delay_ms),
            }
        }
    }
}
