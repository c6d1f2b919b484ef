use crate::domain::timeline::{DataPoint, MetricType, TimelineBlock};
use crate::error::GenerationError;
use crate::mock::{cycled_id, dedupe_to_minimum, pick_from_pool, CountBounds};
use crate::random::SeededRandom;
use crate::seed::create_daily_random;
use chrono::{Days, NaiveDate};
use std::f64::consts::PI;

const BOUNDS: CountBounds = CountBounds {
    min: 3,
    max_exclusive: 7,
};

pub const DEFAULT_WINDOW_DAYS: usize = 30;
pub const MIN_WINDOW_DAYS: usize = 10;

const SPEND_FLOOR: f64 = 100.0;
const OTHER_START: f64 = 500.0;
const OTHER_MAX: f64 = 1000.0;

#[derive(Debug, Clone, Copy)]
pub struct TimelineTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub metric_type: MetricType,
}

pub const TIMELINE_TEMPLATES: &[TimelineTemplate] = &[
    TimelineTemplate {
        id: "tl-daily-spend",
        title: "Daily cloud spend",
        metric_type: MetricType::Spend,
    },
    TimelineTemplate {
        id: "tl-compute-utilization",
        title: "Average compute utilization",
        metric_type: MetricType::Performance,
    },
    TimelineTemplate {
        id: "tl-savings-projection",
        title: "Projected monthly savings",
        metric_type: MetricType::Projection,
    },
    TimelineTemplate {
        id: "tl-commitment-coverage",
        title: "Commitment coverage (hours)",
        metric_type: MetricType::Other,
    },
    TimelineTemplate {
        id: "tl-storage-spend",
        title: "Daily storage spend",
        metric_type: MetricType::Spend,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TimelineGenerator<'a> {
    templates: &'a [TimelineTemplate],
    window_days: usize,
}

impl Default for TimelineGenerator<'static> {
    fn default() -> Self {
        Self {
            templates: TIMELINE_TEMPLATES,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl<'a> TimelineGenerator<'a> {
    pub fn new(templates: &'a [TimelineTemplate]) -> Self {
        Self {
            templates,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: usize) -> Result<Self, GenerationError> {
        if window_days < MIN_WINDOW_DAYS {
            return Err(GenerationError::WindowTooShort {
                min: MIN_WINDOW_DAYS,
                got: window_days,
            });
        }
        self.window_days = window_days;
        Ok(self)
    }

    pub fn time_range_label(&self) -> String {
        format!("LAST_{}_DAYS", self.window_days)
    }

    pub fn generate(&self, today: NaiveDate) -> Result<Vec<TimelineBlock>, GenerationError> {
        self.generate_with(&mut create_daily_random(today), today)
    }

    /// First day of the window ending at `today`. Dates near the edge of the
    /// calendar have no room for a full window.
    pub fn window_start(&self, today: NaiveDate) -> Result<NaiveDate, GenerationError> {
        let back = self.window_days.saturating_sub(1) as u64;
        today
            .checked_sub_days(Days::new(back))
            .ok_or(GenerationError::DateOutOfRange {
                date: today,
                window_days: self.window_days,
            })
    }

    /// At least three unique blocks, each with `window_days` points ending at
    /// `today` (UTC midnight) in chronological order.
    pub fn generate_with(
        &self,
        rng: &mut SeededRandom,
        today: NaiveDate,
    ) -> Result<Vec<TimelineBlock>, GenerationError> {
        let picks = pick_from_pool(rng, self.templates, BOUNDS, "timeline")?;
        let start = self.window_start(today)?;
        let time_range = self.time_range_label();

        let mut blocks = Vec::with_capacity(picks.len());
        for pick in picks {
            let t = pick.template;
            blocks.push(TimelineBlock {
                id: cycled_id(t.id, pick.cycle),
                title: t.title.to_string(),
                metric_type: t.metric_type,
                time_range: time_range.clone(),
                data_points: self.series(rng, t.metric_type, start),
                disclaimer_flag: true,
            });
        }

        dedupe_to_minimum(blocks, |b| b.id.as_str(), BOUNDS, "timeline")
    }

    fn series(&self, rng: &mut SeededRandom, metric: MetricType, start: NaiveDate) -> Vec<DataPoint> {
        let n = self.window_days;
        let mut walk = OTHER_START;
        let mut out = Vec::with_capacity(n);

        // Oldest day first; `start` is already checked to leave room for `n` days.
        for (i, day) in start.iter_days().take(n).enumerate() {
            let days_ago = n - 1 - i;
            let day_index = days_ago as f64;
            let elapsed = (i + 1) as f64;

            let value = match metric {
                MetricType::Spend => {
                    let base = 500.0 + rng.next_float(-200.0, 800.0);
                    let seasonal = 1.0 + 0.3 * (2.0 * PI * day_index / 7.0).sin();
                    (base * seasonal + rng.next_float(-100.0, 100.0)).max(SPEND_FLOOR)
                }
                MetricType::Performance => {
                    let trend = 75.0 + 15.0 * (2.0 * PI * day_index / 30.0).sin();
                    (trend + rng.next_float(-10.0, 10.0)).clamp(0.0, 100.0)
                }
                MetricType::Projection => {
                    (1000.0 + 20.0 * elapsed + rng.next_float(-150.0, 150.0)).max(0.0)
                }
                MetricType::Other => {
                    walk = (walk + rng.next_float(-50.0, 50.0)).clamp(0.0, OTHER_MAX);
                    walk
                }
            };

            out.push(DataPoint {
                timestamp: midnight_millis(day),
                value: round2(value),
            });
        }

        out
    }
}

pub fn generate_mock_timelines(today: NaiveDate) -> Result<Vec<TimelineBlock>, GenerationError> {
    TimelineGenerator::default().generate(today)
}

fn midnight_millis(day: NaiveDate) -> i64 {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
