use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    Spend,
    Performance,
    Projection,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Epoch milliseconds, UTC midnight of the day.
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBlock {
    pub id: String,
    pub title: String,
    pub metric_type: MetricType,
    pub time_range: String,
    pub data_points: Vec<DataPoint>,
    /// Always true for generated data; the dashboard renders a disclaimer.
    pub disclaimer_flag: bool,
}
