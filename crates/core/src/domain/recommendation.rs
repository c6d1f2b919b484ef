use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationStatus {
    Prototype,
    ComingSoon,
    Future,
}

/// A dashboard recommendation card. Built fresh for every generation call and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationStub {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub impact_level: ImpactLevel,
    pub status: RecommendationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1-based, assigned during generation.
    pub display_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale_preview: Option<String>,
}
