use crate::domain::recommendation::{ImpactLevel, RecommendationStatus, RecommendationStub};
use crate::error::GenerationError;
use crate::mock::{cycled_id, dedupe_to_minimum, pick_from_pool, CountBounds};
use crate::random::SeededRandom;
use crate::seed::create_daily_random;
use chrono::NaiveDate;

const BOUNDS: CountBounds = CountBounds {
    min: 5,
    max_exclusive: 9,
};

#[derive(Debug, Clone, Copy)]
pub struct RecommendationTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub short_description: &'static str,
    pub impact_level: ImpactLevel,
    pub status: RecommendationStatus,
    pub category: Option<&'static str>,
    pub rationale_preview: Option<&'static str>,
}

pub const RECOMMENDATION_TEMPLATES: &[RecommendationTemplate] = &[
    RecommendationTemplate {
        id: "rec-ec2-rightsizing",
        title: "Rightsize over-provisioned EC2 instances",
        short_description: "Several instances average under 20% CPU over the last 30 days.",
        impact_level: ImpactLevel::High,
        status: RecommendationStatus::Prototype,
        category: Some("compute"),
        rationale_preview: Some("Dropping one instance size typically halves the hourly rate."),
    },
    RecommendationTemplate {
        id: "rec-compute-savings-plan",
        title: "Adopt a 1-year Compute Savings Plan",
        short_description: "Steady baseline compute usage is billed entirely at on-demand rates.",
        impact_level: ImpactLevel::High,
        status: RecommendationStatus::ComingSoon,
        category: Some("commitments"),
        rationale_preview: Some("Committing to the observed floor covers usage without lock-in risk."),
    },
    RecommendationTemplate {
        id: "rec-idle-ebs-volumes",
        title: "Delete unattached EBS volumes",
        short_description: "Volumes detached for more than two weeks still accrue storage charges.",
        impact_level: ImpactLevel::Medium,
        status: RecommendationStatus::Prototype,
        category: Some("storage"),
        rationale_preview: None,
    },
    RecommendationTemplate {
        id: "rec-s3-intelligent-tiering",
        title: "Move infrequently accessed S3 data to Intelligent-Tiering",
        short_description: "Large buckets show few reads after the first 30 days.",
        impact_level: ImpactLevel::Medium,
        status: RecommendationStatus::ComingSoon,
        category: Some("storage"),
        rationale_preview: Some("Tiering moves cold objects automatically with no retrieval fees."),
    },
    RecommendationTemplate {
        id: "rec-rds-reserved",
        title: "Reserve steady-state RDS capacity",
        short_description: "Production databases have run continuously for the past quarter.",
        impact_level: ImpactLevel::High,
        status: RecommendationStatus::Future,
        category: Some("database"),
        rationale_preview: None,
    },
    RecommendationTemplate {
        id: "rec-nat-gateway-traffic",
        title: "Reduce NAT Gateway data processing charges",
        short_description: "Traffic to S3 and DynamoDB is routed through NAT instead of endpoints.",
        impact_level: ImpactLevel::Low,
        status: RecommendationStatus::Future,
        category: Some("networking"),
        rationale_preview: Some("Gateway endpoints for S3 and DynamoDB carry no per-GB charge."),
    },
    RecommendationTemplate {
        id: "rec-graviton-migration",
        title: "Migrate eligible workloads to Graviton",
        short_description: "Containerized services could run on ARM instances at a lower price.",
        impact_level: ImpactLevel::Medium,
        status: RecommendationStatus::Future,
        category: Some("compute"),
        rationale_preview: None,
    },
    RecommendationTemplate {
        id: "rec-dev-schedules",
        title: "Stop non-production environments off-hours",
        short_description: "Development and staging stacks run around the clock.",
        impact_level: ImpactLevel::Low,
        status: RecommendationStatus::Prototype,
        category: Some("operations"),
        rationale_preview: Some("Running only during working hours cuts their runtime by about 70%."),
    },
];

/// Samples a daily batch of recommendation cards from a template pool.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationGenerator<'a> {
    templates: &'a [RecommendationTemplate],
}

impl Default for RecommendationGenerator<'static> {
    fn default() -> Self {
        Self::new(RECOMMENDATION_TEMPLATES)
    }
}

impl<'a> RecommendationGenerator<'a> {
    pub fn new(templates: &'a [RecommendationTemplate]) -> Self {
        Self { templates }
    }

    pub fn generate(&self, date: NaiveDate) -> Result<Vec<RecommendationStub>, GenerationError> {
        self.generate_with(&mut create_daily_random(date))
    }

    /// At least five unique stubs sorted by `display_order`.
    pub fn generate_with(
        &self,
        rng: &mut SeededRandom,
    ) -> Result<Vec<RecommendationStub>, GenerationError> {
        let picks = pick_from_pool(rng, self.templates, BOUNDS, "recommendation")?;

        let stubs: Vec<RecommendationStub> = picks
            .into_iter()
            .map(|pick| {
                let t = pick.template;
                RecommendationStub {
                    id: cycled_id(t.id, pick.cycle),
                    title: t.title.to_string(),
                    short_description: t.short_description.to_string(),
                    impact_level: t.impact_level,
                    status: t.status,
                    category: t.category.map(str::to_string),
                    display_order: pick.display_order,
                    rationale_preview: t.rationale_preview.map(str::to_string),
                }
            })
            .collect();

        let mut stubs = dedupe_to_minimum(stubs, |s| s.id.as_str(), BOUNDS, "recommendation")?;
        stubs.sort_by_key(|s| s.display_order);
        Ok(stubs)
    }
}

pub fn generate_mock_recommendations(
    date: NaiveDate,
) -> Result<Vec<RecommendationStub>, GenerationError> {
    RecommendationGenerator::default().generate(date)
}
