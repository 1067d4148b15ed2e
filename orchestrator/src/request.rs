//! Content request model and validation

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Types of content the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ContentType {
    BlogPost,
    SocialMedia,
    EmailCampaign,
    AdCopy,
    LandingPage,
    CaseStudy,
    Newsletter,
    Whitepaper,
}

impl ContentType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlogPost => "blog_post",
            Self::SocialMedia => "social_media",
            Self::EmailCampaign => "email_campaign",
            Self::AdCopy => "ad_copy",
            Self::LandingPage => "landing_page",
            Self::CaseStudy => "case_study",
            Self::Newsletter => "newsletter",
            Self::Whitepaper => "whitepaper",
        }
    }

    pub fn all() -> &'static [ContentType] {
        &[
            Self::BlogPost,
            Self::SocialMedia,
            Self::EmailCampaign,
            Self::AdCopy,
            Self::LandingPage,
            Self::CaseStudy,
            Self::Newsletter,
            Self::Whitepaper,
        ]
    }

    /// One-line description used by the CLI listing.
    pub fn description(&self) -> &'static str {
        match self {
            Self::BlogPost => "Long-form educational or informational content",
            Self::SocialMedia => "Short, engaging posts for social platforms",
            Self::EmailCampaign => "Email marketing content with strong CTAs",
            Self::AdCopy => "Persuasive copy for paid advertisements",
            Self::LandingPage => "Conversion-focused page content",
            Self::CaseStudy => "Problem-solution-results format content",
            Self::Newsletter => "Recurring digest mixing value with updates",
            Self::Whitepaper => "Authoritative, research-backed long-form content",
        }
    }

    /// Whether a draft of this type must carry a title.
    pub fn requires_title(&self) -> bool {
        !matches!(self, Self::SocialMedia)
    }

    /// Whether a draft of this type must carry a call to action.
    /// Emails always need one; ads and social posts never require one.
    pub fn requires_cta(&self, include_cta: bool) -> bool {
        match self {
            Self::EmailCampaign => true,
            Self::AdCopy | Self::SocialMedia => false,
            _ => include_cta,
        }
    }

    /// Format guidance substituted into the creative prompt.
    pub fn format_guidance(&self) -> &'static str {
        match self {
            Self::BlogPost => {
                "Structure with clear headings, include practical examples, keep it scannable."
            }
            Self::SocialMedia => {
                "Keep it short and shareable. Respect platform length norms. Lead with the hook."
            }
            Self::EmailCampaign => {
                "Compelling subject line, personalized opening, clear value proposition, strong CTA."
            }
            Self::AdCopy => "Benefits over features. Create urgency. Include social proof if possible.",
            Self::LandingPage => {
                "Strong headline, clear benefits, address objections, guide to a single action."
            }
            Self::CaseStudy => "Follow problem-solution-results structure with specific outcomes.",
            Self::Newsletter => "Mix valuable content with a personal touch and clear next steps.",
            Self::Whitepaper => "Authoritative, research-backed insights with actionable conclusions.",
        }
    }
}

/// Tone of the generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ToneStyle {
    #[default]
    Professional,
    Casual,
    Friendly,
    Authoritative,
    Conversational,
    Inspiring,
    Urgent,
}

impl ToneStyle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Friendly => "friendly",
            Self::Authoritative => "authoritative",
            Self::Conversational => "conversational",
            Self::Inspiring => "inspiring",
            Self::Urgent => "urgent",
        }
    }
}

/// Target length constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ContentLength {
    Short,
    Medium,
    Long,
    Extended,
}

impl ContentLength {
    /// Guidance substituted into the creative prompt.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Short => "Keep it concise (150-300 words). Focus on one key message.",
            Self::Medium => "Provide comprehensive coverage (500-800 words) with examples.",
            Self::Long => "Create in-depth content (1000-1500 words) with examples and data.",
            Self::Extended => "Develop extensive content (1500+ words) with detailed guidance.",
        }
    }
}

fn default_include_cta() -> bool {
    true
}

/// The job specification for one run. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content_type: ContentType,

    /// Target platform, e.g. "twitter", "linkedin", "website"
    pub platform: String,

    #[serde(default)]
    pub tone: ToneStyle,

    /// Persona id, resolved against the persona store
    pub persona_id: String,

    /// Main topic or brief
    pub topic: String,

    /// Additional background for the agents
    #[serde(default)]
    pub context: Option<String>,

    /// Keywords to weave into the content
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub length: Option<ContentLength>,

    #[serde(default = "default_include_cta")]
    pub include_cta: bool,
}

impl ContentRequest {
    /// Reject malformed requests before the state machine starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic must not be empty".to_string());
        }
        if self.persona_id.trim().is_empty() {
            return Err("persona_id must not be empty".to_string());
        }
        if self.platform.trim().is_empty() {
            return Err("platform must not be empty".to_string());
        }
        Ok(())
    }
}
