//! Persona model and store
//!
//! Personas are owned by an external library; the pipeline only needs
//! `get(id)`. The in-memory store ships a few defaults and can load more
//! from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A marketing persona. Immutable once loaded for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub industry: String,

    #[serde(default)]
    pub experience_level: String,

    /// Ordered by priority
    pub primary_goals: Vec<String>,

    /// Ordered by severity; the persona agent preserves this order
    pub pain_points: Vec<String>,

    #[serde(default)]
    pub preferred_channels: Vec<String>,

    #[serde(default)]
    pub age_range: Option<String>,

    #[serde(default)]
    pub tone_preference: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only persona lookup boundary.
pub trait PersonaStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Persona>;

    /// All personas, for CLI listing. Order is unspecified.
    fn list(&self) -> Vec<Persona>;
}

/// Persona store backed by a map, seeded with built-in personas.
#[derive(Debug, Default)]
pub struct InMemoryPersonaStore {
    personas: HashMap<String, Persona>,
}

#[derive(Deserialize)]
struct PersonaFile {
    #[serde(default)]
    personas: Vec<Persona>,
}

impl InMemoryPersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the built-in personas.
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for persona in builtin_personas() {
            store.register(persona);
        }
        store
    }

    pub fn register(&mut self, persona: Persona) {
        self.personas.insert(persona.id.clone(), persona);
    }

    /// Merge personas from a JSON file (`{"personas": [...]}`) over the
    /// current contents. Entries with duplicate ids replace earlier ones.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let file: PersonaFile = serde_json::from_str(&content)?;
        let count = file.personas.len();
        for persona in file.personas {
            self.register(persona);
        }
        tracing::debug!(count, path = %path.display(), "loaded personas from file");
        Ok(count)
    }
}

impl PersonaStore for InMemoryPersonaStore {
    fn get(&self, id: &str) -> Option<Persona> {
        self.personas.get(id).cloned()
    }

    fn list(&self) -> Vec<Persona> {
        let mut personas: Vec<_> = self.personas.values().cloned().collect();
        personas.sort_by(|a, b| a.id.cmp(&b.id));
        personas
    }
}

/// Built-in personas matching the default persona library.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "startup_founder_tech".to_string(),
            name: "Tech Startup Founder".to_string(),
            industry: "technology".to_string(),
            experience_level: "intermediate".to_string(),
            primary_goals: vec![
                "Acquire early customers".to_string(),
                "Raise Series A funding".to_string(),
                "Build brand awareness".to_string(),
            ],
            pain_points: vec![
                "Limited marketing budget".to_string(),
                "Need quick, measurable results".to_string(),
                "Wearing multiple hats".to_string(),
            ],
            preferred_channels: vec![
                "social_media".to_string(),
                "content_marketing".to_string(),
                "email".to_string(),
            ],
            age_range: Some("28-40".to_string()),
            tone_preference: Some("innovative".to_string()),
            description: Some(
                "A tech-savvy entrepreneur building a disruptive product, focused on rapid growth."
                    .to_string(),
            ),
        },
        Persona {
            id: "marketing_manager_saas".to_string(),
            name: "SaaS Marketing Manager".to_string(),
            industry: "technology".to_string(),
            experience_level: "advanced".to_string(),
            primary_goals: vec![
                "Increase lead generation".to_string(),
                "Improve conversion rates".to_string(),
                "Reduce customer acquisition cost".to_string(),
            ],
            pain_points: vec![
                "Proving marketing ROI".to_string(),
                "Long sales cycles".to_string(),
                "Competitive market saturation".to_string(),
            ],
            preferred_channels: vec![
                "content_marketing".to_string(),
                "paid_ads".to_string(),
                "webinars".to_string(),
            ],
            age_range: Some("30-45".to_string()),
            tone_preference: Some("professional".to_string()),
            description: Some(
                "An experienced marketer focused on data-driven growth for B2B SaaS products."
                    .to_string(),
            ),
        },
        Persona {
            id: "content_creator_digital".to_string(),
            name: "Digital Content Creator".to_string(),
            industry: "media".to_string(),
            experience_level: "intermediate".to_string(),
            primary_goals: vec![
                "Grow audience engagement".to_string(),
                "Monetize content effectively".to_string(),
                "Build personal brand".to_string(),
            ],
            pain_points: vec![
                "Algorithm changes affecting reach".to_string(),
                "Burnout from constant content creation".to_string(),
                "Inconsistent income".to_string(),
            ],
            preferred_channels: vec![
                "social_media".to_string(),
                "video".to_string(),
                "podcasts".to_string(),
            ],
            age_range: Some("22-35".to_string()),
            tone_preference: Some("casual".to_string()),
            description: Some(
                "An independent creator balancing audience growth with sustainable output."
                    .to_string(),
            ),
        },
    ]
}
