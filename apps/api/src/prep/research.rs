//! Company research: a small built-in profile table, persisted as `research_data.json`.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::store::naming::RESEARCH_FILE;
use crate::store::FileStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub culture: String,
    pub values: String,
    pub interview_style: String,
    pub recent_news: String,
    pub role_requirements: String,
}

/// `research_data.json` on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRecord {
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    pub company_data: CompanyProfile,
}

struct KnownCompany {
    key: &'static str,
    name: &'static str,
    culture: &'static str,
    values: &'static str,
    interview_style: &'static str,
    recent_news: &'static str,
    role_requirements: &'static str,
}

const KNOWN_COMPANIES: [KnownCompany; 3] = [
    KnownCompany {
        key: "google",
        name: "Google",
        culture: "Innovation-focused, data-driven, collaborative",
        values: "Focus on user, think big, strive for excellence",
        interview_style: "Technical coding rounds, system design, behavioral",
        recent_news: "Focus on AI and machine learning initiatives",
        role_requirements: "Strong coding skills, system design knowledge, problem-solving",
    },
    KnownCompany {
        key: "netflix",
        name: "Netflix",
        culture: "High performance, freedom and responsibility",
        values: "People over process, innovation, impact",
        interview_style: "Behavioral questions, technical skills, culture fit",
        recent_news: "Expanding globally, investing in original content",
        role_requirements: "Scalability mindset, high-performance culture fit",
    },
    KnownCompany {
        key: "amazon",
        name: "Amazon",
        culture: "Customer obsession, ownership, invent and simplify",
        values: "Leadership principles, customer first, long-term thinking",
        interview_style: "Behavioral questions based on leadership principles, technical rounds",
        recent_news: "AWS growth, sustainability initiatives",
        role_requirements: "Leadership principles alignment, scalability focus",
    },
];

impl From<&KnownCompany> for CompanyProfile {
    fn from(c: &KnownCompany) -> Self {
        Self {
            name: c.name.to_string(),
            culture: c.culture.to_string(),
            values: c.values.to_string(),
            interview_style: c.interview_style.to_string(),
            recent_news: c.recent_news.to_string(),
            role_requirements: c.role_requirements.to_string(),
        }
    }
}

impl CompanyProfile {
    /// Profile for a company with no built-in entry.
    pub fn generic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            culture: "Innovation and collaboration focused".to_string(),
            values: "Quality, teamwork, continuous learning".to_string(),
            interview_style: "Mix of technical and behavioral questions".to_string(),
            recent_news: "Growing and hiring".to_string(),
            role_requirements: "Strong technical skills, team collaboration".to_string(),
        }
    }

    /// Context used when no research has been saved yet.
    fn fallback() -> Self {
        Self {
            name: "Generic Tech Company".to_string(),
            culture: "Collaborative, innovation-driven".to_string(),
            values: "Teamwork, customer focus".to_string(),
            interview_style: "Standard technical and behavioral".to_string(),
            recent_news: "Continual growth".to_string(),
            role_requirements: "Strong problem-solving, coding skills".to_string(),
        }
    }
}

/// Matches `company_name` against the built-in table, case-insensitively, accepting
/// containment in either direction ("Amazon Web Services" → Amazon, "goo" → Google).
pub fn lookup_company(company_name: &str) -> CompanyProfile {
    let needle = company_name.trim().to_lowercase();
    let found = (!needle.is_empty())
        .then(|| {
            KNOWN_COMPANIES
                .iter()
                .find(|c| needle.contains(c.key) || c.key.contains(needle.as_str()))
        })
        .flatten();

    match found {
        Some(company) => {
            info!("Found research profile for {}", company.name);
            CompanyProfile::from(company)
        }
        None => {
            info!("Using generic research profile for {company_name}");
            CompanyProfile::generic(company_name.trim())
        }
    }
}

pub fn save_research(store: &FileStore, profile: &CompanyProfile) -> Result<(), AppError> {
    let record = ResearchRecord {
        timestamp: Some(Local::now().naive_local()),
        company_data: profile.clone(),
    };
    store.write_json(RESEARCH_FILE, &record)?;
    info!("Saved research data for {}", profile.name);
    Ok(())
}

/// The saved profile, or a generic one when none is saved or it cannot be read.
pub fn load_research(store: &FileStore) -> Result<CompanyProfile, AppError> {
    match store.read_json::<ResearchRecord>(RESEARCH_FILE) {
        Ok(Some(record)) => Ok(record.company_data),
        Ok(None) => {
            info!("No research data saved; using generic context");
            Ok(CompanyProfile::fallback())
        }
        Err(crate::store::StoreError::Format { source, .. }) => {
            warn!("Research data is unreadable ({source}); using generic context");
            Ok(CompanyProfile::fallback())
        }
        Err(e) => Err(e.into()),
    }
}
