//! Vocabulary: the fixed lookup tables every extraction step reads from.
//!
//! `Vocabulary::default()` carries the built-in tables. Deployments can extend
//! them with a JSON file (`ATS_VOCABULARY_PATH`) without touching matching logic:
//! entries in the file are appended to the built-ins, never replace them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::ats::normalizer::{normalize_with, SkillPattern};
use crate::errors::AtsError;

// ────────────────────────────────────────────────────────────────────────────
// Built-in tables
// ────────────────────────────────────────────────────────────────────────────

/// Technology terms detected in both resumes and job descriptions.
/// Variants that normalize to the same token (`reactjs`, `react.js`) are listed
/// separately so each spelling is detected.
const SKILLS: &[&str] = &[
    // languages
    "javascript", "typescript", "python", "java", "c++", "c#", "ruby", "php", "swift",
    "kotlin", "go", "golang", "rust",
    // frontend
    "react", "reactjs", "react.js", "angular", "vue", "vuejs", "vue.js", "svelte",
    "nextjs", "next.js", "nuxt", "gatsby",
    // backend
    "node", "nodejs", "node.js", "express", "django", "flask", "spring", "spring boot",
    "springboot", "laravel",
    // data stores
    "mongodb", "postgresql", "postgres", "mysql", "redis", "elasticsearch", "cassandra",
    // delivery
    "docker", "kubernetes", "k8s", "jenkins", "gitlab", "github actions", "terraform",
    // cloud
    "aws", "azure", "gcp", "heroku", "vercel", "netlify",
    // tooling
    "git", "jira", "confluence", "slack", "figma", "postman",
    // styling
    "html", "css", "sass", "tailwind", "bootstrap", "material-ui",
    // interfaces
    "sql", "nosql", "graphql", "rest", "api", "microservices",
    // practice
    "agile", "scrum", "kanban", "ci/cd", "devops", "testing", "jest", "mocha", "pytest",
];

/// Spelling variant → canonical token. No canonical token may itself be a key.
const SYNONYMS: &[(&str, &str)] = &[
    ("reactjs", "react"),
    ("react.js", "react"),
    ("nodejs", "node.js"),
    ("node", "node.js"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("nextjs", "next.js"),
    ("next", "next.js"),
    ("springboot", "spring boot"),
    ("spring-boot", "spring boot"),
    ("postgresql", "postgres"),
    ("mongodb", "mongo"),
    ("golang", "go"),
    ("k8s", "kubernetes"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("expressjs", "express"),
    ("angularjs", "angular"),
    ("tailwindcss", "tailwind"),
    ("cicd", "ci/cd"),
    ("google cloud", "gcp"),
    ("amazon web services", "aws"),
];

/// Certification names searched for (by substring) in job descriptions.
const JD_CERTIFICATIONS: &[&str] = &[
    "aws certified",
    "azure certified",
    "gcp certified",
    "pmp",
    "scrum master",
    "csm",
    "oracle certified",
    "cisco certified",
    "comptia",
    "ceh",
    "cissp",
];

/// Certification patterns tested (case-insensitively) against resumes.
const RESUME_CERTIFICATION_PATTERNS: &[&str] = &[
    r"aws certified",
    r"azure certified",
    r"google cloud certified",
    r"oracle certified",
    r"cisco certified",
    r"\bpmp\b",
    r"scrum master",
    r"\bcsm\b",
];

const DOMAINS: &[&str] = &[
    "fintech",
    "healthcare",
    "ecommerce",
    "saas",
    "edtech",
    "ai",
    "ml",
    "blockchain",
    "iot",
];

/// Alternate spellings folded into a canonical domain tag.
const DOMAIN_ALIASES: &[(&str, &str)] = &[("e-commerce", "ecommerce")];

/// Domains a single project can be attributed to.
const PROJECT_DOMAINS: &[&str] = &["fintech", "healthcare", "ecommerce", "saas", "edtech"];

const ROLES: &[&str] = &[
    "frontend",
    "backend",
    "fullstack",
    "full stack",
    "devops",
    "data",
    "mobile",
    "cloud",
    "security",
];

/// Phrases marking a JD line as company marketing rather than a requirement.
const HR_FLUFF: &[&str] = &[
    "we are",
    "we offer",
    "our company",
    "our mission",
    "our vision",
    "competitive salary",
    "great benefits",
    "work-life balance",
    "equal opportunity",
    "diversity",
    "inclusive",
    "culture",
];

static BUILTIN: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::build(VocabularyTables::builtin()).expect("built-in vocabulary tables are valid")
});

// ────────────────────────────────────────────────────────────────────────────
// Raw tables (built-in or loaded from JSON)
// ────────────────────────────────────────────────────────────────────────────

/// Uncompiled vocabulary tables. Also the on-disk format of an extension file;
/// every field is optional there.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyTables {
    pub skills: Vec<String>,
    pub synonyms: HashMap<String, String>,
    pub jd_certifications: Vec<String>,
    pub resume_certification_patterns: Vec<String>,
    pub domains: Vec<String>,
    pub domain_aliases: HashMap<String, String>,
    pub project_domains: Vec<String>,
    pub roles: Vec<String>,
    pub hr_fluff: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn owned_pairs(items: &[(&str, &str)]) -> HashMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl VocabularyTables {
    pub fn builtin() -> Self {
        Self {
            skills: owned(SKILLS),
            synonyms: owned_pairs(SYNONYMS),
            jd_certifications: owned(JD_CERTIFICATIONS),
            resume_certification_patterns: owned(RESUME_CERTIFICATION_PATTERNS),
            domains: owned(DOMAINS),
            domain_aliases: owned_pairs(DOMAIN_ALIASES),
            project_domains: owned(PROJECT_DOMAINS),
            roles: owned(ROLES),
            hr_fluff: owned(HR_FLUFF),
        }
    }

    /// Appends every entry of `other` to these tables.
    pub fn extend(&mut self, other: VocabularyTables) {
        self.skills.extend(other.skills);
        self.synonyms.extend(other.synonyms);
        self.jd_certifications.extend(other.jd_certifications);
        self.resume_certification_patterns
            .extend(other.resume_certification_patterns);
        self.domains.extend(other.domains);
        self.domain_aliases.extend(other.domain_aliases);
        self.project_domains.extend(other.project_domains);
        self.roles.extend(other.roles);
        self.hr_fluff.extend(other.hr_fluff);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Compiled vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Compiled, immutable lookup tables injected into the parsers and matcher.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: Vec<SkillPattern>,
    synonyms: HashMap<String, String>,
    jd_certifications: Vec<String>,
    resume_certifications: Vec<Regex>,
    domains: Vec<String>,
    domain_aliases: Vec<(String, String)>,
    project_domains: Vec<String>,
    roles: Vec<String>,
    hr_fluff: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Vocabulary {
    /// The shared built-in vocabulary.
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    /// Compiles raw tables. Fails on an invalid certification pattern or on a
    /// synonym chain (a canonical token that is itself a synonym key).
    pub fn build(tables: VocabularyTables) -> Result<Self, AtsError> {
        let synonyms: HashMap<String, String> = tables
            .synonyms
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_lowercase()))
            .collect();

        if let Some((variant, canonical)) = synonyms.iter().find(|(_, v)| synonyms.contains_key(*v))
        {
            return Err(AtsError::VocabularyFormat(format!(
                "synonym '{variant}' maps to '{canonical}', which is itself a synonym"
            )));
        }

        let mut skills: Vec<SkillPattern> = Vec::with_capacity(tables.skills.len());
        for term in lowercase_unique(tables.skills) {
            skills.push(SkillPattern::new(&term)?);
        }

        let resume_certifications = lowercase_unique(tables.resume_certification_patterns)
            .iter()
            .map(|pattern| Regex::new(&format!("(?i){pattern}")))
            .collect::<Result<Vec<_>, _>>()?;

        let mut domain_aliases: Vec<(String, String)> = tables
            .domain_aliases
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_lowercase()))
            .collect();
        domain_aliases.sort();

        let vocabulary = Self {
            skills,
            synonyms,
            jd_certifications: lowercase_unique(tables.jd_certifications),
            resume_certifications,
            domains: lowercase_unique(tables.domains),
            domain_aliases,
            project_domains: lowercase_unique(tables.project_domains),
            roles: lowercase_unique(tables.roles),
            hr_fluff: lowercase_unique(tables.hr_fluff),
        };

        debug!(
            "Vocabulary compiled: {} skills, {} synonyms, {} certifications",
            vocabulary.skills.len(),
            vocabulary.synonyms.len(),
            vocabulary.jd_certifications.len()
        );

        Ok(vocabulary)
    }

    /// Built-in tables extended with the entries of a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, AtsError> {
        let raw = std::fs::read_to_string(path)?;
        let extension: VocabularyTables = serde_json::from_str(&raw)?;
        info!(
            "Extending vocabulary from {} ({} extra skills)",
            path.display(),
            extension.skills.len()
        );

        let mut tables = VocabularyTables::builtin();
        tables.extend(extension);
        Self::build(tables)
    }

    /// Canonical form of a skill token under this vocabulary's synonym table.
    pub fn normalize(&self, raw: &str) -> String {
        normalize_with(&self.synonyms, raw)
    }

    pub fn skill_patterns(&self) -> &[SkillPattern] {
        &self.skills
    }

    pub fn jd_certifications(&self) -> &[String] {
        &self.jd_certifications
    }

    pub fn resume_certification_patterns(&self) -> &[Regex] {
        &self.resume_certifications
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn domain_aliases(&self) -> &[(String, String)] {
        &self.domain_aliases
    }

    pub fn project_domains(&self) -> &[String] {
        &self.project_domains
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// True if the (lower-cased) line is company marketing copy.
    pub fn is_hr_fluff(&self, line_lower: &str) -> bool {
        self.hr_fluff.iter().any(|p| line_lower.contains(p.as_str()))
    }
}

/// Trims, lower-cases and drops empty or repeated entries, keeping first-seen order.
fn lowercase_unique(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}
