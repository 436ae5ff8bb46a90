//! Normalizer: maps the many résumé JSON dialects onto [`CanonicalResume`].
//!
//! Every field is read through an ordered chain of extraction strategies. The
//! first strategy that yields something non-empty wins; anything unrecognized
//! reads as empty. Nothing here can fail.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::resume::models::{
    CanonicalResume, Contact, EducationEntry, ExperienceEntry, ProjectEntry, RawDocument,
};

// ────────────────────────────────────────────────────────────────────────────
// Field synonyms, in priority order
// ────────────────────────────────────────────────────────────────────────────

const NAME: &[&[&str]] = &[&["name"], &["basics", "name"], &["full_name"]];
const TITLE: &[&[&str]] = &[&["title"], &["basics", "label"], &["headline"]];
const SUMMARY: &[&[&str]] = &[
    &["summary"],
    &["basics", "summary"],
    &["about"],
    &["objective"],
];

const EXPERIENCE_KEYS: &[&str] = &["experience", "work", "employment"];
const EXP_ROLE: &[&[&str]] = &[&["role"], &["title"], &["position"]];
const EXP_COMPANY: &[&[&str]] = &[&["company"], &["organization"], &["employer"], &["name"]];
const EXP_START: &[&[&str]] = &[&["start"], &["startDate"], &["start_date"], &["from"]];
const EXP_END: &[&[&str]] = &[&["end"], &["endDate"], &["end_date"], &["to"]];
const EXP_HIGHLIGHTS: &[&str] = &["bullets", "highlights", "responsibilities", "achievements"];

const PROJ_NAME: &[&[&str]] = &[&["name"], &["title"]];
const PROJ_DESCRIPTION: &[&[&str]] = &[&["description"], &["desc"], &["summary"]];
const PROJ_STACK: &[&str] = &["stack", "tech", "technologies", "tech_stack"];
const PROJ_HIGHLIGHTS: &[&str] = &["details", "highlights", "bullets"];

const EDU_INSTITUTION: &[&[&str]] = &[&["school"], &["institution"], &["university"], &["name"]];
const EDU_DEGREE: &[&[&str]] = &[&["degree"], &["studyType"]];
const EDU_FIELD: &[&[&str]] = &[&["field"], &["area"], &["major"], &["minor"]];
const EDU_START: &[&[&str]] = &[&["start"], &["startDate"]];
const EDU_END: &[&[&str]] = &[
    &["expected_graduation"],
    &["end"],
    &["endDate"],
    &["graduation"],
    &["year"],
];

const EMAIL: &[&[&str]] = &[&["contact", "email"], &["basics", "email"], &["email"]];
const LINKEDIN: &[&[&str]] = &[&["contact", "linkedin"], &["links", "linkedin"], &["linkedin"]];

const SKILL_KEYS: &[&str] = &["skills", "technical_skills"];

/// One way of reading a skills value. Returns an empty list when the shape
/// does not match.
type SkillShape = fn(&Value) -> Vec<String>;

const SKILL_SHAPES: &[SkillShape] = &[
    skills_from_flat_list,
    skills_from_keyword_groups,
    skills_from_category_buckets,
    skills_from_delimited_string,
];

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn normalize(raw: &RawDocument) -> CanonicalResume {
    let title = first_string(raw, TITLE);
    let summary = first_string(raw, SUMMARY)
        .or_else(|| title.as_ref().map(|t| format!("Currently {t}.")));

    let resume = CanonicalResume {
        name: first_string(raw, NAME),
        title,
        summary,
        location: extract_location(raw),
        target_roles: raw.get("target_roles").map(list_or_delimited).unwrap_or_default(),
        skills: extract_skills(raw),
        experience: extract_experience(raw),
        projects: extract_projects(raw),
        education: extract_education(raw),
        contact: extract_contact(raw),
    };

    debug!(
        experience = resume.experience.len(),
        projects = resume.projects.len(),
        skills = resume.skills.len(),
        education = resume.education.len(),
        "Résumé normalized"
    );

    resume
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn extract_skills(raw: &Value) -> Vec<String> {
    let mut skills = SKILL_KEYS
        .iter()
        .filter_map(|key| raw.get(*key))
        .find_map(|value| {
            SKILL_SHAPES
                .iter()
                .map(|shape| shape(value))
                .find(|found| !found.is_empty())
        })
        .unwrap_or_default();

    if let Some(spoken) = raw.get("languages_spoken") {
        skills.extend(string_list(spoken));
    }

    dedup_preserving_order(skills)
}

/// `["Rust", "Go"]`
fn skills_from_flat_list(value: &Value) -> Vec<String> {
    match value.as_array() {
        Some(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            items.iter().filter_map(scalar).collect()
        }
        _ => Vec::new(),
    }
}

/// `[{"name": "Backend", "keywords": ["Rust", "Postgres"]}]`
fn skills_from_keyword_groups(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .flat_map(|item| {
            if !item.is_object() {
                return scalar(item).into_iter().collect::<Vec<_>>();
            }
            let keywords = item.get("keywords").map(string_list).unwrap_or_default();
            if keywords.is_empty() {
                first_string(item, &[&["name"]]).into_iter().collect()
            } else {
                keywords
            }
        })
        .collect()
}

/// `{"programming_languages": ["Rust"], "software": "Figma"}`
fn skills_from_category_buckets(value: &Value) -> Vec<String> {
    let Some(buckets) = value.as_object() else {
        return Vec::new();
    };

    buckets
        .values()
        .flat_map(|bucket| match bucket {
            Value::Object(_) => skills_from_category_buckets(bucket),
            other => string_list(other),
        })
        .collect()
}

/// `"Rust, Go; SQL"`
fn skills_from_delimited_string(value: &Value) -> Vec<String> {
    value.as_str().map(split_delimited).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn extract_experience(raw: &Value) -> Vec<ExperienceEntry> {
    first_entries(raw, EXPERIENCE_KEYS)
        .into_iter()
        .map(|e| ExperienceEntry {
            role: first_string(e, EXP_ROLE),
            company: first_string(e, EXP_COMPANY),
            location: extract_location(e),
            start: first_string(e, EXP_START),
            end: first_string(e, EXP_END),
            highlights: first_list(e, EXP_HIGHLIGHTS),
        })
        .filter(ExperienceEntry::is_meaningful)
        .collect()
}

fn extract_projects(raw: &Value) -> Vec<ProjectEntry> {
    first_entries(raw, &["projects"])
        .into_iter()
        .map(|p| {
            let details = p.get("details").map(string_list).unwrap_or_default();
            let description = first_string(p, PROJ_DESCRIPTION)
                .or_else(|| (!details.is_empty()).then(|| details.join(" ")));

            ProjectEntry {
                name: first_string(p, PROJ_NAME),
                description,
                stack: extract_stack(p),
                highlights: first_list(p, PROJ_HIGHLIGHTS),
            }
        })
        .filter(ProjectEntry::is_meaningful)
        .collect()
}

fn extract_education(raw: &Value) -> Vec<EducationEntry> {
    first_entries(raw, &["education"])
        .into_iter()
        .map(|e| EducationEntry {
            institution: first_string(e, EDU_INSTITUTION),
            degree: first_string(e, EDU_DEGREE),
            field: first_string(e, EDU_FIELD),
            start: first_string(e, EDU_START),
            end: first_string(e, EDU_END),
        })
        .filter(EducationEntry::is_meaningful)
        .collect()
}

fn extract_contact(raw: &Value) -> Option<Contact> {
    let email = first_string(raw, EMAIL);
    let linkedin = first_string(raw, LINKEDIN).or_else(|| linkedin_profile(raw));

    if email.is_none() && linkedin.is_none() {
        return None;
    }
    Some(Contact { email, linkedin })
}

/// JSON Resume keeps social links under `basics.profiles[{network, url}]`.
fn linkedin_profile(raw: &Value) -> Option<String> {
    raw.pointer("/basics/profiles")?
        .as_array()?
        .iter()
        .find(|p| {
            p.get("network")
                .and_then(Value::as_str)
                .is_some_and(|n| n.eq_ignore_ascii_case("linkedin"))
        })
        .and_then(|p| first_string(p, &[&["url"], &["username"]]))
}

fn extract_location(value: &Value) -> Option<String> {
    [value.get("location"), value.pointer("/basics/location")]
        .into_iter()
        .flatten()
        .find_map(|loc| match loc {
            Value::Object(parts) => {
                let joined = ["city", "region", "country", "countryCode"]
                    .iter()
                    .filter_map(|k| parts.get(*k).and_then(scalar))
                    .collect::<Vec<_>>()
                    .join(", ");
                non_empty(joined)
            }
            other => scalar(other),
        })
}

fn extract_stack(project: &Value) -> Option<String> {
    PROJ_STACK
        .iter()
        .filter_map(|key| project.get(*key))
        .find_map(|value| match value {
            Value::Array(_) => non_empty(string_list(value).join(", ")),
            other => scalar(other),
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Value helpers
// ────────────────────────────────────────────────────────────────────────────

/// Strings are trimmed, numbers stringified; everything else is absent.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn first_string(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(scalar))
}

fn first_list(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .map(string_list)
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// Reads a list of strings from an array (scalars, or objects carrying a text
/// field) or a single scalar.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => {
                    first_string(item, &[&["text"], &["description"], &["name"], &["language"]])
                }
                other => scalar(other),
            })
            .collect(),
        other => scalar(other).into_iter().collect(),
    }
}

fn list_or_delimited(value: &Value) -> Vec<String> {
    match value.as_str() {
        Some(s) => split_delimited(s),
        None => string_list(value),
    }
}

fn split_delimited(s: &str) -> Vec<String> {
    s.split([',', ';', '|', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// First key holding entries. A lone object counts as a one-entry list.
fn first_entries<'a>(raw: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .map(|value| match value {
            Value::Array(items) => items.iter().filter(|i| i.is_object()).collect(),
            Value::Object(_) => vec![value],
            _ => Vec::new(),
        })
        .find(|entries: &Vec<&Value>| !entries.is_empty())
        .unwrap_or_default()
}

/// Exact-identity dedup: `"Go"` and `"go"` are distinct skills.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
