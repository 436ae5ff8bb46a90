//! Shortcut Router: deterministic answers for common intents.
//!
//! Greeting, experience, projects, skills and education questions are answered
//! straight from the canonical résumé: no retrieval, no model call.
//!
//! Every sentence template drops the clauses it has no data for, so a missing
//! date never leaves a `()` behind and a missing company never leaves a
//! dangling "at".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resume::models::{CanonicalResume, EducationEntry, ExperienceEntry, ProjectEntry};

pub const NO_EXPERIENCE: &str =
    "I do not have experience details available in my current resume data.";
pub const NO_PROJECTS: &str = "I do not have project details available in my current resume data.";
pub const NO_SKILLS: &str = "I do not have skills listed in the current resume data.";
pub const NO_EDUCATION: &str =
    "I do not have education details available in my current resume data.";
pub const NO_PROFILE: &str = "I do not have any resume details available right now.";

const EXPERIENCE_LIMIT: usize = 5;
const PROJECT_LIMIT: usize = 5;
const TOP_PROJECTS: usize = 3;
const GREETING_SECTION_LIMIT: usize = 3;
const HIGHLIGHTS_PER_JOB: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Experience,
    TopProjects,
    Projects,
    Skills,
    Education,
}

/// Ordered intent rules; the first match wins.
static INTENT_RULES: Lazy<Vec<(Intent, Regex)>> = Lazy::new(|| {
    [
        (Intent::Greeting, r"^(?:$|(?:hi|hello|hey)\b)"),
        (Intent::Experience, r"^experience\??$|summarize.*experience"),
        (Intent::TopProjects, r"top\s*3\s*projects?"),
        (Intent::Projects, r"projects?|portfolio"),
        (Intent::Skills, r"skills?"),
        (Intent::Education, r"education|degree|university|college"),
    ]
    .into_iter()
    .map(|(intent, pattern)| (intent, Regex::new(pattern).expect("intent pattern is valid")))
    .collect()
});

pub fn detect_intent(question: &str) -> Option<Intent> {
    let q = question.trim().to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(_, re)| re.is_match(&q))
        .map(|(intent, _)| *intent)
}

/// Answers `question` directly when it matches a known intent; `None` sends
/// the caller to full retrieval.
pub fn route(question: &str, resume: &CanonicalResume) -> Option<String> {
    let answer = match detect_intent(question)? {
        Intent::Greeting => generic_summary(resume),
        Intent::Experience => summarize_experience(resume, EXPERIENCE_LIMIT, true),
        Intent::TopProjects => summarize_projects(resume, TOP_PROJECTS),
        Intent::Projects => summarize_projects(resume, PROJECT_LIMIT),
        Intent::Skills => summarize_skills(resume),
        Intent::Education => {
            summarize_education(resume).unwrap_or_else(|| NO_EDUCATION.to_string())
        }
    };
    Some(answer)
}

// ────────────────────────────────────────────────────────────────────────────
// Section summaries
// ────────────────────────────────────────────────────────────────────────────

pub fn summarize_experience(resume: &CanonicalResume, max: usize, with_intro: bool) -> String {
    let items: Vec<String> = resume
        .experience
        .iter()
        .take(max)
        .filter_map(experience_sentence)
        .collect();
    if items.is_empty() {
        return NO_EXPERIENCE.to_string();
    }

    let intro = resume
        .summary
        .as_deref()
        .filter(|_| with_intro)
        .map(|s| first_sentences(s, 1))
        .filter(|s| !s.is_empty());

    intro.into_iter().chain(items).collect::<Vec<_>>().join(" ")
}

pub fn summarize_projects(resume: &CanonicalResume, max: usize) -> String {
    if resume.projects.is_empty() {
        return NO_PROJECTS.to_string();
    }
    resume
        .projects
        .iter()
        .take(max)
        .map(project_sentence)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn summarize_skills(resume: &CanonicalResume) -> String {
    if resume.skills.is_empty() {
        return NO_SKILLS.to_string();
    }
    let skills = resume.skills.join(", ");
    match &resume.name {
        Some(name) => sentence(&format!("{name}'s primary skills include {skills}")),
        None => sentence(&format!("Primary skills include {skills}")),
    }
}

/// `None` when there is nothing to say about education.
pub fn summarize_education(resume: &CanonicalResume) -> Option<String> {
    let items: Vec<String> = resume
        .education
        .iter()
        .filter_map(education_sentence)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items.join(" "))
    }
}

/// Greeting answer: a short tour of every populated section.
pub fn generic_summary(resume: &CanonicalResume) -> String {
    let mut parts = Vec::new();

    if let Some(summary) = &resume.summary {
        parts.push(first_sentences(summary, 2));
    }
    if !resume.experience.is_empty() {
        parts.push(summarize_experience(resume, GREETING_SECTION_LIMIT, false));
    }
    if !resume.projects.is_empty() {
        parts.push(format!(
            "Projects: {}",
            summarize_projects(resume, GREETING_SECTION_LIMIT)
        ));
    }
    if !resume.skills.is_empty() {
        parts.push(summarize_skills(resume));
    }
    if let Some(education) = summarize_education(resume) {
        parts.push(education);
    }

    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        return NO_PROFILE.to_string();
    }
    parts.join("\n\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Sentence templates
// ────────────────────────────────────────────────────────────────────────────

/// `"Engineer at Acme (2020 - 2022). Key contributions include Built X."`
fn experience_sentence(job: &ExperienceEntry) -> Option<String> {
    let head = match (&job.role, &job.company) {
        (Some(role), Some(company)) => Some(format!("{role} at {company}")),
        (Some(role), None) => Some(role.clone()),
        (None, Some(company)) => Some(format!("A role at {company}")),
        (None, None) => None,
    };
    let dates = span(&job.start, &job.end);

    let mut clauses = Vec::new();
    match (head, dates) {
        (Some(head), Some(dates)) => clauses.push(sentence(&format!("{head} ({dates})"))),
        (Some(head), None) => clauses.push(sentence(&head)),
        (None, Some(dates)) => clauses.push(sentence(&format!("A role ({dates})"))),
        (None, None) => {}
    }

    let highlights: Vec<&str> = job
        .highlights
        .iter()
        .take(HIGHLIGHTS_PER_JOB)
        .map(|h| h.trim().trim_end_matches(['.', ';']))
        .filter(|h| !h.is_empty())
        .collect();
    if !highlights.is_empty() {
        clauses.push(sentence(&format!(
            "Key contributions include {}",
            highlights.join("; ")
        )));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}

/// `"Chatbot using Rust, axum. Answers questions."`
fn project_sentence(project: &ProjectEntry) -> String {
    let name = project.name.as_deref().unwrap_or("A project");
    let head = match &project.stack {
        Some(stack) => sentence(&format!("{name} using {stack}")),
        None => sentence(name),
    };

    match project.description.as_deref().map(|d| first_sentences(d, 1)) {
        Some(desc) if !desc.is_empty() => format!("{head} {}", sentence(&desc)),
        _ => head,
    }
}

/// `"B.S. in Statistics at State University (2026)."`
fn education_sentence(edu: &EducationEntry) -> Option<String> {
    let label = [edu.degree.as_deref(), edu.field.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" in ");

    let head = match (label.is_empty(), &edu.institution) {
        (false, Some(inst)) => format!("{label} at {inst}"),
        (false, None) => label,
        (true, Some(inst)) => format!("Studied at {inst}"),
        (true, None) => return None,
    };

    Some(match span(&edu.start, &edu.end) {
        Some(dates) => sentence(&format!("{head} ({dates})")),
        None => sentence(&head),
    })
}

fn span(start: &Option<String>, end: &Option<String>) -> Option<String> {
    let joined = [start.as_deref(), end.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" - ");
    Some(joined).filter(|s| !s.is_empty())
}

/// Terminates with a period unless the text already ends a sentence.
fn sentence(text: &str) -> String {
    let text = text.trim();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

/// The first `n` sentences of `text`. A sentence ends at `.`, `!` or `?`
/// followed by whitespace.
fn first_sentences(text: &str, n: usize) -> String {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == n {
                return text[..=i].trim().to_string();
            }
        }
    }
    text.trim().to_string()
}
