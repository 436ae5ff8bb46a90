//! Chunker: turns a [`CanonicalResume`] into small retrievable fragments.
//!
//! One fragment for the profile header (name, title, location), then one per
//! summary, skill list, experience bullet, project highlight and education
//! entry. Experience and project bullets each repeat their
//! header so a single strong bullet can rank on its own.

use crate::resume::models::{CanonicalResume, EducationEntry, ExperienceEntry, ProjectEntry};

/// One retrievable unit of résumé text. `id` encodes where it came from, e.g.
/// `exp-2-1` is the second highlight of the third experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    pub id: String,
    pub text: String,
}

impl Fragment {
    fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

pub fn chunk(resume: &CanonicalResume) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    let profile: Vec<String> = [
        resume.name.as_ref().map(|n| format!("Name: {n}")),
        resume.title.as_ref().map(|t| format!("Title: {t}")),
        resume.location.as_ref().map(|l| format!("Location: {l}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !profile.is_empty() {
        fragments.push(Fragment::new("profile", profile.join("\n")));
    }

    if let Some(summary) = &resume.summary {
        fragments.push(Fragment::new("summary", format!("Summary: {summary}")));
    }

    if !resume.skills.is_empty() {
        fragments.push(Fragment::new(
            "skills",
            format!("Skills: {}", resume.skills.join(", ")),
        ));
    }

    for (i, job) in resume.experience.iter().enumerate() {
        let header = experience_header(job);
        push_with_bullets(&mut fragments, &format!("exp-{i}"), &header, &job.highlights);
    }

    for (i, project) in resume.projects.iter().enumerate() {
        let header = project_header(project);
        push_with_bullets(&mut fragments, &format!("proj-{i}"), &header, &project.highlights);
    }

    for (i, edu) in resume.education.iter().enumerate() {
        if let Some(line) = education_line(edu) {
            fragments.push(Fragment::new(format!("edu-{i}"), line));
        }
    }

    if !resume.target_roles.is_empty() {
        fragments.push(Fragment::new(
            "targets",
            format!("Target roles: {}", resume.target_roles.join(", ")),
        ));
    }

    if let Some(contact) = &resume.contact {
        let lines: Vec<String> = [
            contact.email.as_ref().map(|e| format!("Email: {e}")),
            contact.linkedin.as_ref().map(|l| format!("LinkedIn: {l}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !lines.is_empty() {
            fragments.push(Fragment::new("contact", lines.join(" | ")));
        }
    }

    fragments.retain(|f| !f.text.trim().is_empty());
    fragments
}

/// One fragment per bullet (`{prefix}-{j}`), or the bare header (`{prefix}`)
/// when there are no bullets.
fn push_with_bullets(fragments: &mut Vec<Fragment>, prefix: &str, header: &str, bullets: &[String]) {
    if bullets.is_empty() {
        if !header.is_empty() {
            fragments.push(Fragment::new(prefix, header));
        }
        return;
    }

    for (j, bullet) in bullets.iter().enumerate() {
        let text = if header.is_empty() {
            format!("• {bullet}")
        } else {
            format!("{header}\n• {bullet}")
        };
        fragments.push(Fragment::new(format!("{prefix}-{j}"), text));
    }
}

fn experience_header(job: &ExperienceEntry) -> String {
    let title = match (&job.role, &job.company) {
        (Some(role), Some(company)) => Some(format!("Experience: {role} at {company}")),
        (Some(role), None) => Some(format!("Experience: {role}")),
        (None, Some(company)) => Some(format!("Experience: {company}")),
        (None, None) => None,
    };

    [title, date_range(&job.start, &job.end), job.location.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}

fn project_header(project: &ProjectEntry) -> String {
    // Descriptions synthesized from the highlights would repeat every bullet.
    let description = project
        .description
        .as_ref()
        .filter(|d| project.highlights.is_empty() || **d != project.highlights.join(" "));

    [
        Some(match &project.name {
            Some(name) => format!("Project: {name}"),
            None => "Project".to_string(),
        }),
        description.cloned(),
        project.stack.as_ref().map(|s| format!("Stack: {s}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n")
}

fn education_line(edu: &EducationEntry) -> Option<String> {
    let label = [edu.degree.as_deref(), edu.field.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" in ");

    let parts: Vec<String> = [
        Some(label).filter(|l| !l.is_empty()),
        edu.institution.clone(),
        date_range(&edu.start, &edu.end),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("Education: {}", parts.join(" — ")))
    }
}

/// `"2020 – 2022"`, `"2020"`, `"2022"` or nothing.
pub(crate) fn date_range(start: &Option<String>, end: &Option<String>) -> Option<String> {
    let joined = [start.as_deref(), end.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" – ");
    Some(joined).filter(|s| !s.is_empty())
}
