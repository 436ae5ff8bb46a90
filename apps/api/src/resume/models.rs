/// The loaded résumé document before normalization. Any key may be absent and
/// any value may be a scalar, array or nested object.
pub type RawDocument = serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceEntry {
    pub role: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub highlights: Vec<String>,
}

impl ExperienceEntry {
    /// An entry survives normalization only if it says something about the job.
    pub fn is_meaningful(&self) -> bool {
        self.role.is_some() || self.company.is_some() || !self.highlights.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectEntry {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stack: Option<String>,
    pub highlights: Vec<String>,
}

impl ProjectEntry {
    pub fn is_meaningful(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EducationEntry {
    pub fn is_meaningful(&self) -> bool {
        self.institution.is_some()
            || self.degree.is_some()
            || self.field.is_some()
            || self.start.is_some()
            || self.end.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub email: Option<String>,
    pub linkedin: Option<String>,
}

/// Schema-independent view of one person's résumé.
///
/// Built once from a [`RawDocument`] by `normalize::normalize` and shared
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalResume {
    pub name: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub target_roles: Vec<String>,
    /// Unique by exact string identity, in first-seen order.
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub education: Vec<EducationEntry>,
    pub contact: Option<Contact>,
}
