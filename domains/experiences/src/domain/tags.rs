//! Tag building for member-data files
//!
//! Tags are human-readable labels stored next to each experience file so the
//! member-data store can be browsed without opening files. They are modelled
//! as a structured [`TagSet`] (kind → value) and only flattened to a list at
//! the store boundary, so a toggle replaces a tag by kind instead of by list
//! position.
//!
//! Rendered order: visibility, research, content warnings (fixed order),
//! other-warning label, then any unrecognized tags carried over verbatim.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::ExperienceData;

/// Label appended when the member described a warning in free text
pub const OTHER_WARNING_TAG: &str = "Other triggering label";

/// Written by older visibility toggles instead of `public`
const LEGACY_PUBLIC_TAG: &str = "viewable";

/// Whether an experience may appear in the public listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    NotPublic,
}

impl Visibility {
    pub fn from_viewable(viewable: bool) -> Self {
        if viewable {
            Self::Public
        } else {
            Self::NotPublic
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::NotPublic => "not public",
        }
    }
}

/// Whether the member consented to research use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchConsent {
    Research,
    NonResearch,
}

impl ResearchConsent {
    pub fn from_consent(research: bool) -> Self {
        if research {
            Self::Research
        } else {
            Self::NonResearch
        }
    }

    pub fn is_consented(&self) -> bool {
        matches!(self, Self::Research)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::NonResearch => "non-research",
        }
    }
}

/// Content warnings an experience can carry, in tag order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentWarning {
    Drug,
    Abuse,
    NegativeBody,
    Violence,
    MentalHealth,
}

impl ContentWarning {
    pub const ALL: [ContentWarning; 5] = [
        Self::Drug,
        Self::Abuse,
        Self::NegativeBody,
        Self::Violence,
        Self::MentalHealth,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Drug => "drugs",
            Self::Abuse => "abuse",
            Self::NegativeBody => "negative body",
            Self::Violence => "violence",
            Self::MentalHealth => "mental health",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.tag() == tag)
    }
}

/// Structured tag set for one experience
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    pub visibility: Visibility,
    pub research: ResearchConsent,
    pub warnings: BTreeSet<ContentWarning>,
    pub other_warning: bool,
    unrecognized: Vec<String>,
}

impl TagSet {
    /// Derive the tag set from an experience payload
    pub fn from_experience(data: &ExperienceData) -> Self {
        Self {
            visibility: Visibility::from_viewable(data.viewable),
            research: ResearchConsent::from_consent(data.research),
            warnings: data.warnings().into_iter().collect(),
            other_warning: data.has_other_warning(),
            unrecognized: Vec::new(),
        }
    }

    /// Parse a stored tag list.
    ///
    /// Missing kinds default to `not public` / `non-research`. The first
    /// occurrence of a kind wins. Empty strings are dropped and unknown tags
    /// are kept so they survive a rewrite.
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut visibility = None;
        let mut research = None;
        let mut warnings = BTreeSet::new();
        let mut other_warning = false;
        let mut unrecognized = Vec::new();

        for tag in tags.iter().map(AsRef::as_ref) {
            match tag {
                "" => {}
                "public" | LEGACY_PUBLIC_TAG => {
                    visibility.get_or_insert(Visibility::Public);
                }
                "not public" => {
                    visibility.get_or_insert(Visibility::NotPublic);
                }
                "research" => {
                    research.get_or_insert(ResearchConsent::Research);
                }
                "non-research" => {
                    research.get_or_insert(ResearchConsent::NonResearch);
                }
                OTHER_WARNING_TAG => other_warning = true,
                other => match ContentWarning::from_tag(other) {
                    Some(warning) => {
                        warnings.insert(warning);
                    }
                    None => unrecognized.push(other.to_string()),
                },
            }
        }

        Self {
            visibility: visibility.unwrap_or(Visibility::NotPublic),
            research: research.unwrap_or(ResearchConsent::NonResearch),
            warnings,
            other_warning,
            unrecognized,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_research(mut self, research: ResearchConsent) -> Self {
        self.research = research;
        self
    }

    /// Flatten to the list stored in file metadata
    pub fn to_tags(&self) -> Vec<String> {
        let mut tags = vec![
            self.visibility.tag().to_string(),
            self.research.tag().to_string(),
        ];
        tags.extend(self.warnings.iter().map(|w| w.tag().to_string()));
        if self.other_warning {
            tags.push(OTHER_WARNING_TAG.to_string());
        }
        tags.extend(self.unrecognized.iter().cloned());
        tags
    }
}

/// Build the ordered tag list for an experience payload
pub fn make_tags(data: &ExperienceData) -> Vec<String> {
    TagSet::from_experience(data).to_tags()
}
