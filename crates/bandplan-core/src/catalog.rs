//! Task catalog: study content keyed by category and proficiency tier.
//!
//! The catalog is a versioned content table. [`TaskCatalog::builtin`] ships
//! the default content; a TOML file with the same shape can replace it
//! without touching scheduling logic:
//!
//! ```toml
//! version = 1
//!
//! [categories.Listening]
//! entries = [{ description = "Section 1 & 2 practice", resource_link = "https://..." }]
//!
//! [categories.Listening.guides]
//! beginner = ["Listen twice, then read the transcript."]
//! intermediate = []
//! advanced = []
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::profile::Skill;

/// Content table schema version understood by this build.
pub const CATALOG_VERSION: u32 = 1;

/// Category holding weekly review content.
pub const REVIEW_CATEGORY: &str = "Spaced Repetition";

/// Category holding full mock test content.
pub const MOCK_TEST_CATEGORY: &str = "Mock Test";

/// Description used when a category has no entries.
pub const PLACEHOLDER_DESCRIPTION: &str = "General skills practice";

/// Link used when a category has no entries.
pub const PLACEHOLDER_LINK: &str = "https://www.ieltsbuddy.com/";

/// Proficiency bracket used to pitch study guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    /// Beginner below 5.5, Intermediate below 7.0, Advanced otherwise.
    pub fn for_score(score: f64) -> Tier {
        if score < 5.5 {
            Tier::Beginner
        } else if score < 7.0 {
            Tier::Intermediate
        } else {
            Tier::Advanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Beginner => "Beginner",
            Tier::Intermediate => "Intermediate",
            Tier::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A (description, resource link) candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    pub resource_link: String,
}

impl CatalogEntry {
    pub fn new(description: impl Into<String>, resource_link: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            resource_link: resource_link.into(),
        }
    }

    fn placeholder() -> Self {
        Self::new(PLACEHOLDER_DESCRIPTION, PLACEHOLDER_LINK)
    }
}

/// Study guide pools per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierGuides {
    #[serde(default)]
    pub beginner: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub advanced: Vec<String>,
}

impl TierGuides {
    pub fn pool(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Beginner => &self.beginner,
            Tier::Intermediate => &self.intermediate,
            Tier::Advanced => &self.advanced,
        }
    }
}

/// Content for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryContent {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
    #[serde(default)]
    pub guides: TierGuides,
}

/// Static lookup from category to candidate content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCatalog {
    pub version: u32,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryContent>,
}

impl TaskCatalog {
    /// Parse a TOML content table.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: TaskCatalog = toml::from_str(content)?;
        if catalog.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: catalog.version,
                supported: CATALOG_VERSION,
            });
        }
        Ok(catalog)
    }

    /// Load a TOML content table from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryContent> {
        self.categories.get(name)
    }

    /// Pick a random entry from a category, or the placeholder when the
    /// category is missing or empty.
    pub fn pick_entry<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> CatalogEntry {
        match self
            .category(category)
            .and_then(|content| content.entries.choose(rng))
        {
            Some(entry) => entry.clone(),
            None => {
                tracing::warn!(category, "no catalog entries, using placeholder");
                CatalogEntry::placeholder()
            }
        }
    }

    /// Pick a random guide from the category's tier pool, prefixed with the
    /// tier label.
    pub fn pick_guide<R: Rng + ?Sized>(
        &self,
        category: &str,
        tier: Tier,
        rng: &mut R,
    ) -> Option<String> {
        let text = self.category(category)?.guides.pool(tier).choose(rng)?;
        Some(format!("{}: {}", tier.label(), text))
    }

    /// Default content compiled into the crate.
    pub fn builtin() -> Self {
        let mut categories = BTreeMap::new();

        categories.insert(
            Skill::Listening.to_string(),
            CategoryContent {
                entries: vec![
                    CatalogEntry::new(
                        "Listening Section 1 & 2 practice (Cambridge 18)",
                        "https://ieltsonlinetests.com/ielts-exam-library",
                    ),
                    CatalogEntry::new(
                        "Dictation from a TED-Ed talk",
                        "https://www.youtube.com/@TEDEd",
                    ),
                    CatalogEntry::new(
                        "Note-taking drills for Section 3",
                        "https://mini-ielts.com/",
                    ),
                    CatalogEntry::new(
                        "Full Listening test with error analysis",
                        "https://ieltsonlinetests.com/",
                    ),
                ],
                guides: TierGuides {
                    beginner: strings(&[
                        "Listen once for gist, then replay with the transcript and underline every word you missed.",
                        "Work on numbers, dates and spelling of names; most early marks are lost there.",
                    ]),
                    intermediate: strings(&[
                        "Read the questions before the audio starts and predict the answer type for each gap.",
                        "Track distractors: note where the speaker corrects themselves and why the first answer was wrong.",
                    ]),
                    advanced: strings(&[
                        "Do Sections 3 and 4 at 1.25x speed, then review paraphrases between audio and questions.",
                        "Keep an error log by question type and drill the weakest type twice a week.",
                    ]),
                },
            },
        );

        categories.insert(
            Skill::Reading.to_string(),
            CategoryContent {
                entries: vec![
                    CatalogEntry::new(
                        "Academic Passage 1 with skimming technique",
                        "https://mini-ielts.com/",
                    ),
                    CatalogEntry::new(
                        "Matching Headings practice (Cambridge 17)",
                        "https://ieltsonlinetests.com/ielts-exam-library",
                    ),
                    CatalogEntry::new(
                        "Topic vocabulary: Education and Environment",
                        "https://www.vocabulary.com/",
                    ),
                    CatalogEntry::new(
                        "Full Reading test in 60 minutes",
                        "https://ieltsonlinetests.com/",
                    ),
                ],
                guides: TierGuides {
                    beginner: strings(&[
                        "Read the first sentence of each paragraph to build a map of the passage before answering.",
                        "Learn ten topic words a day and find each one in a real passage.",
                    ]),
                    intermediate: strings(&[
                        "Scan for names, dates and numbers first, then read around them in detail.",
                        "For True/False/Not Given, write down the exact sentence that proves your answer.",
                    ]),
                    advanced: strings(&[
                        "Finish each passage in 17 minutes and spend the spare time on the hardest question set.",
                        "Rewrite tricky sentences in your own words to train paraphrase recognition.",
                    ]),
                },
            },
        );

        categories.insert(
            Skill::Writing.to_string(),
            CategoryContent {
                entries: vec![
                    CatalogEntry::new(
                        "Task 1 chart analysis (line graph / bar chart)",
                        "https://ielts-simon.com/",
                    ),
                    CatalogEntry::new(
                        "Task 2 body paragraph on a technology topic",
                        "https://ieltsadvantage.com/",
                    ),
                    CatalogEntry::new(
                        "Complex sentences and linking words for cohesion",
                        "https://www.ieltsbuddy.com/",
                    ),
                    CatalogEntry::new(
                        "Full Task 2 essay with self-assessment against band descriptors",
                        "https://writeandimprove.com/",
                    ),
                ],
                guides: TierGuides {
                    beginner: strings(&[
                        "Use a fixed four-paragraph template and focus on clear topic sentences.",
                        "Write one paragraph, then check subject-verb agreement and articles line by line.",
                    ]),
                    intermediate: strings(&[
                        "Plan for five minutes: position, two main ideas, one example each.",
                        "Replace repeated words with precise synonyms and vary sentence openings.",
                    ]),
                    advanced: strings(&[
                        "Compare your essay with a band 8 model and list three differences in argument depth.",
                        "Time yourself to 40 minutes and leave three minutes to proofread for slips.",
                    ]),
                },
            },
        );

        categories.insert(
            Skill::Speaking.to_string(),
            CategoryContent {
                entries: vec![
                    CatalogEntry::new(
                        "Part 1 familiar topics (work and study)",
                        "https://ieltsliz.com/ielts-speaking-part-1-topics-questions/",
                    ),
                    CatalogEntry::new(
                        "Part 2 long turn using a mind-map",
                        "https://ieltsliz.com/ielts-speaking-part-1-topics-questions/",
                    ),
                    CatalogEntry::new(
                        "Part 3 discussion: explain and give examples",
                        "https://www.youtube.com/@IELTSSpeakingSuccess",
                    ),
                    CatalogEntry::new(
                        "Record and replay to fix pronunciation and intonation",
                        "https://www.youtube.com/@IELTSSpeakingSuccess",
                    ),
                ],
                guides: TierGuides {
                    beginner: strings(&[
                        "Answer every Part 1 question with a reason and a short example.",
                        "Shadow a native speaker for five minutes, copying rhythm rather than words.",
                    ]),
                    intermediate: strings(&[
                        "Speak for the full two minutes in Part 2 using past, present and future tenses.",
                        "Record yourself and count filler words; aim to halve them next session.",
                    ]),
                    advanced: strings(&[
                        "In Part 3, compare two viewpoints before giving your own and justify it.",
                        "Practise idiomatic language in context, only where it fits naturally.",
                    ]),
                },
            },
        );

        categories.insert(
            REVIEW_CATEGORY.to_string(),
            CategoryContent {
                entries: vec![CatalogEntry::new(
                    "Review everything studied during the past week",
                    "https://www.ieltsbuddy.com/",
                )],
                guides: TierGuides {
                    beginner: strings(&["Reread your notes and redo the questions you got wrong."]),
                    intermediate: strings(&[
                        "Re-test yourself on this week's mistakes without looking at the answers first.",
                        "Turn this week's new vocabulary into flashcards and review them twice.",
                    ]),
                    advanced: strings(&["Summarise the week's weak points and plan one drill for each."]),
                },
            },
        );

        categories.insert(
            MOCK_TEST_CATEGORY.to_string(),
            CategoryContent {
                entries: vec![CatalogEntry::new(
                    "Full mock test to reassess your level",
                    "https://ieltsonlinetests.com/",
                )],
                guides: TierGuides {
                    beginner: Vec::new(),
                    intermediate: strings(&[
                        "Sit all four papers in one block under exam timing and record the band per skill.",
                    ]),
                    advanced: Vec::new(),
                },
            },
        );

        Self {
            version: CATALOG_VERSION,
            categories,
        }
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
