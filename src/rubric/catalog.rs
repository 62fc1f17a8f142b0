//! The fixed rubric template and wizard selection lists
//!
//! These mirror the product's Danielson-derived framework; the wizard renders
//! them verbatim and the scoring engine consumes whatever subset got rated.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::model::{Domain, Indicator, Rating};

/// One domain of the rubric template
#[derive(Debug, Clone, Copy)]
pub struct DomainTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub indicators: &'static [&'static str],
}

/// The six rubric domains, in presentation order
pub static DOMAINS: &[DomainTemplate] = &[
    DomainTemplate {
        id: "3A",
        title: "3A. Planning & Preparation",
        subtitle: "Live the Lesson",
        indicators: &[
            "Demonstrating Knowledge of Content and Pedagogy",
            "Demonstrating Knowledge of Students",
            "Demonstrating Knowledge of Resources",
            "Designing a Microplan",
            "Using Student Assessments",
        ],
    },
    DomainTemplate {
        id: "3B1",
        title: "3B1. Classroom Practice",
        subtitle: "Care about Culture",
        indicators: &[
            "Creating an Environment of Respect and Rapport",
            "Establishing a Culture for Learning",
            "Managing Classroom Procedures",
            "Managing Student Behaviour",
        ],
    },
    DomainTemplate {
        id: "3B2",
        title: "3B2. Classroom Practice",
        subtitle: "Instruct to Inspire",
        indicators: &[
            "Communicating with Students",
            "Using Questioning and Discussion Techniques and Learning Tools",
            "Engages in Student Learning",
            "Demonstrating Flexibility and Responsiveness",
        ],
    },
    DomainTemplate {
        id: "3B3",
        title: "3B3. Classroom Practice",
        subtitle: "Authentic Assessments",
        indicators: &["Using Assessments in Instruction"],
    },
    DomainTemplate {
        id: "3B4",
        title: "3B4. Classroom Practice",
        subtitle: "Engaging Environment",
        indicators: &["Organizing Physical Space", "Cleanliness", "Use of Boards"],
    },
    DomainTemplate {
        id: "3C",
        title: "3C. Professional Practice",
        subtitle: "Professional Ethics",
        indicators: &[
            "Reflecting on Teaching",
            "Maintaining Accurate Records",
            "Communicating with Families",
            "Participating in a Professional Community",
            "Growing and Developing Professionally",
        ],
    },
];

/// The five-value rating scale, in presentation order
pub static RATING_SCALE: &[Rating] = &[
    Rating::Basic,
    Rating::Developing,
    Rating::Effective,
    Rating::HighlyEffective,
    Rating::NotObserved,
];

pub static ROUTINES: &[&str] = &[
    "Arrival Routine",
    "Attendance Routine",
    "Class Cleaning Routines",
    "Collection Routine",
    "Departure Routine",
    "Grouping Routine",
    "Lining Up Strategies",
    "No Routines Observed",
];

pub static CULTURE_TOOLS: &[&str] = &[
    "Affirmations",
    "Brain Breaks",
    "Check-In",
    "Countdown",
    "Positive Framing",
    "Precise Praise",
    "Morning Meetings",
    "Social Contract",
    "Normalise Error",
    "No Culture Tools Observed",
];

pub static INSTRUCTIONAL_TOOLS: &[&str] = &[
    "Do Now",
    "Think-Pair-Share",
    "Exit Ticket",
    "Cold Call",
    "Choral Call",
    "Concept Map",
    "KWL",
    "See-Think-Wonder",
    "Turn & Talk",
    "Wait Time",
    "No Tools Observed",
];

pub static LEARNING_AREA_TOOLS: &[&str] = &[
    "Math Journal",
    "Error Analysis",
    "Graphic Organisers",
    "Claim-Evidence-Reasoning",
    "Socratic Seminar",
    "Silent Debate",
    "No LA Tool Observed",
];

pub static META_TAGS: &[&str] = &[
    "Knowledge of Content and Pedagogy",
    "Knowledge of Students",
    "Knowledge of Resources",
    "Designing a Microplan",
    "Using Student Assessments",
    "Creating an Environment of Respect and Rapport",
    "Establishing a Culture for Learning",
    "Managing Classroom Procedures",
    "Managing Student Behaviour",
    "Communicating with Students",
    "Using Questioning and Discussion Techniques and Learning Tools",
    "Using Assessment in Instruction",
    "Organizing Physical Space",
    "Cleanliness",
    "Use of Boards",
    "Reflecting on Teaching",
    "Maintaining Accurate Records",
    "Communicating with Families",
    "Participating in a Professional Community",
    "Growing and Developing Professionally",
];

pub static CAMPUSES: &[&str] = &[
    "CMR NPS", "EJPN", "EITPL", "EBTM", "EBYR", "ENICE", "ENAVA", "PU BTM", "PU BYR", "PU HRBR",
    "PU ITPL",
];

pub static OBSERVER_ROLES: &[&str] = &[
    "Academic Coordinator",
    "CCA Coordinator",
    "Head of School",
    "ELC Team Member",
    "PDI Team Member",
    "Other",
];

pub static BLOCKS: &[&str] = &["Early Years", "Primary", "Middle", "Senior", "Specialist"];

pub static GRADES: &[&str] = &[
    "Grade 1", "Grade 2", "Grade 3", "Grade 4", "Grade 5", "Grade 6", "Grade 7", "Grade 8",
    "Grade 9", "Grade 10", "Grade 11", "Grade 12",
];

pub static LEARNING_AREAS: &[&str] = &[
    "Mathematics",
    "Science",
    "English",
    "Social Studies",
    "Arts",
    "Physical Education",
    "Technology",
    "Languages",
];

/// Display tag applied when no meta-tag was selected
pub const DEFAULT_DOMAIN_TAG: &str = "General Instruction";

static DOMAIN_INDEX: Lazy<HashMap<&'static str, &'static DomainTemplate>> =
    Lazy::new(|| DOMAINS.iter().map(|d| (d.id, d)).collect());

/// Look up a domain template by its id ("3A", "3B1", ...)
pub fn domain_by_id(id: &str) -> Option<&'static DomainTemplate> {
    DOMAIN_INDEX.get(id).copied()
}

/// Build the wizard's initial rubric payload: every indicator "Not Observed",
/// empty evidence.
pub fn starter_domains() -> Vec<Domain> {
    DOMAINS
        .iter()
        .map(|d| Domain {
            domain_id: d.id.to_string(),
            title: d.title.to_string(),
            indicators: d
                .indicators
                .iter()
                .map(|name| Indicator {
                    name: name.to_string(),
                    rating: Rating::NotObserved,
                })
                .collect(),
            evidence: String::new(),
        })
        .collect()
}
