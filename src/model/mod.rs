//! Entity models shared by every dashboard context

pub mod evidence;
pub mod goal;
pub mod identity;
pub mod observation;
pub mod training;

pub use evidence::EvidenceSubmission;
pub use goal::Goal;
pub use identity::{OwnerRef, Role, Viewer};
pub use observation::{
    Classroom, DetailedReflection, Domain, Indicator, Observation, Rating, ReflectionRating,
    ReflectionSection, ReflectionSections,
};
pub use training::{EventStatus, Registrant, TrainingEvent};
