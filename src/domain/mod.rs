//! Core domain types for the DadderUp admin

mod badge;
mod challenge;
mod error;
mod plan;
mod reaction;

pub use badge::{ActionTrigger, ActionTriggerType, Badge, BadgeTrigger, TriggerType};
pub use challenge::{
    Challenge, ChallengeId, PointSchedule, ShopType, SubmissionChannel, SubmissionTypes,
    youtube_video_id,
};
pub use error::{EditError, ValidationError};
pub use plan::{PlanDisplayConfig, PlanKey, ProductRef, ProductSource};
pub use reaction::{Reaction, ReactionCatalog, ReactionKind};
