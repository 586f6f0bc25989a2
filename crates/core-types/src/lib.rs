//! # SIMLAB Core Types
//!
//! The shared vocabulary of the virtual chemistry lab: accounts and roles,
//! elements, equipment, reactions, experiments and the report rows built
//! from them. Layer 0; every other crate depends on it.

pub mod enums;
pub mod error;
pub mod form;
pub mod reports;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Role;
pub use error::CoreError;
pub use reports::{
    DashboardStats, ElementViewCount, EquipmentUsage, LowActivityStudent, StudentActivity,
    StudentExperiment, StudentRef, StudentStats, TeacherDashboardStats, TeacherStatistics,
    UserActivity,
};
pub use structs::{
    CreatedReaction, Element, ElementDetail, Experiment, ExperimentDetail, ExperimentEquipment,
    LabEquipment, NewElement, NewEquipment, NewReaction, NewReactionExperiment, NewUser,
    ParticipatedExperiment, Reaction, ReactionDetail, SaveExperiment, SavedRun, TeacherSummary, User,
    UserAccount,
};
