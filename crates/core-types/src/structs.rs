use crate::enums::Role;
use crate::error::CoreError;
use crate::form::{blank_as_none, empty_as_none};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Users
// ==============================================================================

/// A row from the `users` table as shown in listings (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub user_name: String,
    pub user_surname: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// A full account row, including the stored credential and, for students,
/// the owning teacher.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserAccount {
    pub user_id: i32,
    pub user_name: String,
    pub user_surname: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub password: String,
    pub teacher_id: Option<i32>,
}

impl UserAccount {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user_name, self.user_surname)
    }

    /// The teacher who owns experiments this user creates: themselves for a
    /// teacher, their assigned teacher for a student.
    pub fn owning_teacher_id(&self) -> Option<i32> {
        match self.role {
            Role::Teacher => Some(self.user_id),
            Role::Student => self.teacher_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TeacherSummary {
    pub teacher_id: i32,
    pub user_name: String,
    pub user_surname: String,
}

/// Everything needed to register an account. `password_hash` is already
/// produced by the credential hasher.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub teacher_id: Option<i32>,
}

impl NewUser {
    /// A student must name a teacher; a teacher must not.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "email".to_string(),
                "must not be empty".to_string(),
            ));
        }
        match (self.role, self.teacher_id) {
            (Role::Student, None) => Err(CoreError::InvalidInput(
                "teacher_id".to_string(),
                "a student must be assigned to a teacher".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// ==============================================================================
// Elements
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Element {
    pub element_id: i32,
    pub symbol: String,
    pub element_name: String,
    pub atomic_number: i32,
    pub atomic_weight: Decimal,
    pub melting_point: Option<Decimal>,
    pub boiling_point: Option<Decimal>,
    pub hazard_type: Option<String>,
    pub description: Option<String>,
    pub teacher_id: i32,
}

/// An element joined with the display name of the teacher who created it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ElementDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub element: Element,
    pub created_by: String,
}

/// Fields a teacher supplies when adding or editing an element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewElement {
    pub symbol: String,
    #[serde(alias = "name")]
    pub element_name: String,
    pub atomic_number: i32,
    pub atomic_weight: Decimal,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub melting_point: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub boiling_point: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hazard_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

// ==============================================================================
// Lab equipment
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LabEquipment {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub equipment_type: Option<String>,
    pub description: Option<String>,
    pub safety_info: Option<String>,
    pub teacher_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEquipment {
    #[serde(alias = "name")]
    pub equipment_name: String,
    #[serde(default, alias = "type", deserialize_with = "blank_as_none")]
    pub equipment_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub safety_info: Option<String>,
}

/// A piece of equipment as attached to an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ExperimentEquipment {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub equipment_type: Option<String>,
    pub safety_info: Option<String>,
}

// ==============================================================================
// Reactions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reaction {
    pub reaction_id: i32,
    pub teacher_id: i32,
    pub element1_id: i32,
    pub element2_id: i32,
    pub product: Option<String>,
    pub conditions: Option<String>,
}

/// A reaction with both element symbols/names and its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ReactionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reaction: Reaction,
    pub element1_symbol: String,
    pub element1_name: String,
    pub element2_symbol: String,
    pub element2_name: String,
    pub created_by: String,
}

/// The editable part of a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewReaction {
    pub element1_id: i32,
    pub element2_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub conditions: Option<String>,
}

impl NewReaction {
    pub fn validate(&self) -> Result<(), CoreError> {
        ensure_distinct_elements(self.element1_id, self.element2_id)
    }
}

/// Input for the atomic "create reaction together with its first experiment"
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewReactionExperiment {
    pub teacher_id: i32,
    pub element1_id: i32,
    pub element2_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub experiment_result: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub safety_warning: Option<String>,
    #[serde(default)]
    pub equipment_ids: Option<Vec<i32>>,
}

impl NewReactionExperiment {
    pub fn validate(&self) -> Result<(), CoreError> {
        ensure_distinct_elements(self.element1_id, self.element2_id)
    }

    /// Equipment ids with duplicates collapsed, in ascending order.
    pub fn unique_equipment_ids(&self) -> Vec<i32> {
        let mut ids = self.equipment_ids.clone().unwrap_or_default();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// The ids produced by a successful reaction + experiment creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CreatedReaction {
    pub reaction_id: i32,
    pub experiment_id: i32,
}

fn ensure_distinct_elements(element1_id: i32, element2_id: i32) -> Result<(), CoreError> {
    if element1_id == element2_id {
        return Err(CoreError::SameElement(element1_id));
    }
    Ok(())
}

// ==============================================================================
// Experiments
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Experiment {
    pub experiment_id: i32,
    pub teacher_id: i32,
    pub reaction_id: i32,
    pub result: String,
    pub safety_warning: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An experiment joined with its reaction, both elements and its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ExperimentDetail {
    pub experiment_id: i32,
    pub reaction_id: i32,
    pub result: String,
    pub safety_warning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product: Option<String>,
    pub conditions: Option<String>,
    pub element1_symbol: String,
    pub element1_name: String,
    pub element2_symbol: String,
    pub element2_name: String,
    pub created_by: String,
}

/// One participation of a user in an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ParticipatedExperiment {
    pub participation_id: i32,
    pub experiment_id: i32,
    pub reaction_id: i32,
    pub result: String,
    pub safety_warning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product: Option<String>,
    pub conditions: Option<String>,
    pub element1_symbol: String,
    pub element1_name: String,
    pub element2_symbol: String,
    pub element2_name: String,
    pub participated_at: DateTime<Utc>,
}

/// A user "running" a reaction from the laboratory page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveExperiment {
    pub reaction_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub safety_warning: Option<String>,
}

/// Outcome of [`SaveExperiment`]: the experiment used and the participation
/// recorded against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedRun {
    pub experiment_id: i32,
    pub participation_id: i32,
    /// `true` when no experiment existed yet and one was created.
    pub created_experiment: bool,
}
