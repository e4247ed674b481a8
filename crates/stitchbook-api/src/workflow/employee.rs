//! Employee profile reads and partial updates.
//!
//! Only helpers, cutting masters and tailors can be updated here. Every key
//! present in the body is applied, `0` included. A new password is hashed
//! onto the identity in the same write as the profile; the profile never
//! holds credentials.

use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  profile::{StaffKind, StaffPatch, StaffProfile},
  store::Store,
  validate::{self, Payload},
};

use super::{Submission, Workflow, parse_id};
use crate::error::ApiError;

/// An update that passed every check made before its avatar is uploaded.
struct AdmittedUpdate {
  patch:            StaffPatch,
  avatar_requested: bool,
  profile:          StaffProfile,
  password_hash:    Option<String>,
}

fn staff_kind(role: &str) -> Result<StaffKind, ApiError> {
  StaffKind::from_role_tag(role).ok_or_else(|| ApiError::UnsupportedRole(role.trim().to_owned()))
}

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  async fn staff_profile(&self, kind: StaffKind, user_id: &str) -> Result<StaffProfile, ApiError> {
    let user_id = parse_id(user_id, "User Id")?;
    self
      .stored(self.store.get_staff_profile(kind, user_id))
      .await?
      .ok_or_else(|| ApiError::NotFound(format!("{kind} not found")))
  }

  /// `GET /employees/{id}?role=`
  pub async fn employee(&self, user_id: &str, role: Option<&str>) -> Result<StaffProfile, ApiError> {
    let role = role
      .filter(|r| !r.trim().is_empty())
      .ok_or_else(|| ApiError::Validation("Role is Required".into()))?;
    self.staff_profile(staff_kind(role)?, user_id).await
  }

  async fn admit_update(&self, user_id: &str, payload: &Payload) -> Result<AdmittedUpdate, ApiError> {
    let input = validate::employee_update(payload)?;
    let kind = staff_kind(&input.role)?;
    let profile = self.staff_profile(kind, user_id).await?;
    let password_hash = match input.password {
      Some(password) => Some(self.hash(password).await?),
      None => None,
    };
    Ok(AdmittedUpdate {
      patch: input.patch,
      avatar_requested: input.avatar_requested,
      profile,
      password_hash,
    })
  }

  pub async fn update_employee(
    &self,
    user_id: &str,
    submission: Submission,
  ) -> Result<StaffProfile, ApiError> {
    let Submission { payload, avatar: staged, drawing } = submission;
    self.discard(drawing.as_deref()).await;

    let admitted = self.admit_update(user_id, &payload).await;
    let AdmittedUpdate { mut patch, avatar_requested, mut profile, password_hash } =
      self.discard_on_err(staged.as_deref(), admitted).await?;

    if avatar_requested || staged.is_some() {
      let staged = staged
        .as_deref()
        .ok_or_else(|| ApiError::Attachment("Avatar is required".into()))?;
      patch.avatar = Some(self.publish(staged, "Avatar is required").await?);
    }

    if patch.is_empty() && password_hash.is_none() {
      return Ok(profile);
    }
    let password_replaced = password_hash.is_some();
    patch.apply(&mut profile);
    let saved = self
      .stored(self.store.save_staff_profile(profile, password_hash))
      .await?;
    tracing::info!(
      user_id = %saved.user_document,
      kind = %saved.kind,
      password_replaced,
      "employee updated"
    );
    Ok(saved)
  }
}
