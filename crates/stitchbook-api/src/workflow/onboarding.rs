//! Account creation for every role, as one parameterised flow.
//!
//! 1. validate the payload for the role
//! 2. reject a name or phone number that is already registered
//! 3. hash the phone number as the initial password
//! 4. publish the staged avatar
//! 5. register the identity together with its role profile
//! 6. read the identity back without credentials

use std::path::Path;

use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  identity::{NewIdentity, PublicIdentity, Role},
  profile::{NewProfile, NewStaffProfile, StaffKind},
  store::Store,
  validate::{self, IdentityInput, Payload},
};

use super::{Submission, Workflow, parse_id};
use crate::error::ApiError;

/// A request that passed every check made before its avatar is uploaded.
struct Admitted {
  identity:      IdentityInput,
  monthly:       f64,
  password_hash: String,
}

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  async fn admit(&self, role: Role, payload: &Payload) -> Result<Admitted, ApiError> {
    let (identity, monthly) = match role {
      Role::Helper => {
        let helper = validate::helper(payload)?;
        (helper.identity, helper.monthly)
      }
      _ => (validate::identity(payload)?, 0.0),
    };

    let existing = self
      .stored(
        self
          .store
          .find_identity_by_name_or_phone(&identity.name, &identity.phone_number),
      )
      .await?;
    if existing.is_some() {
      tracing::warn!(%role, "registration rejected: identity already exists");
      return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = self.hash(identity.phone_number.clone()).await?;
    Ok(Admitted { identity, monthly, password_hash })
  }

  async fn publish_avatar(&self, staged: Option<&Path>) -> Result<String, ApiError> {
    let staged = staged.ok_or_else(|| ApiError::Attachment("Avatar is required".into()))?;
    self.publish(staged, "Avatar is required").await
  }

  /// Create an account of `role` with its role profile.
  pub async fn onboard(&self, role: Role, submission: Submission) -> Result<PublicIdentity, ApiError> {
    let Submission { payload, avatar: staged, drawing } = submission;
    self.discard(drawing.as_deref()).await;

    let admitted = self.admit(role, &payload).await;
    let Admitted { identity, monthly, password_hash } =
      self.discard_on_err(staged.as_deref(), admitted).await?;
    let avatar = self.publish_avatar(staged.as_deref()).await?;

    let profile = match role.staff_kind() {
      Some(kind) => {
        let catalog = match kind {
          StaffKind::Helper => Vec::new(),
          StaffKind::CuttingMaster | StaffKind::Tailor => {
            self.stored(self.store.list_clothing_items()).await?
          }
        };
        Some(NewProfile::Staff(NewStaffProfile {
          kind,
          name: identity.name.clone(),
          phone_number: identity.phone_number.clone(),
          avatar: avatar.clone(),
          monthly,
          price_map: kind.seed_prices(&catalog),
        }))
      }
      None if role == Role::Customer => Some(NewProfile::Customer { name: identity.name.clone() }),
      None => None,
    };

    let created = self
      .stored(self.store.register(
        NewIdentity {
          name: identity.name,
          phone_number: identity.phone_number,
          password_hash,
          avatar,
          role,
        },
        profile,
      ))
      .await?;

    let user = self
      .stored(self.store.get_identity(created.user_id))
      .await?
      .ok_or_else(|| ApiError::Internal("Something went wrong while creating the user".into()))?;

    tracing::info!(user_id = %user.user_id, %role, "user registered");
    Ok(user.public())
  }

  /// `GET /users/{id}`: the public projection of an identity.
  pub async fn user(&self, user_id: &str) -> Result<PublicIdentity, ApiError> {
    let user_id = parse_id(user_id, "User Id")?;
    self
      .stored(self.store.get_identity(user_id))
      .await?
      .map(|user| user.public())
      .ok_or_else(|| ApiError::NotFound("User not found".into()))
  }
}
