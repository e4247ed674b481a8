//! Clothing item catalog operations.

use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  catalog::ClothingItem,
  store::Store,
  validate::{self, Payload},
};

use super::Workflow;
use crate::error::ApiError;

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  pub async fn add_clothing_item(&self, payload: &Payload) -> Result<ClothingItem, ApiError> {
    let item = validate::clothing_item(payload)?;

    if self.stored(self.store.get_clothing_item(&item.name)).await?.is_some() {
      tracing::warn!(name = %item.name, "clothing item rejected: already exists");
      return Err(ApiError::Conflict("Clothing Item already exists".into()));
    }

    let created = self.stored(self.store.add_clothing_item(item)).await?;
    tracing::info!(name = %created.name, "clothing item created");
    Ok(created)
  }

  pub async fn clothing_items(&self) -> Result<Vec<ClothingItem>, ApiError> {
    self.stored(self.store.list_clothing_items()).await
  }

  /// New defaults apply to profiles created from now on; existing price maps
  /// keep the amounts they were seeded with.
  pub async fn update_clothing_item(
    &self,
    name: &str,
    payload: &Payload,
  ) -> Result<ClothingItem, ApiError> {
    let patch = validate::clothing_item_patch(payload)?;
    let updated = self.stored(self.store.update_clothing_item(name, patch)).await?;
    tracing::info!(name = %updated.name, "clothing item defaults updated");
    Ok(updated)
  }
}
