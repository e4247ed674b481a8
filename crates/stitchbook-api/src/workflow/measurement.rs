//! Measurement ingestion.
//!
//! Body measurements are always stored. Customer requirements and a drawing
//! are each optional; when a drawing file is staged it is published before
//! the measurement is written, so a failed upload writes nothing.

use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  measurement::{Measurement, NewMeasurement},
  store::Store,
  validate::{self, MeasurementInput, Payload},
};

use super::{Submission, Workflow};
use crate::error::ApiError;

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  /// Validate the request and resolve its customer. The customer must exist
  /// before any drawing is uploaded.
  async fn admit_measurement(
    &self,
    customer_id: &str,
    payload: &Payload,
  ) -> Result<MeasurementInput, ApiError> {
    let input = validate::measurement(customer_id, payload)?;
    if self.stored(self.store.get_customer(input.customer_id)).await?.is_none() {
      return Err(ApiError::NotFound("Customer not found".into()));
    }
    Ok(input)
  }

  pub async fn add_measurement(
    &self,
    customer_id: &str,
    submission: Submission,
  ) -> Result<Measurement, ApiError> {
    let Submission { payload, avatar, drawing: staged } = submission;
    self.discard(avatar.as_deref()).await;

    let admitted = self.admit_measurement(customer_id, &payload).await;
    let input = self.discard_on_err(staged.as_deref(), admitted).await?;

    let drawing = match (staged.as_deref(), input.drawing_requested) {
      (Some(staged), _) => Some(self.publish(staged, "Drawing is required").await?),
      (None, true) => return Err(ApiError::Attachment("Drawing is required".into())),
      (None, false) => None,
    };

    let (measurement, history) = self
      .stored(self.store.add_measurement(NewMeasurement {
        customer_id:           input.customer_id,
        measurements:          input.measurements,
        customer_requirements: input.customer_requirements,
        drawing,
      }))
      .await?;

    tracing::info!(
      measurement_id = %measurement.measurement_id,
      history_id = %history.history_id,
      customer_id = %measurement.customer_id,
      "measurement recorded"
    );
    Ok(measurement)
  }
}
