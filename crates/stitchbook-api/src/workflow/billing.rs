//! Sold and stitch bill creation.
//!
//! A stitch bill is appended to its customer's stitched-bill list in the same
//! write. A sold bill only references the customer; the customer record is
//! left as it is.

use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  bill::{BillKind, SoldBill, StitchBill},
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
  async fn ensure_bill_number_free(&self, kind: BillKind, number: &str) -> Result<(), ApiError> {
    if self.stored(self.store.bill_number_taken(kind, number)).await? {
      tracing::warn!(%kind, bill_number = number, "bill rejected: number already used");
      return Err(ApiError::Conflict(format!(
        "{kind} bill with this Bill Number already exists"
      )));
    }
    Ok(())
  }

  pub async fn add_sold_bill(&self, payload: &Payload) -> Result<SoldBill, ApiError> {
    let input = validate::sold_bill(payload)?;
    self.ensure_bill_number_free(BillKind::Sold, &input.bill_number).await?;

    let bill = self.stored(self.store.add_sold_bill(input)).await?;
    tracing::info!(
      bill_id = %bill.bill_id,
      customer_id = %bill.customer_id,
      operator = %bill.user_id,
      "sold bill created"
    );
    Ok(bill)
  }

  pub async fn add_stitch_bill(&self, payload: &Payload) -> Result<StitchBill, ApiError> {
    let input = validate::stitch_bill(payload)?;
    self.ensure_bill_number_free(BillKind::Stitched, &input.bill_number).await?;

    let bill = self.stored(self.store.add_stitch_bill(input)).await?;
    tracing::info!(
      bill_id = %bill.bill_id,
      customer_id = %bill.customer_id,
      operator = %bill.user_id,
      delivery = %bill.delivery_date,
      "stitch bill created"
    );
    Ok(bill)
  }
}
