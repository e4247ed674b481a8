//! Customer reads: listing, the customer record, history and bills.

use serde::Serialize;
use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  bill::{SoldBill, StitchBill},
  measurement::MeasurementHistory,
  profile::{Customer, CustomerSummary},
  store::Store,
};
use uuid::Uuid;

use super::{Workflow, parse_id};
use crate::error::ApiError;

/// Both bill kinds raised for one customer, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerBills {
  pub sold:     Vec<SoldBill>,
  pub stitched: Vec<StitchBill>,
}

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  async fn existing_customer(&self, customer_id: &str) -> Result<(Uuid, Customer), ApiError> {
    let id = parse_id(customer_id, "Customer Id")?;
    let customer = self
      .stored(self.store.get_customer(id))
      .await?
      .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;
    Ok((id, customer))
  }

  pub async fn customers(&self) -> Result<Vec<CustomerSummary>, ApiError> {
    self.stored(self.store.list_customers()).await
  }

  pub async fn customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
    Ok(self.existing_customer(customer_id).await?.1)
  }

  pub async fn measurement_history(
    &self,
    customer_id: &str,
  ) -> Result<Vec<MeasurementHistory>, ApiError> {
    let (id, _) = self.existing_customer(customer_id).await?;
    self.stored(self.store.measurement_history(id)).await
  }

  pub async fn customer_bills(&self, customer_id: &str) -> Result<CustomerBills, ApiError> {
    let (id, _) = self.existing_customer(customer_id).await?;
    let sold = self.stored(self.store.sold_bills_for(id)).await?;
    let stitched = self.stored(self.store.stitch_bills_for(id)).await?;
    Ok(CustomerBills { sold, stitched })
  }
}
