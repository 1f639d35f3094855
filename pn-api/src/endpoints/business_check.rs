//! National business check endpoints.

use pn_core::error::PnResult;
use pn_models::BusinessCheckResponse;
use serde_json::Value;

use crate::client::ApiClient;

impl ApiClient {
    /// Look up a company by its KVK registration number.
    pub async fn business_check_by_kvk(&self, kvk_number: &str) -> PnResult<BusinessCheckResponse> {
        let raw: Value = self
            .get_json(&format!("/company/search/v3/kvknumber?kvknumber={kvk_number}"))
            .await?;
        BusinessCheckResponse::from_json(&raw)
    }

    /// Search companies by name, optionally requesting a specific result page.
    pub async fn business_check_by_name(
        &self,
        company_name: &str,
        requested_page: Option<u32>,
    ) -> PnResult<BusinessCheckResponse> {
        let mut path = format!("/company/search/v3/companyname?companyname={company_name}");
        if let Some(page) = requested_page {
            path.push_str(&format!("&requestedpage={page}"));
        }
        let raw: Value = self.get_json(&path).await?;
        BusinessCheckResponse::from_json(&raw)
    }

    /// Look up companies registered at a postal code and house number.
    pub async fn business_check_by_address(
        &self,
        postal_code: &str,
        house_number: &str,
    ) -> PnResult<BusinessCheckResponse> {
        let raw: Value = self
            .get_json(&format!(
                "/company/search/v3/address?postalcode={postal_code}&housenumber={house_number}"
            ))
            .await?;
        BusinessCheckResponse::from_json(&raw)
    }
}
