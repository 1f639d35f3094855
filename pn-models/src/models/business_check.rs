//! National business check result entity.

use pn_core::error::{PnError, PnResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::ResponseCollection;
use crate::entity::ResultEntity;

/// One company record from a national business check query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCheckResult {
    /// Registered company name.
    pub company_name: String,

    /// Chamber of Commerce (KVK) registration number.
    pub kvk_number: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_number: Option<String>,

    /// Carrier-assigned key for this company record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postnl_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_phone_number: Option<String>,
}

impl ResultEntity for BusinessCheckResult {
    const RESPONSE_KEY: &'static str = "NationalBusinessCheckResponse";
    const ENTITY_KEY: &'static str = "NationalBusinessCheckResult";

    fn from_json(raw: &Value) -> PnResult<Self> {
        let inner = raw.get(Self::ENTITY_KEY).ok_or_else(|| {
            PnError::InvalidArgument(format!("missing {} wrapper", Self::ENTITY_KEY))
        })?;
        serde_json::from_value(inner.clone())
            .map_err(|e| PnError::InvalidArgument(format!("{}: {e}", Self::ENTITY_KEY)))
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Paginated response for national business check queries.
pub type BusinessCheckResponse = ResponseCollection<BusinessCheckResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_wrapped() {
        let raw = serde_json::json!({
            "NationalBusinessCheckResult": {
                "companyName": "Koninklijke PostNL B.V.",
                "kvkNumber": "27124700",
                "city": "Den Haag"
            }
        });
        let result = BusinessCheckResult::from_json(&raw).unwrap();
        assert_eq!(result.company_name, "Koninklijke PostNL B.V.");
        assert_eq!(result.kvk_number, "27124700");
        assert_eq!(result.city.as_deref(), Some("Den Haag"));
        assert!(result.postnl_key.is_none());
    }

    #[test]
    fn test_from_json_missing_wrapper() {
        let raw = serde_json::json!({"companyName": "X", "kvkNumber": "1"});
        let err = BusinessCheckResult::from_json(&raw).unwrap_err();
        assert!(matches!(err, PnError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_json_missing_required_field() {
        let raw = serde_json::json!({
            "NationalBusinessCheckResult": {"companyName": "No KVK"}
        });
        let err = BusinessCheckResult::from_json(&raw).unwrap_err();
        assert!(matches!(err, PnError::InvalidArgument(_)));
    }

    #[test]
    fn test_to_json_omits_unset_fields() {
        let raw = serde_json::json!({
            "NationalBusinessCheckResult": {
                "companyName": "X",
                "kvkNumber": "1"
            }
        });
        let result = BusinessCheckResult::from_json(&raw).unwrap();
        let json = result.to_json();
        assert_eq!(json["companyName"], "X");
        assert!(json.get("city").is_none());
    }

    #[test]
    fn test_response_collection_deserialize() {
        let raw = serde_json::json!({
            "NationalBusinessCheckResponse": {
                "totalPages": "1",
                "requestedPage": "1",
                "resultCount": "2",
                "result(s)": [
                    {"companyName": "Alpha B.V.", "kvkNumber": "11111111"},
                    {"companyName": "Beta B.V.", "kvkNumber": "22222222", "postnlKey": "pk-2"}
                ]
            }
        });
        let response = BusinessCheckResponse::from_json(&raw).unwrap();
        assert_eq!(response.len(), 2);
        assert_eq!(response.get(0).unwrap().company_name, "Alpha B.V.");
        assert_eq!(response.get(1).unwrap().postnl_key.as_deref(), Some("pk-2"));
        assert_eq!(response.result_count(), Some("2"));
    }
}
