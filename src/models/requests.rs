use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Booking;

/// Request to rank candidate cleaners for a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankCandidatesRequest {
    #[validate(custom(function = "validate_booking"))]
    pub booking: Booking,
    #[validate(range(min = 1))]
    #[serde(alias = "top_k", rename = "topK", default)]
    pub top_k: Option<u16>,
    #[serde(alias = "auto_assign", rename = "autoAssign", default)]
    pub auto_assign: bool,
}

fn validate_booking(booking: &Booking) -> Result<(), validator::ValidationError> {
    if booking.address.city.trim().is_empty() {
        return Err(validator::ValidationError::new("booking_city_required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json(city: &str, top_k: &str) -> String {
        format!(
            r#"{{
                "booking": {{
                    "id": "7f9c24e8-3b12-4fef-91e0-3a6f0b5d2c11",
                    "scheduledDate": "2024-06-03",
                    "scheduledTime": "10:00:00",
                    "serviceType": "REGULAR_CLEANING",
                    "address": {{ "street": "1 Main St", "city": "{}" }}
                }},
                "topK": {}
            }}"#,
            city, top_k
        )
    }

    #[test]
    fn test_valid_request() {
        let req: RankCandidatesRequest = serde_json::from_str(&request_json("Leeds", "5")).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.top_k, Some(5));
        assert!(!req.auto_assign);
    }

    #[test]
    fn test_blank_city_rejected() {
        let req: RankCandidatesRequest = serde_json::from_str(&request_json("  ", "null")).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let req: RankCandidatesRequest = serde_json::from_str(&request_json("Leeds", "0")).unwrap();
        assert!(req.validate().is_err());
    }
}
