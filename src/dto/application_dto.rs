use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::application::NewApplication;

pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully!";

/// The browser form posts `experience` as text, API clients send a number.
fn deserialize_experience<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Float(f64),
        String(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(i)) => Ok(Some(i)),
        // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
        Some(IntOrString::Float(f))
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(Some(f as i64))
        }
        Some(IntOrString::Float(f)) => Err(serde::de::Error::custom(format!(
            "Invalid experience value: {}",
            f
        ))),
        Some(IntOrString::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("Invalid experience value: {}", s)))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[validate(required, length(min = 1))]
    pub full_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
    #[validate(required, length(min = 1))]
    pub position: Option<String>,
    #[validate(required)]
    #[serde(default, deserialize_with = "deserialize_experience")]
    pub experience: Option<i64>,
    #[validate(required, length(min = 1))]
    pub bio: Option<String>,
}

impl ApplicationPayload {
    pub fn into_new_application(self) -> Result<NewApplication> {
        self.validate()?;
        match self {
            ApplicationPayload {
                full_name: Some(full_name),
                email: Some(email),
                phone: Some(phone),
                position: Some(position),
                experience: Some(experience),
                bio: Some(bio),
            } => Ok(NewApplication {
                full_name,
                email,
                phone,
                position,
                experience,
                bio,
            }),
            _ => Err(Error::MissingFields),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub message: String,
    pub id: i64,
    pub preview_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ApplicationPayload {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    fn complete() -> serde_json::Value {
        json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+15550001111",
            "position": "Backend Engineer",
            "experience": 7,
            "bio": "Analytical engines."
        })
    }

    #[test]
    fn experience_accepts_numeric_strings() {
        let mut body = complete();
        body["experience"] = json!(" 12 ");
        let app = payload(body).into_new_application().unwrap();
        assert_eq!(app.experience, 12);
    }

    #[test]
    fn zero_experience_counts_as_present() {
        let mut body = complete();
        body["experience"] = json!(0);
        assert_eq!(payload(body).into_new_application().unwrap().experience, 0);
    }

    #[test]
    fn empty_experience_string_is_missing() {
        let mut body = complete();
        body["experience"] = json!("");
        assert!(matches!(
            payload(body).into_new_application(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn non_numeric_experience_is_rejected() {
        let mut body = complete();
        body["experience"] = json!("lots");
        assert!(serde_json::from_value::<ApplicationPayload>(body).is_err());
    }

    #[test]
    fn out_of_range_experience_is_rejected() {
        for value in [
            json!(1e30),
            json!(-1e30),
            json!(9_223_372_036_854_775_808u64),
            json!(9.223372036854775807e18),
            json!("9223372036854775808"),
        ] {
            let mut body = complete();
            body["experience"] = value.clone();
            assert!(
                serde_json::from_value::<ApplicationPayload>(body).is_err(),
                "{value} should be rejected"
            );
        }

        let mut body = complete();
        body["experience"] = json!(i64::MIN);
        assert_eq!(
            payload(body).into_new_application().unwrap().experience,
            i64::MIN
        );
    }

    #[test]
    fn text_fields_must_be_strings() {
        for field in ["fullName", "email", "phone", "position", "bio"] {
            let mut body = complete();
            body[field] = json!(123);
            assert!(
                serde_json::from_value::<ApplicationPayload>(body).is_err(),
                "numeric {field} should be rejected"
            );
        }
    }

    #[test]
    fn each_missing_or_empty_field_is_rejected() {
        for field in ["fullName", "email", "phone", "position", "experience", "bio"] {
            let mut missing = complete();
            missing.as_object_mut().unwrap().remove(field);
            assert!(
                payload(missing).into_new_application().is_err(),
                "missing {field} should be rejected"
            );

            if field != "experience" {
                let mut empty = complete();
                empty[field] = json!("");
                assert!(
                    payload(empty).into_new_application().is_err(),
                    "empty {field} should be rejected"
                );
            }
        }
    }
}
