use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use shared::errors::HttpError;
use validator::{Validate, ValidationErrors};

/// JSON body extractor that runs `validator` rules before the handler sees
/// the payload.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(json_value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::BadRequest {
                error: "Invalid JSON",
                message: rejection.body_text(),
            })?;

        json_value
            .validate()
            .map_err(|validation_errors| HttpError::Validation {
                message: format_validation_errors(&validation_errors),
                details: Some(format_validation_errors_detailed(&validation_errors)),
            })?;

        Ok(Self(json_value))
    }
}

fn message_for(field: &str, error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match error.code.as_ref() {
            "email" => "Invalid email format".to_string(),
            "length" => "Invalid length".to_string(),
            "range" => "Value out of range".to_string(),
            _ => format!("Invalid {field}"),
        })
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |e| format!("{field}: {}", message_for(&field, e)))
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

fn format_validation_errors_detailed(errors: &ValidationErrors) -> Value {
    let mut error_map = Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| message_for(&field, e))
            .collect();
        error_map.insert(field.to_string(), json!(messages));
    }

    Value::Object(error_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(range(min = 1, max = 999, message = "Quantity cannot exceed 999"))]
        quantity: i32,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn rule_violations_carry_field_details() {
        let err = SimpleValidatedJson::<Payload>::from_request(request(r#"{"quantity":1000}"#), &())
            .await
            .err()
            .unwrap();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        match err {
            HttpError::Validation { message, details } => {
                assert_eq!(message, "quantity: Quantity cannot exceed 999");
                assert_eq!(
                    details,
                    Some(json!({ "quantity": ["Quantity cannot exceed 999"] }))
                );
            }
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let err = SimpleValidatedJson::<Payload>::from_request(request("{"), &())
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            HttpError::BadRequest {
                error: "Invalid JSON",
                ..
            }
        ));
    }
}
