use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use garde::Validate;
use serde::de::DeserializeOwned;
use crate::error::AppError;

/// `Json<T>` that also runs the `garde` rules on `T`.
/// Both malformed bodies and rule violations become `AppError::Validation`.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::validation("body", rejection.body_text()))?;

        value.validate().map_err(|report| {
            match report.iter().next() {
                Some((path, error)) => {
                    let field = path.to_string();
                    let field = if field.is_empty() { "value".to_string() } else { field };
                    AppError::validation(field, error.message())
                }
                None => AppError::validation("value", "Validation failed"),
            }
        })?;

        Ok(ValidatedJson(value))
    }
}
