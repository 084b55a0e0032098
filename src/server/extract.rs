use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;

/// Posted `(name, value)` pairs from a urlencoded or multipart body.
///
/// Anything unreadable yields no pairs, so validation reports every required
/// field as missing.
#[derive(Debug, Default)]
pub struct FormFields(pub Vec<(String, String)>);

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            return match Multipart::from_request(req, state).await {
                Ok(multipart) => Ok(Self(read_multipart(multipart).await)),
                Err(rejection) => {
                    tracing::debug!(%rejection, "unreadable multipart body");
                    Ok(Self::default())
                }
            };
        }

        match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => Ok(Self(pairs)),
            Err(rejection) => {
                tracing::debug!(%rejection, "unreadable form body");
                Ok(Self::default())
            }
        }
    }
}

/// Collect text parts; file uploads are skipped.
async fn read_multipart(mut multipart: Multipart) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "truncated multipart body");
                break;
            }
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }
        match field.text().await {
            Ok(value) => pairs.push((name, value)),
            Err(e) => {
                tracing::debug!(error = %e, field = %name, "unreadable multipart field");
                break;
            }
        }
    }
    pairs
}
