// Response handling shared by both service clients.

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Decode a 2xx JSON body, or turn any other status into [`Error::Http`].
pub(crate) async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(http_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Accept any 2xx response without looking at the body.
pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(http_error(status, resp).await)
    }
}

/// Capture the status and raw body text of a failed response.
pub(crate) async fn http_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let body = resp.text().await.unwrap_or_default();
    Error::Http {
        status: status.as_u16(),
        body,
    }
}
