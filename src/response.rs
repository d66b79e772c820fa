//! Response disposal and JSON decoding.
//!
//! A `reqwest::Response` body can only be read once. [`dispose`] drains it
//! into a [`BufferedResponse`] so it can be logged, inspected on failure, and
//! still decoded by the caller afterwards.

use bytes::Bytes;
use log::Level;
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::auth::mask;
use crate::client::Client;
use crate::error::{Error, Result, ServerErrors};

/// A response whose body has been read fully into memory.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body: Bytes,
}

impl BufferedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The buffered body. Cheap to call repeatedly.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON into `T`, consuming the buffer.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Buffer the body of `response` and map its status onto the error taxonomy.
///
/// With `redact` set the body is only logged through [`mask`].
pub(crate) async fn dispose(
    client: &Client,
    response: Response,
    redact: bool,
) -> Result<BufferedResponse> {
    let status = response.status();
    let headers = response.headers().clone();
    client.emit(Level::Info, format_args!("response: {status}"));

    let body = response.bytes().await?;
    let buffered = BufferedResponse::new(status, headers, body);
    let text = buffered.text();
    let logged = if redact { mask(&text) } else { text };
    client.emit(Level::Debug, format_args!("response body: {logged}"));

    classify(buffered)
}

/// Status classification, separated from I/O so it can be exercised directly.
pub fn classify(response: BufferedResponse) -> Result<BufferedResponse> {
    match response.status.as_u16() {
        200 | 201 | 202 | 204 => Ok(response),
        400 | 422 => {
            let errors: ServerErrors = response.decode()?;
            Err(Error::Validation(errors))
        }
        401 => Err(Error::Authentication),
        404 => Err(Error::NotFound),
        _ => Err(Error::Status(response.status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn buffered(status: u16, body: &str) -> BufferedResponse {
        BufferedResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn success_codes_pass_through() {
        for status in [200, 201, 202, 204] {
            let res = classify(buffered(status, "")).unwrap();
            assert_eq!(res.status.as_u16(), status);
        }
    }

    #[test]
    fn unprocessable_entity_carries_messages() {
        let err = classify(buffered(422, r#"{"errors":["a","b"]}"#)).unwrap_err();
        match &err {
            Error::Validation(errs) => assert_eq!(errs.errors, vec!["a", "b"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "a, b");
    }

    #[test]
    fn bad_request_with_garbage_body_is_decode_error() {
        let err = classify(buffered(400, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn unauthorized_ignores_body() {
        let err = classify(buffered(401, r#"{"errors":["nope"]}"#)).unwrap_err();
        assert!(matches!(err, Error::Authentication));
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn not_found_ignores_body() {
        let err = classify(buffered(404, "whatever")).unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[test]
    fn other_status_keeps_status_line() {
        let err = classify(buffered(503, "")).unwrap_err();
        assert!(matches!(err, Error::Status(StatusCode::SERVICE_UNAVAILABLE)));
        assert_eq!(err.to_string(), "client: 503 Service Unavailable");
    }

    #[test]
    fn body_can_be_read_before_decoding() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }

        let res = buffered(200, r#"{"name":"rails-1"}"#);
        assert_eq!(res.text(), r#"{"name":"rails-1"}"#);
        assert_eq!(res.body().len(), 18);
        let named: Named = res.decode().unwrap();
        assert_eq!(named.name, "rails-1");
    }

    #[test]
    fn decode_shape_mismatch() {
        let err = buffered(200, r#"{"name":1}"#)
            .decode::<Vec<String>>()
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
