//! Classifies requests by method. POST bodies are buffered to the end of
//! the stream and logged before the fixed acknowledgement goes out; every
//! other method is refused without touching the body.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Body,
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};

use crate::error::{BoxError, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Received,
    MethodNotAllowed,
}

impl Reply {
    pub const fn status(self) -> StatusCode {
        match self {
            Reply::Received => StatusCode::OK,
            Reply::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub const fn payload(self) -> &'static str {
        match self {
            Reply::Received => "POST request received",
            Reply::MethodNotAllowed => "Only POST method is supported",
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from_static(self.payload().as_bytes())));
        *response.status_mut() = self.status();
        // Plain-text payload under a JSON content type. Clients may already
        // depend on the exact bytes, so neither side gets corrected.
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

pub async fn handle<B>(req: Request<B>, body_limit: Option<usize>) -> Result<Response<Full<Bytes>>, Error>
where
    B: Body + Unpin,
    B::Error: Into<BoxError>,
{
    if req.method() != Method::POST {
        tracing::debug!(message = "Rejecting request", method = %req.method(), path = req.uri().path());
        return Ok(Reply::MethodNotAllowed.into_response());
    }

    let (head, mut body) = req.into_parts();
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|err| Error::Body(err.into()))?;
        let Ok(chunk) = frame.into_data() else {
            continue;
        };
        if let Some(limit) = body_limit {
            if buf.len() + chunk.remaining() > limit {
                return Err(Error::BodyTooLarge { limit });
            }
        }
        buf.put(chunk);
    }

    let body = String::from_utf8_lossy(&buf);
    tracing::info!(message = "Received POST request with body", %body);
    tracing::info!(message = "Received POST request with req", req = ?head);

    Ok(Reply::Received.into_response())
}
