use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::{Body as HttpBody, Frame, Incoming};

/// Response body: empty, a fixed JSON payload from the translation layer, or
/// the streamed body of an upstream response.
#[derive(Debug)]
pub enum Body {
    Empty,
    Fixed(Full<Bytes>),
    Upstream(Incoming),
}

impl Body {
    pub fn empty() -> Self {
        Body::Empty
    }

    pub fn fixed(data: Vec<u8>) -> Self {
        Body::Fixed(Full::new(Bytes::from(data)))
    }

    pub fn upstream(incoming: Incoming) -> Self {
        Body::Upstream(incoming)
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Body::Empty => Poll::Ready(None),
            Body::Fixed(body) => Pin::new(body)
                .poll_frame(cx)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
            Body::Upstream(body) => Pin::new(body)
                .poll_frame(cx)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}
