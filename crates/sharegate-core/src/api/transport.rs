//! The HTTP exchange behind the gateway.
//!
//! [`Transport`] is the seam between request building and the network.
//! [`ReqwestTransport`] is the real one; tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::multipart;
use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use super::error::TransportError;

/// One named part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub content: PartContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Text(String),
    File {
        filename: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

/// A multipart form. The transport chooses the boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::File {
                filename: filename.into(),
                bytes,
                mime: None,
            },
        });
        self
    }

    fn into_reqwest(self) -> Result<multipart::Form, TransportError> {
        let mut form = multipart::Form::new();
        for part in self.parts {
            form = match part.content {
                PartContent::Text(value) => form.text(part.name, value),
                PartContent::File {
                    filename,
                    bytes,
                    mime,
                } => {
                    let mut file = multipart::Part::bytes(bytes).file_name(filename);
                    if let Some(mime) = mime {
                        file = file
                            .mime_str(&mime)
                            .map_err(|e| TransportError::InvalidMultipart(e.to_string()))?;
                    }
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }
}

/// Request body as handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Bytes(Vec<u8>),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport over a pooled reqwest client.
/// Clone is cheap - reqwest::Client uses Arc internally.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        builder = match request.body {
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            // reqwest sets the multipart content type and boundary
            Some(RequestBody::Multipart(form)) => builder.multipart(form.into_reqwest()?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    enum Reply {
        Response(u16, Vec<u8>),
        Unreachable(String),
    }

    /// Records every request and answers from a queue of canned replies.
    /// The last reply repeats once the queue is down to one.
    #[derive(Debug)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        fn with_reply(reply: Reply) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([reply])),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn json(status: u16, body: &str) -> Self {
            Self::with_reply(Reply::Response(status, body.as_bytes().to_vec()))
        }

        pub fn unreachable() -> Self {
            Self::with_reply(Reply::Unreachable("connection refused".to_string()))
        }

        pub fn then_json(self, status: u16, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Reply::Response(status, body.as_bytes().to_vec()));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().expect("no request sent")
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.len() > 1 {
                    replies.pop_front().unwrap()
                } else {
                    replies.front().cloned().unwrap()
                }
            };
            match reply {
                Reply::Response(status, body) => Ok(HttpResponse {
                    status: StatusCode::from_u16(status).unwrap(),
                    body,
                }),
                Reply::Unreachable(reason) => Err(TransportError::Unreachable(reason)),
            }
        }
    }
}
