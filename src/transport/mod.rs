//! HTTP transport layer for the Gemini API client.

mod http;
mod error;
mod reqwest;
pub mod endpoints;
mod request;
mod response;

pub use http::{HttpTransport, HttpMethod, HttpRequest, HttpResponse};
pub use error::TransportError;
pub use reqwest::ReqwestTransport;
pub use request::RequestBuilder;
pub use response::ResponseParser;
