pub use hyper::header::{self, HeaderName, HeaderValue};
pub use hyper::{Body, Method, StatusCode, Uri};
pub use mime::Mime;
