use crate::internal_prelude::*;

use std::ops::{Deref, DerefMut};

/// The request flowing down a chain. Derefs to the hyper request.
#[derive(Debug)]
pub struct Request(HyperRequest);

impl Request {
    pub(crate) fn from_hyper(req: HyperRequest) -> Self {
        Self(req)
    }

    pub fn into_hyper(self) -> HyperRequest {
        self.0
    }
}

impl From<HyperRequest> for Request {
    fn from(req: HyperRequest) -> Self {
        Self::from_hyper(req)
    }
}

impl Deref for Request {
    type Target = HyperRequest;

    fn deref(&self) -> &HyperRequest {
        &self.0
    }
}

impl DerefMut for Request {
    fn deref_mut(&mut self) -> &mut HyperRequest {
        &mut self.0
    }
}

#[test]
fn adapters_can_annotate_requests() {
    struct Seen(&'static str);

    let mut req = Request::from(hyper::Request::new(Body::empty()));
    req.extensions_mut().insert(Seen("outer"));

    let hreq = req.into_hyper();
    assert_eq!(hreq.extensions().get::<Seen>().map(|s| s.0), Some("outer"));
}
