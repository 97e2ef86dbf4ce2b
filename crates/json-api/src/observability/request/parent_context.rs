//! W3C trace context extraction from incoming headers.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    let extractor = HeaderExtractor(headers);

    global::get_text_map_propagator(|propagator| {
        // Start from an empty context so requests without `traceparent` begin a new trace.
        let context = propagator.extract_with_context(&Context::new(), &extractor);
        let valid = context.span().span_context().is_valid();

        valid.then_some(context)
    })
}

#[derive(Debug)]
struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::header::HeaderValue;

    use super::*;

    #[test]
    fn test_extractor_reads_headers() {
        let mut headers = HeaderMap::new();

        headers.insert("traceparent", HeaderValue::from_static("00-abc-def-01"));

        let extractor = HeaderExtractor(&headers);

        assert_eq!(extractor.get("traceparent"), Some("00-abc-def-01"));
        assert_eq!(extractor.get("tracestate"), None);
        assert_eq!(extractor.keys(), vec!["traceparent"]);
    }

    #[test]
    fn test_missing_traceparent_yields_no_parent() {
        assert!(extract_parent_context(&HeaderMap::new()).is_none());
    }
}
