//! `REPORT` handling for calendar-search documents.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Response, StatusCode};

use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::{AuthContext, CalendarQueryEngine, NodeResolver};
use calshare_core::types::{DavRequest, Privilege};

use crate::error::DavError;
use crate::filter::CalendarSearchReport;
use crate::namespace::DavNamespaces;
use crate::plugin::{PluginOutcome, ServerPlugin, has_xml_content_type, request_path};
use crate::properties::build_search_multistatus;
use crate::sharing::{DocumentType, sniff_document};

/// Answers calendar-search reports from the query engine.
pub struct SearchReportPlugin {
    resolver: Arc<dyn NodeResolver>,
    auth: Arc<dyn AuthContext>,
    engine: Arc<dyn CalendarQueryEngine>,
    namespaces: DavNamespaces,
    config: DavConfig,
}

impl SearchReportPlugin {
    /// Creates the plugin.
    pub fn new(
        config: &DavConfig,
        resolver: Arc<dyn NodeResolver>,
        auth: Arc<dyn AuthContext>,
        engine: Arc<dyn CalendarQueryEngine>,
    ) -> Self {
        Self {
            resolver,
            auth,
            engine,
            namespaces: DavNamespaces::from(&config.namespaces),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ServerPlugin for SearchReportPlugin {
    fn name(&self) -> &'static str {
        "calendar-search"
    }

    async fn handle(&self, request: DavRequest) -> Result<PluginOutcome, DavError> {
        if request.method().as_str() != "REPORT" || !has_xml_content_type(&request) {
            return Ok(PluginOutcome::Unhandled(request));
        }

        if sniff_document(request.body(), &self.namespaces) != DocumentType::CalendarSearch {
            return Ok(PluginOutcome::Unhandled(request));
        }

        let path = request_path(&request);
        match self.resolver.resolve(&path).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => return Ok(PluginOutcome::Unhandled(request)),
            Err(e) => return Err(DavError::Backend(e)),
        }

        let Some(user) = self.auth.current_user(&request) else {
            return Err(DavError::NeedPrivileges {
                path,
                privilege: Privilege::Read,
            });
        };

        let query = CalendarSearchReport::parse(request.body(), &self.namespaces)?;
        let principal = self.config.principal_for(&user);
        let hits = self.engine.search(&principal, &query).await?;

        tracing::debug!(
            path = %path,
            principal = %principal,
            hits = hits.len(),
            "Calendar search answered"
        );

        let response = Response::builder()
            .status(StatusCode::MULTI_STATUS)
            .header(http::header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(build_search_multistatus(&self.namespaces.dav, &hits))
            .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))?;

        Ok(PluginOutcome::Handled(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use bytes::Bytes;
    use calshare_core::AppResult;
    use calshare_core::traits::DavNode;
    use calshare_core::types::{RequestIdentity, SearchHit, SearchQuery};
    use std::sync::Mutex;

    const REPORT: &str = r#"<nc:calendar-search xmlns:nc="http://nextcloud.com/ns">
  <nc:filter>
    <nc:comp-filter name="VEVENT"/>
    <nc:prop-filter name="SUMMARY"/>
    <nc:search-term>standup</nc:search-term>
  </nc:filter>
  <nc:limit>5</nc:limit>
</nc:calendar-search>"#;

    #[derive(Debug)]
    struct Home;

    impl DavNode for Home {
        fn name(&self) -> &str {
            "alice"
        }
    }

    struct OneHome;

    #[async_trait]
    impl NodeResolver for OneHome {
        async fn resolve(&self, path: &str) -> AppResult<Arc<dyn DavNode>> {
            if path == "calendars/alice" {
                Ok(Arc::new(Home) as Arc<dyn DavNode>)
            } else {
                Err(AppError::not_found(path.to_string()))
            }
        }
    }

    struct Auth;

    impl AuthContext for Auth {
        fn current_user(&self, request: &DavRequest) -> Option<String> {
            request
                .extensions()
                .get::<RequestIdentity>()
                .map(|i| i.user_id.clone())
        }

        fn is_authenticated(&self, _request: &DavRequest, _principal: &str) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct RecordingEngine {
        seen: Mutex<Vec<(String, SearchQuery)>>,
    }

    #[async_trait]
    impl CalendarQueryEngine for RecordingEngine {
        async fn search(
            &self,
            principal_uri: &str,
            query: &SearchQuery,
        ) -> AppResult<Vec<SearchHit>> {
            self.seen
                .lock()
                .unwrap()
                .push((principal_uri.to_string(), query.clone()));
            Ok(vec![SearchHit {
                href: "/calendars/alice/personal/standup.ics".into(),
                etag: "e1".into(),
            }])
        }
    }

    fn report(path: &str, body: &str) -> DavRequest {
        let mut request = http::Request::builder()
            .method(http::Method::from_bytes(b"REPORT").unwrap())
            .uri(path)
            .header("Content-Type", "application/xml")
            .body(Bytes::from(body.to_string()))
            .unwrap();
        request
            .extensions_mut()
            .insert(RequestIdentity::basic("alice"));
        request
    }

    fn plugin(engine: Arc<RecordingEngine>) -> SearchReportPlugin {
        SearchReportPlugin::new(&DavConfig::default(), Arc::new(OneHome), Arc::new(Auth), engine)
    }

    #[tokio::test]
    async fn test_search_report() {
        let engine = Arc::new(RecordingEngine::default());
        let outcome = plugin(engine.clone())
            .handle(report("/calendars/alice/", REPORT))
            .await
            .unwrap();

        let PluginOutcome::Handled(response) = outcome else {
            panic!("expected handled");
        };
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
        assert!(response.body().contains("standup.ics"));

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen[0].0, "principals/alice");
        assert_eq!(seen[0].1.search_term.as_deref(), Some("standup"));
        assert_eq!(seen[0].1.limit, Some(5));
    }

    #[tokio::test]
    async fn test_malformed_filter_is_bad_request() {
        let body = r#"<nc:calendar-search xmlns:nc="http://nextcloud.com/ns">
  <nc:filter><nc:comp-filter/><nc:search-term>x</nc:search-term></nc:filter>
</nc:calendar-search>"#;
        let err = plugin(Arc::new(RecordingEngine::default()))
            .handle(report("/calendars/alice", body))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("{http://nextcloud.com/ns}comp-filter"));
    }

    #[tokio::test]
    async fn test_other_reports_fall_through() {
        let engine = Arc::new(RecordingEngine::default());
        let body = r#"<c:calendar-query xmlns:c="urn:ietf:params:xml:ns:caldav"/>"#;
        let outcome = plugin(engine.clone())
            .handle(report("/calendars/alice", body))
            .await
            .unwrap();
        assert!(!outcome.is_handled());

        let outcome = plugin(engine.clone())
            .handle(report("/calendars/nobody", REPORT))
            .await
            .unwrap();
        assert!(!outcome.is_handled());
        assert!(engine.seen.lock().unwrap().is_empty());
    }
}
