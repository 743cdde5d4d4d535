//! Flash cross-domain policy

use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Policy served at `/crossdomain.xml`
pub const POLICY: &str = concat!(
    r#"<cross-domain-policy>"#,
    r#"<allow-http-request-headers-from domain="*.segment.io" headers="*"/>"#,
    r#"<site-control permitted-cross-domain-policies="all"/>"#,
    r#"<allow-access-from domain="*" secure="false"/>"#,
    r#"</cross-domain-policy>"#,
);

pub async fn crossdomain() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        POLICY,
    )
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn serves_policy_xml() {
        let response = crossdomain().await.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"<cross-domain-policy>"));
        assert!(body.ends_with(b"</cross-domain-policy>"));
    }
}
