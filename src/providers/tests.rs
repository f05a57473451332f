//! Provider tests with HTTP mocking.

mod cloudflare_tests {
    use crate::auth::Credentials;
    use crate::error::DdnsError;
    use crate::providers::{CloudflareProvider, DnsProvider, RecordSettings, RecordUpdate};
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, credentials: &Credentials) -> CloudflareProvider {
        CloudflareProvider::with_base_url(credentials, Duration::from_secs(5), server.uri()).unwrap()
    }

    fn token() -> Credentials {
        Credentials::new("test-token")
    }

    #[tokio::test]
    async fn test_find_zone_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("name", "example.com"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": [{"id": "Z1", "name": "example.com"}, {"id": "Z2"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let zone = provider(&mock_server, &token())
            .find_zone("example.com")
            .await
            .unwrap();

        assert_eq!(zone.id, "Z1");
        assert_eq!(zone.name.as_deref(), Some("example.com"));
    }

    #[tokio::test]
    async fn test_find_zone_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": []})),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &token())
            .find_zone("missing.example")
            .await;

        assert!(matches!(result, Err(DdnsError::ZoneNotFound(d)) if d == "missing.example"));
    }

    #[tokio::test]
    async fn test_find_zone_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &token()).find_zone("example.com").await;

        match result {
            Err(DdnsError::Http { status, body, .. }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_zone_lookup_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": [{"id": "Z1"}]}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            &token(),
            Duration::from_millis(300),
            mock_server.uri(),
        )
        .unwrap();

        let result = provider.find_zone("example.com").await;
        assert!(matches!(result, Err(DdnsError::Network(_))));
    }

    #[tokio::test]
    async fn test_auth_error_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":false,"result":null,"errors":[{"code":10000,"message":"Invalid API token"}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &token()).find_zone("example.com").await;

        match result {
            Err(DdnsError::Provider { provider, message }) => {
                assert_eq!(provider, "cloudflare");
                assert!(message.contains("Invalid API token"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &token()).find_zone("example.com").await;

        assert!(matches!(result, Err(DdnsError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_email_header_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("X-Auth-Email", "ops@example.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": [{"id": "Z1"}]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let credentials = Credentials::new("test-token").with_email("ops@example.com");
        let zone = provider(&mock_server, &credentials)
            .find_zone("example.com")
            .await
            .unwrap();

        assert_eq!(zone.id, "Z1");
    }

    #[tokio::test]
    async fn test_find_record_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .and(query_param("name", "example.com"))
            .and(query_param("type", "A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": [
                    {"id": "R1", "content": "9.9.9.9"},
                    {"id": "R2", "content": "8.8.8.8"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let record = provider(&mock_server, &token())
            .find_record("Z1", "example.com")
            .await
            .unwrap();

        assert_eq!(record.id, "R1");
        assert_eq!(record.content.as_deref(), Some("9.9.9.9"));
    }

    #[tokio::test]
    async fn test_find_record_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": []})),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &token())
            .find_record("Z1", "example.com")
            .await;

        assert!(matches!(result, Err(DdnsError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records/R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"id": "R1", "content": "9.9.9.9"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let record = provider(&mock_server, &token())
            .get_record("Z1", "R1")
            .await
            .unwrap();

        assert_eq!(record.content.as_deref(), Some("9.9.9.9"));
    }

    #[tokio::test]
    async fn test_update_record_put_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/Z1/dns_records/R1"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "type": "A",
                "name": "example.com",
                "content": "1.2.3.4",
                "ttl": 300,
                "proxied": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": {"id": "R1", "content": "1.2.3.4"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let settings = RecordSettings {
            ttl: Some(300),
            proxied: Some(true),
        };
        let update = RecordUpdate::a_record("example.com", "1.2.3.4", &settings);
        let record = provider(&mock_server, &token())
            .update_record("Z1", "R1", &update)
            .await
            .unwrap();

        assert_eq!(record.content.as_deref(), Some("1.2.3.4"));
    }

    #[tokio::test]
    async fn test_update_record_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/Z1/dns_records/R1"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"success":false,"errors":[{"code":9005,"message":"Content for A record is invalid"}]}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let update = RecordUpdate::a_record("example.com", "1.2.3.4", &RecordSettings::default());
        let result = provider(&mock_server, &token())
            .update_record("Z1", "R1", &update)
            .await;

        assert!(matches!(result, Err(DdnsError::Http { status: 400, .. })));
    }

    #[test]
    fn test_empty_token_fails_construction() {
        let result = CloudflareProvider::new(&Credentials::new(""), Duration::from_secs(5));
        assert!(matches!(result, Err(DdnsError::Config(_))));
    }
}
