#[cfg(test)]
mod server_tests {
    use anchain_aml_mcp::*;
    use anchain_aml_providers::{ApiKey, HttpTransport};
    use anchain_aml_tools::{AmlToolAdapter, ToolDispatcher, ToolRegistry};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (Arc<McpServer>, MockServer) {
        let provider = MockServer::start().await;
        let transport = Arc::new(HttpTransport::new(format!("{}/api", provider.uri())));
        let adapter = AmlToolAdapter::new(ApiKey::new("test-key").unwrap(), transport)
            .with_timeout(Duration::from_secs(5));
        let registry = Arc::new(ToolRegistry::with_screening_tools(adapter));
        let server = Arc::new(McpServer::new(ToolDispatcher::new(registry)));
        (server, provider)
    }

    async fn call(server: &McpServer, request: Value) -> Value {
        let line = server.handle_line(&request.to_string()).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        })
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let (server, _provider) = setup().await;
        let response = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {"protocolVersion": "2025-03-26", "capabilities": {}}
            }),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (server, _provider) = setup().await;
        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        )
        .await;

        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["crypto_screening", "ip_screening", "sanctions_screening"]
        );
    }

    #[tokio::test]
    async fn test_crypto_screening_end_to_end() {
        let (server, provider) = setup().await;
        let provider_body = json!({
            "status": 200,
            "data": {
                "risk": {"score": 95, "level": "severe"},
                "sanctions": [{"list": "OFAC SDN", "program": "CYBER2"}]
            }
        });
        Mock::given(method("GET"))
            .and(path("/api/crypto_screening"))
            .and(header("Authorization", "Bearer test-key"))
            .and(query_param("protocol", "btc"))
            .and(query_param("address", "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_body.clone()))
            .expect(1)
            .mount(&provider)
            .await;

        let response = call(
            &server,
            tool_call(
                3,
                "crypto_screening",
                json!({"address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", "proto": "btc"}),
            ),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"], provider_body);
        let text: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text, provider_body);
    }

    #[tokio::test]
    async fn test_unsupported_protocol_makes_no_provider_call() {
        let (server, provider) = setup().await;

        let response = call(
            &server,
            tool_call(4, "crypto_screening", json!({"address": "0xabc", "proto": "notachain"})),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["kind"], "ValidationError");
        assert_eq!(result["structuredContent"]["code"], "UnsupportedProtocol");
        assert!(provider.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sanctions_rate_limited() {
        let (server, provider) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/sanctions_screening"))
            .and(body_json(json!({
                "schema": "person",
                "scope": "basic",
                "properties": {
                    "name": ["John Doe"],
                    "nationality": ["us"],
                    "birthYear": [1980]
                }
            })))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "60")
                    .set_body_json(json!({"err_msg": "rate limit exceeded"})),
            )
            .expect(1)
            .mount(&provider)
            .await;

        let response = call(
            &server,
            tool_call(
                5,
                "sanctions_screening",
                json!({"name": ["John Doe"], "nationality": ["us"], "birthYear": ["1980"]}),
            ),
        )
        .await;

        let error = &response["result"]["structuredContent"];
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(error["kind"], "RateLimited");
        assert_eq!(error["retry_after"], "60");
        assert_eq!(error["status"], 429);
    }

    #[tokio::test]
    async fn test_ip_screening_auth_failure() {
        let (server, provider) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/ip_screening"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&provider)
            .await;

        let response = call(
            &server,
            tool_call(6, "ip_screening", json!({"ip_address": "8.8.8.8"})),
        )
        .await;

        let error = &response["result"]["structuredContent"];
        assert_eq!(error["kind"], "AuthenticationError");
        assert!(!response.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let (server, _provider) = setup().await;
        let line = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
        assert!(server.handle_line(&line).await.is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_null_id_is_a_request_not_a_notification() {
        let (server, _provider) = setup().await;
        let line = server
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .expect("null id must be answered");
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let (server, _provider) = setup().await;

        let response: Value =
            serde_json::from_str(&server.handle_line("{not json").await.unwrap()).unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);

        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32601);

        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {}}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);

        let response = call(&server, json!({"jsonrpc": "1.0", "id": 9, "method": "ping"})).await;
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_serve_over_stream() {
        let (server, provider) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/ip_screening"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"country": "US"}})))
            .mount(&provider)
            .await;

        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, mut client_out) = tokio::io::duplex(64 * 1024);

        let handle = tokio::spawn(server.serve(server_in, server_out));

        let requests = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            tool_call(2, "ip_screening", json!({"ip_address": "8.8.8.8"})),
            tool_call(3, "ip_screening", json!({"ip_address": "not-an-ip"})),
        ];
        for request in &requests {
            client_in
                .write_all(format!("{}\n", request).as_bytes())
                .await
                .unwrap();
        }
        drop(client_in);

        let mut output = String::new();
        client_out.read_to_string(&mut output).await.unwrap();
        handle.await.unwrap().unwrap();

        let responses: HashMap<u64, Value> = output
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap())
            .map(|v| (v["id"].as_u64().unwrap(), v))
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[&1]["result"], json!({}));
        assert_eq!(responses[&2]["result"]["isError"], false);
        assert_eq!(
            responses[&2]["result"]["structuredContent"]["data"]["country"],
            "US"
        );
        assert_eq!(
            responses[&3]["result"]["structuredContent"]["code"],
            "InvalidIpFormat"
        );
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8_line() {
        let (server, _provider) = setup().await;

        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, mut client_out) = tokio::io::duplex(64 * 1024);

        let handle = tokio::spawn(server.serve(server_in, server_out));

        let mut input = br#"{"jsonrpc":"2.0","id":1,"method":"ping","x":""#.to_vec();
        input.push(0xff);
        input.extend_from_slice(b"\"}\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        client_in.write_all(&input).await.unwrap();
        drop(client_in);

        let mut output = String::new();
        client_out.read_to_string(&mut output).await.unwrap();
        handle.await.unwrap().unwrap();

        let responses: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);

        let parse_error = responses
            .iter()
            .find(|r| r["id"].is_null())
            .expect("bad line answered with a parse error");
        assert_eq!(parse_error["error"]["code"], -32700);

        let ping = responses
            .iter()
            .find(|r| r["id"] == 2)
            .expect("later request still served");
        assert_eq!(ping["result"], json!({}));
    }
}
