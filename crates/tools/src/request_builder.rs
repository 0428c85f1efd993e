//! Pure construction of provider requests. No I/O happens here.

use crate::request::{CryptoScreeningRequest, IpScreeningRequest, SanctionsScreeningRequest};
use anchain_aml_providers::constants::{
    CRYPTO_SCREENING_PATH, HEADER_AUTHORIZATION, IP_SCREENING_PATH, SANCTIONS_SCREENING_PATH,
};
use anchain_aml_providers::{ApiKey, Header, HttpMethod, RequestDescriptor};
use serde_json::{json, Map, Value};

fn auth_headers(api_key: &ApiKey) -> Vec<Header> {
    vec![
        Header::sensitive(HEADER_AUTHORIZATION, format!("Bearer {}", api_key.expose())),
        Header::new("Accept", "application/json"),
    ]
}

/// `GET crypto_screening?protocol=<code>&address=<address>`
pub fn build_crypto_request(req: &CryptoScreeningRequest, api_key: &ApiKey) -> RequestDescriptor {
    RequestDescriptor {
        method: HttpMethod::Get,
        path: CRYPTO_SCREENING_PATH.to_string(),
        headers: auth_headers(api_key),
        query: vec![
            ("protocol".to_string(), req.protocol.code().to_string()),
            ("address".to_string(), req.address.clone()),
        ],
        body: None,
    }
}

/// `POST sanctions_screening` with a JSON body.
///
/// Search fields go under `properties`, each as an array. Fields the caller did
/// not supply are left out of the body entirely.
pub fn build_sanctions_request(
    req: &SanctionsScreeningRequest,
    api_key: &ApiKey,
) -> RequestDescriptor {
    let mut properties = Map::new();
    if let Some(name) = &req.name {
        properties.insert("name".into(), json!(name));
    }
    if let Some(id_number) = &req.id_number {
        properties.insert("idNumber".into(), json!(id_number));
    }
    if let Some(nationality) = &req.nationality {
        properties.insert("nationality".into(), json!(nationality));
    }
    if let Some(birth_year) = &req.birth_year {
        properties.insert("birthYear".into(), json!(birth_year));
    }

    let body = json!({
        "schema": req.schema.as_str(),
        "scope": req.scope.as_str(),
        "properties": Value::Object(properties),
    });

    let mut headers = auth_headers(api_key);
    headers.push(Header::new("Content-Type", "application/json"));

    RequestDescriptor {
        method: HttpMethod::Post,
        path: SANCTIONS_SCREENING_PATH.to_string(),
        headers,
        query: Vec::new(),
        body: Some(body),
    }
}

/// `GET ip_screening?ip_address=<ip>`
pub fn build_ip_request(req: &IpScreeningRequest, api_key: &ApiKey) -> RequestDescriptor {
    RequestDescriptor {
        method: HttpMethod::Get,
        path: IP_SCREENING_PATH.to_string(),
        headers: auth_headers(api_key),
        query: vec![("ip_address".to_string(), req.ip_address.to_string())],
        body: None,
    }
}
