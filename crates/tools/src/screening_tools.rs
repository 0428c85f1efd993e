use crate::adapter::AmlToolAdapter;
use crate::protocol::Protocol;
use crate::request::SanctionsQuery;
use crate::traits::Tool;
use anchain_aml_providers::{ScreeningError, ValidationError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

fn parse_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, ScreeningError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| ScreeningError::from(ValidationError::InvalidArguments(e.to_string())))
}

/// Agents sometimes pass a bare value where a list is declared.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Scalar),
    Many(Vec<Scalar>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

impl OneOrMany {
    fn into_strings(self) -> Vec<String> {
        match self {
            Self::One(v) => vec![v.into_string()],
            Self::Many(vs) => vs.into_iter().map(Scalar::into_string).collect(),
        }
    }
}

#[derive(Deserialize)]
struct CryptoScreeningInput {
    address: String,
    proto: String,
}

#[derive(Deserialize)]
struct SanctionsScreeningInput {
    schema: Option<String>,
    scope: Option<String>,
    name: Option<OneOrMany>,
    #[serde(rename = "idNumber")]
    id_number: Option<OneOrMany>,
    nationality: Option<OneOrMany>,
    #[serde(rename = "birthYear")]
    birth_year: Option<OneOrMany>,
}

impl From<SanctionsScreeningInput> for SanctionsQuery {
    fn from(input: SanctionsScreeningInput) -> Self {
        Self {
            schema: input.schema,
            scope: input.scope,
            name: input.name.map(OneOrMany::into_strings),
            id_number: input.id_number.map(OneOrMany::into_strings),
            nationality: input.nationality.map(OneOrMany::into_strings),
            birth_year: input.birth_year.map(OneOrMany::into_strings),
        }
    }
}

#[derive(Deserialize)]
struct IpScreeningInput {
    ip_address: String,
}

pub struct CryptoScreeningTool {
    adapter: AmlToolAdapter,
}

impl CryptoScreeningTool {
    pub fn new(adapter: AmlToolAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl Tool for CryptoScreeningTool {
    fn name(&self) -> &'static str {
        "crypto_screening"
    }

    fn description(&self) -> String {
        format!(
            "Screen cryptocurrency addresses for risk factors and sanctions compliance.\n\n\
             Args:\n\
             \x20   address: crypto address (e.g. 0xf4548503dd51de15e8d0e6fb559f6062d38667e7, \
             bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh)\n\
             \x20   proto: 3-letter blockchain code of the crypto address (e.g. btc, eth, sol)\n\n\
             Supported protocols:\n{}",
            Protocol::table()
        )
    }

    fn schema(&self) -> serde_json::Value {
        let codes: Vec<&str> = Protocol::ALL.iter().map(|p| p.code()).collect();
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "Crypto address to screen"
                },
                "proto": {
                    "type": "string",
                    "description": format!("Blockchain protocol code, one of: {}", codes.join(", "))
                }
            },
            "required": ["address", "proto"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ScreeningError> {
        let input: CryptoScreeningInput = parse_args(args)?;
        self.adapter.crypto_screening(&input.address, &input.proto).await
    }
}

pub struct SanctionsScreeningTool {
    adapter: AmlToolAdapter,
}

impl SanctionsScreeningTool {
    pub fn new(adapter: AmlToolAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl Tool for SanctionsScreeningTool {
    fn name(&self) -> &'static str {
        "sanctions_screening"
    }

    fn description(&self) -> String {
        "Check individuals or entities against global sanctions lists.\n\n\
         Args:\n\
         \x20   schema: Type of entity (person, company, vessel, aircraft, crypto). Default: person\n\
         \x20   scope: Search scope (basic/full). Default: basic. Full scope requires enterprise plan.\n\
         \x20   name: Full name(s) to screen (e.g. [\"John Doe\"])\n\
         \x20   idNumber: Government ID or passport number(s) (e.g. [\"A12345678\"])\n\
         \x20   nationality: 2-letter country code(s) (ISO 3166-1, e.g. [\"us\", \"au\"])\n\
         \x20   birthYear: Birth year(s) (1000-9999, e.g. [1980, 1975])\n\n\
         Note:\n\
         \x20   - All query parameters are optional but at least one should be provided\n\
         \x20   - Multiple conditions (schema, name, etc.) are combined with AND logic\n\
         \x20   - Array elements within each condition are combined with OR logic"
            .to_string()
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "schema": {
                    "type": "string",
                    "enum": ["person", "company", "vessel", "aircraft", "crypto"],
                    "default": "person"
                },
                "scope": {
                    "type": "string",
                    "enum": ["basic", "full"],
                    "default": "basic"
                },
                "name": {"type": "array", "items": {"type": "string"}},
                "idNumber": {"type": "array", "items": {"type": "string"}},
                "nationality": {"type": "array", "items": {"type": "string"}},
                "birthYear": {"type": "array", "items": {"type": ["string", "integer"]}}
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ScreeningError> {
        let input: SanctionsScreeningInput = parse_args(args)?;
        self.adapter.sanctions_screening(input.into()).await
    }
}

pub struct IpScreeningTool {
    adapter: AmlToolAdapter,
}

impl IpScreeningTool {
    pub fn new(adapter: AmlToolAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl Tool for IpScreeningTool {
    fn name(&self) -> &'static str {
        "ip_screening"
    }

    fn description(&self) -> String {
        "Check if an IP address originates from a sanctioned country.\n\n\
         Args:\n\
         \x20   ip_address: The IP address to check (IPv4 or IPv6)"
            .to_string()
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "ip_address": {
                    "type": "string",
                    "description": "IPv4 or IPv6 address"
                }
            },
            "required": ["ip_address"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ScreeningError> {
        let input: IpScreeningInput = parse_args(args)?;
        self.adapter.ip_screening(&input.ip_address).await
    }
}
