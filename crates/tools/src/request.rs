//! Validated per-call request values.
//!
//! Each type is built from caller input at the start of one tool invocation and
//! dropped at its end. Construction is where every local, pre-network check
//! happens: anything that fails here never reaches the transport.

use crate::protocol::Protocol;
use anchain_aml_providers::ValidationError;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoScreeningRequest {
    pub address: String,
    pub protocol: Protocol,
}

impl CryptoScreeningRequest {
    pub fn new(address: &str, proto: &str) -> Result<Self, ValidationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyField("address"));
        }
        let protocol = Protocol::resolve(proto)?;
        Ok(Self {
            address: address.to_string(),
            protocol,
        })
    }
}

/// Entity type searched by sanctions screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntitySchema {
    #[default]
    Person,
    Company,
    Vessel,
    Aircraft,
    Crypto,
}

impl EntitySchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
            Self::Vessel => "vessel",
            Self::Aircraft => "aircraft",
            Self::Crypto => "crypto",
        }
    }
}

impl FromStr for EntitySchema {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "company" => Ok(Self::Company),
            "vessel" => Ok(Self::Vessel),
            "aircraft" => Ok(Self::Aircraft),
            "crypto" => Ok(Self::Crypto),
            _ => Err(ValidationError::InvalidSchema(s.to_string())),
        }
    }
}

impl fmt::Display for EntitySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search depth tier. `Full` needs an entitlement only the provider can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Basic,
    Full,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Full => "full",
        }
    }
}

impl FromStr for SearchScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            _ => Err(ValidationError::InvalidScope(s.to_string())),
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied sanctions search, before validation.
///
/// `None` means the field was not supplied. Values within each field keep the
/// caller's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanctionsQuery {
    pub schema: Option<String>,
    pub scope: Option<String>,
    pub name: Option<Vec<String>>,
    pub id_number: Option<Vec<String>>,
    pub nationality: Option<Vec<String>>,
    pub birth_year: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanctionsScreeningRequest {
    pub schema: EntitySchema,
    pub scope: SearchScope,
    pub name: Option<Vec<String>>,
    pub id_number: Option<Vec<String>>,
    pub nationality: Option<Vec<String>>,
    pub birth_year: Option<Vec<u16>>,
}

impl SanctionsScreeningRequest {
    pub fn new(query: SanctionsQuery) -> Result<Self, ValidationError> {
        let schema = match query.schema.as_deref() {
            Some(s) => s.parse()?,
            None => EntitySchema::default(),
        };
        let scope = match query.scope.as_deref() {
            Some(s) => s.parse()?,
            None => SearchScope::default(),
        };

        let nationality = query
            .nationality
            .map(|values| {
                non_blank(values)
                    .into_iter()
                    .map(|v| normalize_country(&v))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let birth_year = query
            .birth_year
            .map(|values| {
                non_blank(values)
                    .iter()
                    .map(|v| parse_birth_year(v))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            schema,
            scope,
            name: query.name.map(non_blank).and_then(non_empty),
            id_number: query.id_number.map(non_blank).and_then(non_empty),
            nationality: nationality.and_then(non_empty),
            birth_year: birth_year.and_then(non_empty),
        })
    }

    /// Number of search fields that will be sent.
    pub fn search_field_count(&self) -> usize {
        [
            self.name.is_some(),
            self.id_number.is_some(),
            self.nationality.is_some(),
            self.birth_year.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpScreeningRequest {
    pub ip_address: IpAddr,
}

impl IpScreeningRequest {
    pub fn new(ip_address: &str) -> Result<Self, ValidationError> {
        let literal = ip_address.trim();
        if literal.is_empty() {
            return Err(ValidationError::EmptyField("ip_address"));
        }
        let ip_address = literal
            .parse::<IpAddr>()
            .map_err(|_| ValidationError::InvalidIpFormat(ip_address.to_string()))?;
        Ok(Self { ip_address })
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn normalize_country(value: &str) -> Result<String, ValidationError> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidNationality(value.to_string()))
    }
}

fn parse_birth_year(value: &str) -> Result<u16, ValidationError> {
    value
        .parse::<u16>()
        .ok()
        .filter(|year| (1000..=9999).contains(year))
        .ok_or_else(|| ValidationError::InvalidBirthYear(value.to_string()))
}
