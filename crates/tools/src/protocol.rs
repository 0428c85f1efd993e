//! Blockchain protocols accepted by the address risk score endpoint.

use anchain_aml_providers::ValidationError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Bitcoin,
    Ethereum,
    Solana,
    Stellar,
    Tron,
    Elrond,
    Ripple,
    BitcoinCash,
    Litecoin,
    Algorand,
    BitcoinSv,
    Dash,
    Verge,
    Zcash,
}

impl Protocol {
    pub const ALL: [Protocol; 14] = [
        Protocol::Bitcoin,
        Protocol::Ethereum,
        Protocol::Solana,
        Protocol::Stellar,
        Protocol::Tron,
        Protocol::Elrond,
        Protocol::Ripple,
        Protocol::BitcoinCash,
        Protocol::Litecoin,
        Protocol::Algorand,
        Protocol::BitcoinSv,
        Protocol::Dash,
        Protocol::Verge,
        Protocol::Zcash,
    ];

    /// Provider code sent on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bitcoin => "btc",
            Self::Ethereum => "eth",
            Self::Solana => "sol",
            Self::Stellar => "xlm",
            Self::Tron => "trx",
            Self::Elrond => "egld",
            Self::Ripple => "xrp",
            Self::BitcoinCash => "bch",
            Self::Litecoin => "ltc",
            Self::Algorand => "algo",
            Self::BitcoinSv => "bsv",
            Self::Dash => "dash",
            Self::Verge => "xvg",
            Self::Zcash => "zec",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Solana => "Solana",
            Self::Stellar => "Stellar",
            Self::Tron => "Tron",
            Self::Elrond => "Elrond",
            Self::Ripple => "Ripple",
            Self::BitcoinCash => "Bitcoin Cash",
            Self::Litecoin => "Litecoin",
            Self::Algorand => "Algorand",
            Self::BitcoinSv => "Bitcoin SV",
            Self::Dash => "Dash",
            Self::Verge => "Verge Currency",
            Self::Zcash => "Zcash",
        }
    }

    /// Case-insensitive lookup by code or full name.
    pub fn resolve(name_or_code: &str) -> Result<Protocol, ValidationError> {
        let needle = name_or_code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| {
                p.code().eq_ignore_ascii_case(needle) || p.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ValidationError::UnsupportedProtocol(name_or_code.to_string()))
    }

    /// Two-column table used in tool descriptions.
    pub fn table() -> String {
        let mut out = String::from("Protocol    Name\n");
        for p in Self::ALL {
            out.push_str(&format!("{:<11} {}\n", p.code(), p.display_name()));
        }
        out
    }
}

impl FromStr for Protocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_codes_resolve_to_themselves() {
        for p in Protocol::ALL {
            assert_eq!(Protocol::resolve(p.code()).unwrap(), p);
        }
    }

    #[test]
    fn test_full_names_resolve() {
        assert_eq!(Protocol::resolve("Bitcoin").unwrap(), Protocol::Bitcoin);
        assert_eq!(Protocol::resolve("bitcoin cash").unwrap().code(), "bch");
        assert_eq!(Protocol::resolve("BITCOIN SV").unwrap().code(), "bsv");
        assert_eq!(Protocol::resolve("Verge Currency").unwrap().code(), "xvg");
        assert_eq!(Protocol::resolve("elrond").unwrap().code(), "egld");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(Protocol::resolve("  eth ").unwrap(), Protocol::Ethereum);
    }

    #[test]
    fn test_unknown_protocol_rejected() {
        for bad in ["notachain", "", "doge", "bitcoincash", "et h", "usdt"] {
            assert_eq!(
                Protocol::resolve(bad),
                Err(ValidationError::UnsupportedProtocol(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_codes_are_unique_and_short() {
        let mut codes: Vec<_> = Protocol::ALL.iter().map(|p| p.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 14);
        assert!(codes.iter().all(|c| (3..=4).contains(&c.len())));
    }

    #[test]
    fn test_table_lists_every_protocol() {
        let table = Protocol::table();
        for p in Protocol::ALL {
            assert!(table.contains(p.code()));
            assert!(table.contains(p.display_name()));
        }
    }

    fn apply_casing(s: &str, flags: &[bool]) -> String {
        s.chars()
            .zip(flags.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect()
    }

    proptest! {
        #[test]
        fn test_resolution_ignores_case(
            idx in 0usize..14,
            use_name in any::<bool>(),
            flags in proptest::collection::vec(any::<bool>(), 1..16),
        ) {
            let p = Protocol::ALL[idx];
            let base = if use_name { p.display_name() } else { p.code() };
            let input = apply_casing(base, &flags);
            prop_assert_eq!(Protocol::resolve(&input).unwrap(), p);
        }

        #[test]
        fn test_random_strings_never_panic(input in "\\PC{0,12}") {
            match Protocol::resolve(&input) {
                Ok(p) => {
                    let trimmed = input.trim();
                    prop_assert!(
                        p.code().eq_ignore_ascii_case(trimmed)
                            || p.display_name().eq_ignore_ascii_case(trimmed)
                    );
                }
                Err(e) => prop_assert_eq!(e, ValidationError::UnsupportedProtocol(input.clone())),
            }
        }
    }
}
