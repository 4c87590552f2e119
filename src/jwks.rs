use serde::{Deserialize, Serialize};

/// A single published key entry from the issuer's discovery document.
///
/// Only the fields needed for RSA signature verification are modeled;
/// anything else in the document is ignored. The RSA components and `use`
/// are optional so one foreign entry (an EC key, an encryption key) cannot
/// fail deserialization of the whole set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl Jwk {
    /// Whether this entry is an RSA signature key with usable public
    /// material. Entries that are not never make it into a key snapshot, so
    /// a `kid` match against one still fails closed as key-not-found.
    pub fn is_rsa_signing_key(&self) -> bool {
        self.kty == "RSA"
            && self.use_field.as_deref().map_or(true, |usage| usage == "sig")
            && self.n.is_some()
            && self.e.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrip() {
        let jwks = Jwks {
            keys: vec![Jwk {
                kty: "RSA".to_string(),
                kid: "k1".to_string(),
                use_field: Some("sig".to_string()),
                alg: Some("RS256".to_string()),
                n: Some("modulus".to_string()),
                e: Some("AQAB".to_string()),
            }],
        };
        let serialized = serde_json::to_string(&jwks).expect("serialize");
        let decoded: Jwks = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(decoded, jwks);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let document = json!({
            "keys": [{
                "kty": "RSA",
                "kid": "abc123",
                "use": "sig",
                "n": "AQAB",
                "e": "AQAB",
                "x5c": ["cert"],
                "x5t": "thumbprint"
            }]
        });
        let jwks: Jwks = serde_json::from_value(document).expect("deserialize");
        assert_eq!(jwks.keys.len(), 1);
        assert!(jwks.keys[0].is_rsa_signing_key());
    }

    #[test]
    fn foreign_entries_do_not_poison_the_set() {
        let document = json!({
            "keys": [
                { "kty": "EC", "kid": "ec-1", "use": "sig", "crv": "P-256", "x": "x", "y": "y" },
                { "kty": "RSA", "kid": "rsa-1", "use": "enc", "n": "AQAB", "e": "AQAB" },
                { "kty": "RSA", "kid": "rsa-2", "use": "sig", "n": "AQAB", "e": "AQAB" }
            ]
        });
        let jwks: Jwks = serde_json::from_value(document).expect("deserialize");
        let usable: Vec<&str> = jwks
            .keys
            .iter()
            .filter(|key| key.is_rsa_signing_key())
            .map(|key| key.kid.as_str())
            .collect();
        assert_eq!(usable, vec!["rsa-2"]);
    }

    #[test]
    fn rsa_key_without_components_is_unusable() {
        let key = Jwk {
            kty: "RSA".to_string(),
            kid: "k1".to_string(),
            use_field: Some("sig".to_string()),
            alg: None,
            n: None,
            e: Some("AQAB".to_string()),
        };
        assert!(!key.is_rsa_signing_key());
    }
}
