use schemars::gen::SchemaGenerator;
use schemars::schema::{
    InstanceType, Metadata, NumberValidation, Schema, SchemaObject, StringValidation,
    SubschemaValidation,
};
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JurisdictionError {
    #[error("state code must be one or two digits: '{0}'")]
    InvalidStateCode(String),
    #[error("unknown state code: {0:02}")]
    UnknownStateCode(u64),
    #[error("GSTIN must be 15 characters, got {0}")]
    InvalidGstinLength(usize),
    #[error("malformed GSTIN: {0}")]
    InvalidGstinFormat(String),
    #[error("GSTIN check character mismatch for {gstin}: expected '{expected}'")]
    InvalidGstinChecksum { gstin: String, expected: char },
}

/// Indian GST state codes and their state or union territory.
const STATES: &[(u8, &str)] = &[
    (1, "Jammu and Kashmir"),
    (2, "Himachal Pradesh"),
    (3, "Punjab"),
    (4, "Chandigarh"),
    (5, "Uttarakhand"),
    (6, "Haryana"),
    (7, "Delhi"),
    (8, "Rajasthan"),
    (9, "Uttar Pradesh"),
    (10, "Bihar"),
    (11, "Sikkim"),
    (12, "Arunachal Pradesh"),
    (13, "Nagaland"),
    (14, "Manipur"),
    (15, "Mizoram"),
    (16, "Tripura"),
    (17, "Meghalaya"),
    (18, "Assam"),
    (19, "West Bengal"),
    (20, "Jharkhand"),
    (21, "Odisha"),
    (22, "Chhattisgarh"),
    (23, "Madhya Pradesh"),
    (24, "Gujarat"),
    (25, "Daman and Diu"),
    (26, "Dadra and Nagar Haveli and Daman and Diu"),
    (27, "Maharashtra"),
    (28, "Andhra Pradesh (before division)"),
    (29, "Karnataka"),
    (30, "Goa"),
    (31, "Lakshadweep"),
    (32, "Kerala"),
    (33, "Tamil Nadu"),
    (34, "Puducherry"),
    (35, "Andaman and Nicobar Islands"),
    (36, "Telangana"),
    (37, "Andhra Pradesh"),
    (38, "Ladakh"),
    (97, "Other Territory"),
    (99, "Centre Jurisdiction"),
];

/// Tax jurisdiction of a party, identified by its GST state code.
///
/// Parsed once at the input boundary: `"07"`, `" 7 "` and the JSON number `7`
/// all yield the same code, so equality never depends on how the caller
/// happened to spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JurisdictionCode(u8);

impl JurisdictionCode {
    pub fn new(code: u8) -> Result<Self, JurisdictionError> {
        if STATES.iter().any(|(c, _)| *c == code) {
            Ok(JurisdictionCode(code))
        } else {
            Err(JurisdictionError::UnknownStateCode(code.into()))
        }
    }

    /// Name of the state or union territory
    pub fn name(&self) -> &'static str {
        STATES
            .iter()
            .find(|(c, _)| *c == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown")
    }

    /// All known jurisdictions in code order
    pub fn all() -> impl Iterator<Item = JurisdictionCode> {
        STATES.iter().map(|(c, _)| JurisdictionCode(*c))
    }

    fn from_u64(code: u64) -> Result<Self, JurisdictionError> {
        let code = u8::try_from(code).map_err(|_| JurisdictionError::UnknownStateCode(code))?;
        Self::new(code)
    }
}

impl FromStr for JurisdictionCode {
    type Err = JurisdictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(JurisdictionError::InvalidStateCode(s.to_string()));
        }
        let code: u8 = trimmed
            .parse()
            .map_err(|_| JurisdictionError::InvalidStateCode(s.to_string()))?;
        Self::new(code)
    }
}

impl fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for JurisdictionCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JurisdictionCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor;

        impl Visitor<'_> for CodeVisitor {
            type Value = JurisdictionCode;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a GST state code as a string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                JurisdictionCode::from_u64(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let v = u64::try_from(v)
                    .map_err(|_| E::custom(JurisdictionError::InvalidStateCode(v.to_string())))?;
                self.visit_u64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CodeVisitor)
    }
}

// Mirrors the deserializer: either spelling of the code is accepted.
impl JsonSchema for JurisdictionCode {
    fn schema_name() -> String {
        "JurisdictionCode".to_string()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        let text = SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            string: Some(Box::new(StringValidation {
                pattern: Some(r"^\s*[0-9]{1,2}\s*$".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        let number = SchemaObject {
            instance_type: Some(InstanceType::Integer.into()),
            number: Some(Box::new(NumberValidation {
                minimum: Some(1.0),
                maximum: Some(99.0),
                ..Default::default()
            })),
            ..Default::default()
        };
        SchemaObject {
            metadata: Some(Box::new(Metadata {
                description: Some(
                    "GST state code as a string (\"07\") or an integer (7)".to_string(),
                ),
                ..Default::default()
            })),
            subschemas: Some(Box::new(SubschemaValidation {
                any_of: Some(vec![text.into(), number.into()]),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

const GSTIN_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A validated GST identification number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gstin(String);

impl Gstin {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// State code carried in the first two characters
    pub fn jurisdiction(&self) -> JurisdictionCode {
        // validated on construction
        JurisdictionCode(self.0[..2].parse().unwrap_or_default())
    }

    /// PAN of the registered entity (characters 3 to 12)
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }
}

/// Mod-36 check character over the first 14 characters of a GSTIN.
fn gstin_check_char(body: &[u8]) -> Option<char> {
    let mut sum = 0usize;
    for (i, b) in body.iter().enumerate() {
        let value = GSTIN_ALPHABET.iter().position(|a| a == b)?;
        let product = value * if i % 2 == 0 { 1 } else { 2 };
        sum += product / 36 + product % 36;
    }
    Some(GSTIN_ALPHABET[(36 - sum % 36) % 36] as char)
}

impl FromStr for Gstin {
    type Err = JurisdictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gstin = s.trim().to_ascii_uppercase();
        let bytes = gstin.as_bytes();
        if bytes.len() != 15 {
            return Err(JurisdictionError::InvalidGstinLength(gstin.chars().count()));
        }

        let well_formed = bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[2..7].iter().all(u8::is_ascii_uppercase)
            && bytes[7..11].iter().all(u8::is_ascii_digit)
            && bytes[11].is_ascii_uppercase()
            && bytes[12].is_ascii_alphanumeric()
            && bytes[13] == b'Z'
            && bytes[14].is_ascii_alphanumeric();
        if !well_formed {
            return Err(JurisdictionError::InvalidGstinFormat(gstin));
        }

        gstin[..2].parse::<JurisdictionCode>()?;

        let expected = gstin_check_char(&bytes[..14])
            .ok_or_else(|| JurisdictionError::InvalidGstinFormat(gstin.clone()))?;
        if bytes[14] as char != expected {
            return Err(JurisdictionError::InvalidGstinChecksum { gstin, expected });
        }

        Ok(Gstin(gstin))
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Gstin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Gstin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
