//! Wire types for the Signed JSON Token (SJT v1) encoding of a Delegation
//! Capability Token (§6). Every block here is exactly what gets
//! canonicalized and hashed/signed — field order in the struct is
//! irrelevant since `serde_jcs` sorts keys, but field *names* are load
//! bearing: they are part of the signed bytes.

use std::fmt;

use delegation_core::{Capability, MicroCents, PrincipalId, Timestamp};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const SJT_FORMAT: &str = "delegateos-sjt-v1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityBlock {
    pub issuer: PrincipalId,
    pub delegatee: PrincipalId,
    pub capabilities: Vec<Capability>,
    pub contract_id: String,
    pub delegation_id: String,
    pub parent_delegation_id: String,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub max_budget_microcents: MicroCents,
    pub expires_at: Timestamp,
    pub issued_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttenuationBlock {
    pub attenuator: PrincipalId,
    pub delegatee: PrincipalId,
    pub delegation_id: String,
    pub contract_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub allowed_capabilities: Option<Vec<Capability>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_budget_microcents: Option<MicroCents>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_chain_depth: Option<u32>,
}

/// Which signed prefix a signature covers: the bare authority block, or the
/// authority plus attenuations `0..=n`. Serializes as the JSON string
/// `"authority"` or a plain integer, per §6's wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Covers {
    Authority,
    Attenuation(usize),
}

impl Serialize for Covers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Covers::Authority => serializer.serialize_str("authority"),
            Covers::Attenuation(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Covers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoversVisitor;
        impl<'de> Visitor<'de> for CoversVisitor {
            type Value = Covers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("the string \"authority\" or a non-negative integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Covers, E> {
                if v == "authority" {
                    Ok(Covers::Authority)
                } else {
                    Err(de::Error::invalid_value(de::Unexpected::Str(v), &self))
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Covers, E> {
                Ok(Covers::Attenuation(v as usize))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Covers, E> {
                if v < 0 {
                    return Err(de::Error::invalid_value(de::Unexpected::Signed(v), &self));
                }
                Ok(Covers::Attenuation(v as usize))
            }
        }
        deserializer.deserialize_any(CoversVisitor)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub signer: PrincipalId,
    pub signature: String,
    pub covers: Covers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DctToken {
    pub format: String,
    pub authority: AuthorityBlock,
    pub attenuations: Vec<AttenuationBlock>,
    pub signatures: Vec<SignatureEntry>,
}

/// The subobject signature 0 covers: `{authority}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedAuthority<'a> {
    pub authority: &'a AuthorityBlock,
}

/// The subobject signature `i+1` covers: `{authority, attenuations[0..=i]}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedPrefix<'a> {
    pub authority: &'a AuthorityBlock,
    pub attenuations: &'a [AttenuationBlock],
}
