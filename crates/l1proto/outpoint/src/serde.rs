use serde::de;
use serde::{Deserialize, Serialize};

use crate::Origin;
use crate::origin::ORIGIN_BINARY_LEN;

impl Serialize for Origin {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.to_text())
        } else {
            s.serialize_bytes(&self.to_binary())
        }
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            struct StrVisitor;

            impl de::Visitor<'_> for StrVisitor {
                type Value = Origin;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "an origin string <hash>_<index>")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Origin, E> {
                    Origin::from_text(v).map_err(E::custom)
                }
            }

            d.deserialize_str(StrVisitor)
        } else {
            struct BytesVisitor;

            impl<'de> de::Visitor<'de> for BytesVisitor {
                type Value = Origin;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{ORIGIN_BINARY_LEN} bytes")
                }

                fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Origin, E> {
                    Origin::from_binary(v).map_err(|_| E::invalid_length(v.len(), &self))
                }
            }

            d.deserialize_bytes(BytesVisitor)
        }
    }
}
