//! Cache fingerprints for compressed asset bundles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex characters in a rendered fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// A 64-bit fingerprint naming a compressed bundle in the cache directory.
///
/// The fingerprint is derived from the comma-joined list of per-asset output
/// names (for example `"a.js,b.js"`), in the order the assets were added. It
/// depends only on asset identity and order, never on file contents: content
/// changes are detected through modification times instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 8]);

impl Fingerprint {
    /// Computes a fingerprint from raw bytes using the leading half of XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data).to_le_bytes();
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash[..8]);
        Self(out)
    }

    /// Computes the fingerprint of an ordered list of output names.
    pub fn from_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = outputs
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::from_bytes(joined.as_bytes())
    }

    /// Parses a fingerprint from its 16-character lowercase hex form.
    ///
    /// Returns `None` for anything else, which lets cache scans skip files
    /// they did not produce.
    pub fn parse(hex: &str) -> Option<Self> {
        if hex.len() != FINGERPRINT_HEX_LEN
            || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return None;
        }
        let mut out = [0u8; 8];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(out))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = Fingerprint::from_outputs(["a.js", "b.js"]);
        let b = Fingerprint::from_outputs(["a.js", "b.js"]);
        assert_eq!(a, b);
    }

    #[test]
    fn joins_with_commas() {
        let from_list = Fingerprint::from_outputs(["a.js", "b.js"]);
        let from_joined = Fingerprint::from_bytes(b"a.js,b.js");
        assert_eq!(from_list, from_joined);
    }

    #[test]
    fn order_matters() {
        let ab = Fingerprint::from_outputs(["a.js", "b.js"]);
        let ba = Fingerprint::from_outputs(["b.js", "a.js"]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn extension_matters() {
        let js = Fingerprint::from_outputs(["site.js"]);
        let css = Fingerprint::from_outputs(["site.css"]);
        assert_ne!(js, css);
    }

    #[test]
    fn display_is_sixteen_hex_chars() {
        let s = Fingerprint::from_outputs(["a.js"]).to_string();
        assert_eq!(s.len(), FINGERPRINT_HEX_LEN);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn parse_roundtrip() {
        let fp = Fingerprint::from_outputs(["main.css", "print.css"]);
        assert_eq!(Fingerprint::parse(&fp.to_string()), Some(fp));
    }

    #[test]
    fn parse_rejects_foreign_names() {
        assert!(Fingerprint::parse("manifest").is_none());
        assert!(Fingerprint::parse("0123456789ABCDEF").is_none());
        assert!(Fingerprint::parse("0123456789abcdef0").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let fp = Fingerprint::from_outputs(["a.js"]);
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
