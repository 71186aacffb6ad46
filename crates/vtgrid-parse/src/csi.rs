//! CSI payload parser (C2).
//!
//! Turns a collected CSI payload (as produced by
//! [`crate::classifier::ByteClassifier`], final byte included) into a
//! structured [`CsiCommand`]: an optional private-mode prefix, a parameter
//! list, intermediate bytes, and the final byte.

use smallvec::SmallVec;

/// Inline capacity for a CSI parameter list. Real-world sequences rarely
/// carry more than a handful of parameters (SGR is the worst offender).
const PARAMS_INLINE: usize = 8;

pub type Params = SmallVec<[Option<u32>; PARAMS_INLINE]>;
pub type Intermediates = SmallVec<[u8; 4]>;

/// A parsed CSI sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiCommand {
    /// Private-mode prefix byte (`?`, `>`, or `=`), if present.
    pub prefix: Option<u8>,
    /// Parameters in order; `None` denotes an elided ("default") parameter.
    pub params: Params,
    /// Intermediate bytes (`0x20..=0x2F`) between the last parameter and the
    /// final byte.
    pub intermediates: Intermediates,
    /// The final byte identifying the command.
    pub final_byte: u8,
}

impl CsiCommand {
    /// The parameter at `index`, or `default` if elided or absent.
    #[must_use]
    pub fn param(&self, index: usize, default: u32) -> u32 {
        self.params.get(index).and_then(|p| *p).unwrap_or(default)
    }

    /// Convenience for the common "first param, default 1" case (cursor
    /// motion counts, scroll counts, erase-chars counts).
    #[must_use]
    pub fn param1(&self) -> u32 {
        self.param(0, 1)
    }
}

/// Parse a CSI payload (classifier output, final byte included) into a
/// [`CsiCommand`].
///
/// # Panics
///
/// Panics if `payload` is empty. The classifier guarantees a non-empty
/// payload terminated by a final byte, so this should never happen for
/// input that actually came from [`crate::classifier::ByteClassifier`].
#[must_use]
pub fn parse(payload: &[u8]) -> CsiCommand {
    assert!(!payload.is_empty(), "CSI payload must include a final byte");

    let final_byte = payload[payload.len() - 1];
    let mut body = &payload[..payload.len() - 1];

    let prefix = match body.first() {
        Some(b @ (b'?' | b'>' | b'=')) => {
            body = &body[1..];
            Some(*b)
        }
        _ => None,
    };

    let split = body
        .iter()
        .rposition(|b| !matches!(b, 0x20..=0x2F))
        .map_or(0, |i| i + 1);
    let (param_region, intermediate_region) = body.split_at(split);

    let mut intermediates = Intermediates::new();
    intermediates.extend_from_slice(intermediate_region);

    let mut params = Params::new();
    if param_region.is_empty() {
        // No parameter region at all: leave params empty (downstream
        // actions apply their own default).
    } else {
        for token in param_region.split(|&b| b == b';') {
            params.push(parse_param(token));
        }
    }

    CsiCommand {
        prefix,
        params,
        intermediates,
        final_byte,
    }
}

fn parse_param(token: &[u8]) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    let mut saw_digit = false;
    for &b in token {
        if b.is_ascii_digit() {
            saw_digit = true;
            value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
        }
        // Non-digit bytes inside a parameter (e.g. a `:` sub-parameter
        // separator) are ignored rather than rejected outright; this keeps
        // `38:2::r:g:b`-style colon-separated SGR color params from
        // poisoning the whole sequence.
    }
    saw_digit.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cup_with_two_params() {
        let cmd = parse(b"10;20H");
        assert_eq!(cmd.prefix, None);
        assert_eq!(cmd.final_byte, b'H');
        assert_eq!(cmd.params.as_slice(), [Some(10), Some(20)]);
    }

    #[test]
    fn elided_param_is_none() {
        let cmd = parse(b";5H");
        assert_eq!(cmd.params.as_slice(), [None, Some(5)]);
        assert_eq!(cmd.param(0, 1), 1);
        assert_eq!(cmd.param(1, 1), 5);
    }

    #[test]
    fn private_prefix_is_stripped() {
        let cmd = parse(b"?1049h");
        assert_eq!(cmd.prefix, Some(b'?'));
        assert_eq!(cmd.final_byte, b'h');
        assert_eq!(cmd.params.as_slice(), [Some(1049)]);
    }

    #[test]
    fn no_params_at_all() {
        let cmd = parse(b"m");
        assert_eq!(cmd.prefix, None);
        assert!(cmd.params.is_empty());
        assert_eq!(cmd.param1(), 1);
    }

    #[test]
    fn intermediates_collected_before_final() {
        let cmd = parse(b"1 q");
        assert_eq!(cmd.params.as_slice(), [Some(1)]);
        assert_eq!(cmd.intermediates.as_slice(), b" ");
        assert_eq!(cmd.final_byte, b'q');
    }

    #[test]
    fn sgr_extended_color_params() {
        let cmd = parse(b"38;5;200m");
        assert_eq!(cmd.params.as_slice(), [Some(38), Some(5), Some(200)]);
    }

    #[test]
    fn secondary_da_prefix() {
        let cmd = parse(b">0c");
        assert_eq!(cmd.prefix, Some(b'>'));
        assert_eq!(cmd.params.as_slice(), [Some(0)]);
    }

    #[test]
    fn param1_default_when_elided() {
        let cmd = parse(b"A");
        assert_eq!(cmd.param1(), 1);
        let cmd = parse(b"5A");
        assert_eq!(cmd.param1(), 5);
    }
}
