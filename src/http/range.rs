//! Range header parsing (RFC 7233, single `bytes=` ranges only).

/// One parsed byte range within an entity of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position (inclusive).
    pub start: usize,
    /// Last byte position (inclusive), None for "until end of entity".
    pub end: Option<usize>,
}

impl ByteRange {
    /// Resolve the inclusive end position for an entity of `len` bytes.
    #[inline]
    pub fn end_position(&self, len: usize) -> usize {
        self.end.unwrap_or_else(|| len.saturating_sub(1))
    }

    /// Number of bytes selected by this range.
    #[cfg(test)]
    pub fn len(&self, entity_len: usize) -> usize {
        self.end_position(entity_len).saturating_sub(self.start) + 1
    }
}

/// Outcome of parsing a Range header against an entity length.
#[derive(Debug)]
pub enum RangeOutcome {
    /// A single satisfiable range; respond 206.
    Satisfiable(ByteRange),
    /// Syntactically valid but outside the entity; respond 416.
    Unsatisfiable,
    /// Absent, malformed, multi-range, or a non-bytes unit; serve the full
    /// entity as if no Range header were present.
    Ignored,
}

/// Parse a Range header value.
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Multi-range requests fall back to a full response.
pub fn parse(range_header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(value) = range_header else {
        return RangeOutcome::Ignored;
    };

    let Some(ranges) = value.strip_prefix("bytes=") else {
        return RangeOutcome::Ignored;
    };

    if ranges.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start_str, end_str)) = ranges.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return parse_suffix(end_str, len);
    }
    parse_bounded(start_str, end_str, len)
}

/// `bytes=-N`: the final N bytes of the entity.
fn parse_suffix(suffix_str: &str, len: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    // A zero-length entity has no final bytes to select, mirroring the
    // start >= len rule for bounded ranges.
    if suffix == 0 || len == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // A suffix longer than the entity selects the whole entity.
    RangeOutcome::Satisfiable(ByteRange {
        start: len.saturating_sub(suffix),
        end: Some(len.saturating_sub(1)),
    })
}

/// `bytes=start-` or `bytes=start-end`.
fn parse_bounded(start_str: &str, end_str: &str, len: usize) -> RangeOutcome {
    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Ignored;
        };
        if end < start {
            return RangeOutcome::Unsatisfiable;
        }
        Some(end.min(len - 1))
    };

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header() {
        assert!(matches!(parse(None, 100), RangeOutcome::Ignored));
    }

    #[test]
    fn test_bounded_range() {
        match parse(Some("bytes=0-9"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
                assert_eq!(r.len(100), 10);
            }
            other => panic!("expected Satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_open_range() {
        match parse(Some("bytes=60-"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 60);
                assert_eq!(r.end, None);
                assert_eq!(r.end_position(100), 99);
                assert_eq!(r.len(100), 40);
            }
            other => panic!("expected Satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse(Some("bytes=-25"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 75);
                assert_eq!(r.end, Some(99));
            }
            other => panic!("expected Satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_suffix_selects_whole_entity() {
        match parse(Some("bytes=-500"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(99));
            }
            other => panic!("expected Satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        assert!(matches!(
            parse(Some("bytes=100-"), 100),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse(Some("bytes=-0"), 100),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse(Some("bytes=9-3"), 100),
            RangeOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn test_empty_entity_ranges_are_unsatisfiable() {
        assert!(matches!(
            parse(Some("bytes=-500"), 0),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse(Some("bytes=0-"), 0),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse(Some("bytes=0-0"), 0),
            RangeOutcome::Unsatisfiable
        ));
        // No Range header at all still serves the empty entity normally.
        assert!(matches!(parse(None, 0), RangeOutcome::Ignored));
    }

    #[test]
    fn test_ignored_forms() {
        assert!(matches!(parse(Some("bytes=x-y"), 100), RangeOutcome::Ignored));
        assert!(matches!(
            parse(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Ignored
        ));
        assert!(matches!(parse(Some("items=0-9"), 100), RangeOutcome::Ignored));
    }
}
