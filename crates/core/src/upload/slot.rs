//! Multipart field names.
//!
//! A field name is `ident ( "[" seg "]" | "." seg )*`. Bracket and dot
//! segments are interchangeable, so `content[2][icon]` and `content.2.icon`
//! name the same slot.

/// Where an uploaded file belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    /// `images` or `images[]`.
    MainImage,
    /// Icon for content block `n`: `content[n][icon]` or `content.n.icon`.
    BlockIcon(usize),
    /// Any other field; the file is discarded.
    Unrecognized,
}

impl UploadSlot {
    /// Classify a multipart field name.
    #[must_use]
    pub fn parse(field_name: &str) -> Self {
        let Some(path) = segments(field_name) else {
            return Self::Unrecognized;
        };

        match path.as_slice() {
            ["images"] | ["images", ""] => Self::MainImage,
            ["content", index, "icon"] => index
                .parse::<usize>()
                .map_or(Self::Unrecognized, Self::BlockIcon),
            _ => Self::Unrecognized,
        }
    }
}

/// Splits a field name into its segments, or `None` when malformed.
fn segments(name: &str) -> Option<Vec<&str>> {
    let head_end = name.find(['[', '.']).unwrap_or(name.len());
    let (head, mut rest) = name.split_at(head_end);
    if head.is_empty() {
        return None;
    }

    let mut path = vec![head];
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let seg = &after[..close];
            if seg.contains(['[', '.']) {
                return None;
            }
            path.push(seg);
            rest = &after[close + 1..];
        } else if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['[', '.']).unwrap_or(after.len());
            let seg = &after[..end];
            if seg.is_empty() {
                return None;
            }
            path.push(seg);
            rest = &after[end..];
        } else {
            return None;
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("images", UploadSlot::MainImage)]
    #[case("images[]", UploadSlot::MainImage)]
    #[case("content[0][icon]", UploadSlot::BlockIcon(0))]
    #[case("content.3.icon", UploadSlot::BlockIcon(3))]
    #[case("content[12].icon", UploadSlot::BlockIcon(12))]
    #[case("content.1[icon]", UploadSlot::BlockIcon(1))]
    #[case("content[x][icon]", UploadSlot::Unrecognized)]
    #[case("content[-1][icon]", UploadSlot::Unrecognized)]
    #[case("content[0][image]", UploadSlot::Unrecognized)]
    #[case("content[0", UploadSlot::Unrecognized)]
    #[case("image", UploadSlot::Unrecognized)]
    #[case("images[0]", UploadSlot::Unrecognized)]
    #[case("[images]", UploadSlot::Unrecognized)]
    #[case("", UploadSlot::Unrecognized)]
    #[case("content..0.icon", UploadSlot::Unrecognized)]
    fn test_parse(#[case] name: &str, #[case] expected: UploadSlot) {
        assert_eq!(UploadSlot::parse(name), expected);
    }

    proptest! {
        #[test]
        fn prop_bracket_and_dot_forms_agree(index in 0usize..10_000) {
            let bracket = UploadSlot::parse(&format!("content[{index}][icon]"));
            let dotted = UploadSlot::parse(&format!("content.{index}.icon"));
            prop_assert_eq!(bracket, UploadSlot::BlockIcon(index));
            prop_assert_eq!(dotted, UploadSlot::BlockIcon(index));
        }

        #[test]
        fn prop_parse_never_panics(name in "\\PC{0,40}") {
            let _ = UploadSlot::parse(&name);
        }

        #[test]
        fn prop_other_idents_unrecognized(ident in "[a-z]{1,12}") {
            prop_assume!(ident != "images");
            prop_assert_eq!(UploadSlot::parse(&ident), UploadSlot::Unrecognized);
        }
    }
}
