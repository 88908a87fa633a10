//! Property-based tests for properties escaping.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::properties::escape;
    use proptest::prelude::*;

    proptest! {
        /// Property: escaping plain ASCII without backslashes is a no-op
        #[test]
        fn escape_is_identity_on_plain_ascii(input in "[ -\\[\\]-~]*") {
            prop_assert_eq!(escape(&input), input);
        }

        /// Property: escaped output is always ASCII
        #[test]
        fn escape_output_is_ascii(input in ".*") {
            let result = escape(&input);
            prop_assert!(result.is_ascii(), "non-ASCII output for input '{}'", input);
        }

        /// Property: every backslash in the input is doubled
        #[test]
        fn escape_doubles_backslashes(input in "[a-z\\\\]*") {
            let result = escape(&input);
            prop_assert_eq!(
                result.matches('\\').count(),
                input.matches('\\').count() * 2
            );
        }

        /// Property: escape is deterministic (same input = same output)
        #[test]
        fn escape_is_deterministic(input in ".*") {
            prop_assert_eq!(escape(&input), escape(&input));
        }

        /// Property: each BMP non-ASCII character becomes exactly six bytes
        #[test]
        fn escape_bmp_char_width(ch in "[\u{80}-\u{D7FF}]") {
            let result = escape(&ch);
            prop_assert_eq!(result.len(), 6);
            prop_assert!(result.starts_with("\\u"));
        }
    }
}
