//! Bit sets used for term and language flags.
//!
//! Flags are plain `u32` newtypes rather than a dependency-backed bitflags
//! type; [`define_flags!`] stamps out the set operations and a `Debug` impl
//! that lists the names of the bits that are set.

/// Defines a `Copy` bit-set newtype with named constants.
macro_rules! define_flags {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$flag_meta:meta])*
                const $flag:ident = $value:expr;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(u32);

        impl $name {
            /// No flags set
            pub const NONE: Self = Self(0);
            $(
                $(#[$flag_meta])*
                pub const $flag: Self = Self($value);
            )+

            const NAMED: &'static [(&'static str, Self)] = &[$((stringify!($flag), Self::$flag)),+];

            /// Raw bit representation
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// True if every bit of `other` is set in `self`
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// True if any bit of `other` is set in `self`
            #[must_use]
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Set or clear `other` depending on `value`
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_empty() {
                    return write!(f, "{}(NONE)", stringify!($name));
                }
                let names: Vec<&str> = Self::NAMED
                    .iter()
                    // composite constants (e.g. IS_BRACE) are skipped unless fully set
                    .filter(|(_, flag)| flag.0.count_ones() == 1 && self.contains(*flag))
                    .map(|(name, _)| *name)
                    .collect();
                write!(f, "{}({})", stringify!($name), names.join(" | "))
            }
        }
    };
}

pub(crate) use define_flags;

define_flags! {
    /// Properties of a grammar term.
    ///
    /// Flags are set by the registration calls of
    /// [`GrammarBuilder`](crate::grammar::GrammarBuilder) and by list
    /// synthesis; after the grammar is built they are read-only.
    pub struct TermFlags {
        const IS_OPERATOR = 1 << 0;
        const IS_OPEN_BRACE = 1 << 1;
        const IS_CLOSE_BRACE = 1 << 2;
        const IS_BRACE = (1 << 1) | (1 << 2);
        const IS_LITERAL = 1 << 3;
        const IS_CONSTANT = 1 << 4;
        const IS_PUNCTUATION = 1 << 5;
        const IS_DELIMITER = 1 << 6;
        const IS_RESERVED_WORD = 1 << 7;
        const IS_MEMBER_SELECT = 1 << 8;
        /// Not produced by the scanner (indent, dedent, ...)
        const IS_NON_SCANNER = 1 << 9;
        /// Ignored by the parser (comments, ...)
        const IS_NON_GRAMMAR = 1 << 10;
        /// Node is replaced by its only child in the tree
        const IS_TRANSIENT = 1 << 11;
        const IS_NOT_REPORTED = 1 << 12;
        const IS_NULLABLE = 1 << 13;
        const IS_VISIBLE = 1 << 14;
        const IS_KEYWORD = 1 << 15;
        const IS_MULTILINE = 1 << 16;
        /// Directly enumerates list members
        const IS_LIST = 1 << 17;
        /// Wraps a list that enumerates the members
        const IS_LIST_CONTAINER = 1 << 18;
        const NO_AST_NODE = 1 << 19;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut flags = TermFlags::NONE;
        flags.insert(TermFlags::IS_OPERATOR | TermFlags::IS_LIST);
        assert!(flags.contains(TermFlags::IS_OPERATOR));
        assert!(flags.contains(TermFlags::IS_LIST));

        flags.remove(TermFlags::IS_OPERATOR);
        assert!(!flags.contains(TermFlags::IS_OPERATOR));
        assert!(flags.contains(TermFlags::IS_LIST));
    }

    #[test]
    fn test_brace_is_composite() {
        let open = TermFlags::IS_OPEN_BRACE;
        assert!(open.intersects(TermFlags::IS_BRACE));
        assert!(!open.contains(TermFlags::IS_BRACE));
    }

    #[test]
    fn test_debug_lists_single_bits() {
        let flags = TermFlags::IS_PUNCTUATION | TermFlags::NO_AST_NODE;
        assert_eq!(
            format!("{flags:?}"),
            "TermFlags(IS_PUNCTUATION | NO_AST_NODE)"
        );
        assert_eq!(format!("{:?}", TermFlags::NONE), "TermFlags(NONE)");
    }

    #[test]
    fn test_set() {
        let mut flags = TermFlags::default();
        flags.set(TermFlags::IS_NULLABLE, true);
        assert!(flags.contains(TermFlags::IS_NULLABLE));
        flags.set(TermFlags::IS_NULLABLE, false);
        assert!(flags.is_empty());
    }
}
