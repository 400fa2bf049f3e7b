use std::fmt;

use crate::ebml::primitives::BINARY_PREVIEW_LEN;

/// Payload encoding of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Master,
    Unsigned,
    Signed,
    Float,
    /// Printable ASCII.
    String,
    Utf8,
    Date,
    Binary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Master => "master",
            Self::Unsigned => "uinteger",
            Self::Signed => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Utf8 => "utf-8",
            Self::Date => "date",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// Where an element may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top level of the stream.
    Root,
    /// Valid inside any container.
    Global,
    /// Valid inside any of the listed containers.
    Within(&'static [u32]),
}

/// One row of an ID table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpec {
    pub id: u32,
    pub name: &'static str,
    pub kind: ValueKind,
    pub placement: Placement,
}

impl ElementSpec {
    pub const fn new(id: u32, name: &'static str, kind: ValueKind, placement: Placement) -> Self {
        Self {
            id,
            name,
            kind,
            placement,
        }
    }
}

/// Static knowledge about a document type, shared read-only by every scan.
pub trait EbmlSchema {
    fn lookup(id: u32) -> Option<&'static ElementSpec>;

    /// Containers whose contents a shallow scan only reads once.
    fn is_shallow_skippable(_id: u32) -> bool {
        false
    }

    /// Leading bytes of a binary payload kept in the tree.
    fn preview_len(_id: u32) -> usize {
        BINARY_PREVIEW_LEN
    }

    fn is_master(id: u32) -> bool {
        Self::lookup(id).is_some_and(|spec| spec.kind == ValueKind::Master)
    }

    /// Payload kind; IDs missing from the table are opaque binary.
    fn kind_of(id: u32) -> ValueKind {
        Self::lookup(id).map_or(ValueKind::Binary, |spec| spec.kind)
    }

    fn is_valid_child(parent: u32, child: u32) -> bool {
        match Self::lookup(child).map(|spec| spec.placement) {
            Some(Placement::Global) => true,
            Some(Placement::Within(parents)) => parents.contains(&parent),
            Some(Placement::Root) | None => false,
        }
    }

    /// True when `id` closes the innermost open unknown-size element of
    /// `open_path` (the enclosing masters, outermost first).
    ///
    /// Only a known element that cannot live inside that element but can
    /// live at the root or inside one of its ancestors ends it. Unknown IDs
    /// and misplaced known IDs stay inside as children.
    fn ends_unknown_size(open_path: &[u32], id: u32) -> bool {
        let Some((&parent, ancestors)) = open_path.split_last() else {
            return false;
        };
        let Some(spec) = Self::lookup(id) else {
            return false;
        };
        if Self::is_valid_child(parent, id) {
            return false;
        }
        spec.placement == Placement::Root
            || ancestors
                .iter()
                .any(|&ancestor| Self::is_valid_child(ancestor, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: u32 = 0x1A;
    const CHILD: u32 = 0x81;
    const VOID: u32 = 0xEC;
    const TOP: u32 = 0x18;

    static TABLE: &[ElementSpec] = &[
        ElementSpec::new(TOP, "Top", ValueKind::Master, Placement::Root),
        ElementSpec::new(PARENT, "Parent", ValueKind::Master, Placement::Within(&[TOP])),
        ElementSpec::new(CHILD, "Child", ValueKind::Unsigned, Placement::Within(&[PARENT])),
        ElementSpec::new(VOID, "Void", ValueKind::Binary, Placement::Global),
    ];

    struct TestSchema;

    impl EbmlSchema for TestSchema {
        fn lookup(id: u32) -> Option<&'static ElementSpec> {
            TABLE.iter().find(|spec| spec.id == id)
        }
    }

    #[test]
    fn test_kind_lookup() {
        assert!(TestSchema::is_master(PARENT));
        assert!(!TestSchema::is_master(CHILD));
        assert_eq!(TestSchema::kind_of(CHILD), ValueKind::Unsigned);
        assert_eq!(TestSchema::kind_of(0x4242), ValueKind::Binary);
    }

    #[test]
    fn test_child_placement() {
        assert!(TestSchema::is_valid_child(PARENT, CHILD));
        assert!(TestSchema::is_valid_child(PARENT, VOID));
        assert!(TestSchema::is_valid_child(TOP, PARENT));
        assert!(!TestSchema::is_valid_child(TOP, CHILD));
        assert!(!TestSchema::is_valid_child(PARENT, TOP));
    }

    #[test]
    fn test_unknown_size_terminators() {
        let cases = vec![
            (vec![TOP, PARENT], TOP, true),
            (vec![TOP, PARENT], PARENT, true),
            (vec![TOP, PARENT], CHILD, false),
            (vec![TOP, PARENT], VOID, false),
            // Unknown IDs are kept as opaque children instead.
            (vec![TOP, PARENT], 0x4242, false),
            // Child belongs one level deeper, so it cannot close TOP.
            (vec![TOP], CHILD, false),
            (vec![TOP], TOP, true),
            (vec![], TOP, false),
        ];

        for (path, id, expected) in cases {
            assert_eq!(
                TestSchema::ends_unknown_size(&path, id),
                expected,
                "path {path:X?} id {id:#X}"
            );
        }
    }
}
