/// The universal root kind. Every kind declared with [`ErrorKind::new`]
/// descends from it, so a handler registered here catches any failure.
pub static FAILURE: ErrorKind = ErrorKind::root("Failure");

/// Identifier for a category of failure.
///
/// Kinds are declared as `static` items and referenced by `&'static` pointer
/// everywhere, so declaring one costs nothing at runtime. Each kind has at
/// most one direct parent, which places it in a tree rooted at [`FAILURE`].
/// Two sibling kinds share no ancestry relation even when conceptually
/// similar.
///
/// Kind identity is the `name`: names must be unique within an application's
/// tree. The registry and all lookups compare by name only.
#[derive(Debug)]
pub struct ErrorKind {
    name: &'static str,
    parent: Option<&'static ErrorKind>,
}

impl ErrorKind {
    /// Declare a kind with the given parent.
    #[must_use]
    pub const fn new(name: &'static str, parent: &'static ErrorKind) -> Self {
        ErrorKind {
            name,
            parent: Some(parent),
        }
    }

    /// Declare a kind with no parent. Only [`FAILURE`] should normally be a
    /// root; application kinds that want "catch everything" semantics should
    /// descend from it instead.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        ErrorKind { name, parent: None }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&'static ErrorKind> {
        self.parent
    }

    /// Walk from this kind to the root: the kind itself first, then its
    /// parent, grandparent, and so on. The chain is finite because parent
    /// links are `&'static` references fixed at declaration.
    #[must_use]
    pub fn ancestry(&'static self) -> Ancestry {
        Ancestry { next: Some(self) }
    }

    /// Whether `other` appears anywhere in this kind's ancestry chain,
    /// including the kind itself.
    #[must_use]
    pub fn is_a(&'static self, other: &ErrorKind) -> bool {
        self.ancestry().any(|k| k == other)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ErrorKind {}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Iterator over a kind's ancestry chain, most specific first.
#[derive(Debug, Clone)]
pub struct Ancestry {
    next: Option<&'static ErrorKind>,
}

impl Iterator for Ancestry {
    type Item = &'static ErrorKind;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}
