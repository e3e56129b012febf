//! Extension Point Keys
//!
//! An extension point is identified by an opaque token rather than by its name.
//! Every call to [`ExtensionPoint::new`] allocates a fresh identity, so two
//! unrelated plugin kinds that happen to share a label never collide.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity-compared token naming one extension point
#[derive(Clone, Copy)]
pub struct ExtensionPoint {
    id: u64,
    label: &'static str,
}

impl ExtensionPoint {
    /// Allocate a new, unique extension point
    ///
    /// The label is for humans only and plays no part in equality.
    pub fn new(label: &'static str) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            label,
        }
    }

    /// Human-readable label given at creation
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Process-unique identity of this key
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for ExtensionPoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ExtensionPoint {}

impl Hash for ExtensionPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtensionPoint({}#{})", self.label, self.id)
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Declare a static extension point
///
/// ```rust
/// plugscout::extension_point! {
///     /// Renderers known to the host
///     static RENDERERS = "renderers";
/// }
/// assert_eq!(RENDERERS.label(), "renderers");
/// ```
#[macro_export]
macro_rules! extension_point {
    ($(#[$meta:meta])* $vis:vis static $name:ident = $label:expr;) => {
        $(#[$meta])*
        $vis static $name: $crate::once_cell::sync::Lazy<$crate::plugin::key::ExtensionPoint> =
            $crate::once_cell::sync::Lazy::new(|| $crate::plugin::key::ExtensionPoint::new($label));
    };
}
