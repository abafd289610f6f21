//! Strongly typed string identifiers.
//!
//! Nodes, edges, and vehicles are identified by opaque, globally unique
//! strings (they cross process boundaries in telemetry and graph dumps, so
//! integer handles would leak internal layout).  The wrappers store an
//! `Arc<str>` — cloning an ID is a refcount bump, which matters because IDs
//! appear in adjacency sets, route edge lists, and every telemetry sample.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Generate a typed ID wrapper around an interned string.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        // Allows `HashMap<$name, _>` lookups by `&str` without allocating.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                <String as serde::Deserialize>::deserialize(d).map(|s| Self(s.into()))
            }
        }
    };
}

string_id! {
    /// Identifier of a road-network node.
    pub struct NodeId;
}

string_id! {
    /// Identifier of an undirected road-network edge.
    ///
    /// Construct via [`EdgeId::canonical`] so that `(a, b)` and `(b, a)`
    /// produce the same ID.
    pub struct EdgeId;
}

string_id! {
    /// Identifier of a vehicle.
    pub struct VehicleId;
}

impl EdgeId {
    /// Canonical undirected edge ID: the lexicographic min and max of the
    /// endpoint IDs joined by `-`, so both orientations collide on one key.
    pub fn canonical(a: &NodeId, b: &NodeId) -> EdgeId {
        let (lo, hi) = if a.as_str() <= b.as_str() { (a, b) } else { (b, a) };
        EdgeId::new(format!("{lo}-{hi}"))
    }
}
