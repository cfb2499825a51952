//! Live aliases into the value tree.

use crate::location::Location;
use crate::value::Value;

/// A live reference to a location under a root node.
///
/// The location is re-resolved on every access, so the link keeps pointing at
/// "whatever currently lives at `items[2]`" even after siblings are replaced. It
/// stops resolving if an ancestor sequence shrinks below the addressed position.
#[derive(Debug, Clone)]
pub struct ValueLink {
    root: Value,
    location: Location,
}

impl ValueLink {
    pub fn new(root: Value, location: Location) -> Self {
        Self { root, location }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The node currently at the location, if it exists.
    pub fn get(&self) -> Option<Value> {
        self.location.resolve(&self.root)
    }

    /// The node at the location, creating the path to it if needed.
    pub fn get_or_create(&self) -> Value {
        self.location.resolve_or_create(&self.root)
    }

    /// Deep-copies `value` into the linked location.
    pub fn assign(&self, value: &Value) {
        let target = self.get_or_create();
        log::trace!("assigning through link to '{}'", self.location);
        value.deep_copy_into(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Segment;
    use crate::scalar::Scalar;

    #[test]
    fn test_link_follows_replacement() {
        let root = Value::new();
        root.add_child("xs", Value::with_scalar(1));
        root.add_child("xs", Value::with_scalar(2));
        let link = ValueLink::new(root.clone(), Location::new(vec![Segment::indexed("xs", 1)]));

        assert_eq!(link.get().map(|v| v.scalar()), Some(Scalar::Int(2)));
        root.get_children("xs").set(1, Value::with_scalar(20));
        assert_eq!(link.get().map(|v| v.scalar()), Some(Scalar::Int(20)));

        root.get_children("xs").remove(1);
        assert!(link.get().is_none());
    }

    #[test]
    fn test_assign_is_visible_through_other_handles() {
        let root = Value::new();
        let held = root.first_child("a").first_child("b");
        let link = ValueLink::new(root.clone(), Location::variable("a").with_field("b"));

        link.assign(&Value::with_scalar("written"));
        assert_eq!(held.scalar(), Scalar::Str("written".into()));
    }
}
