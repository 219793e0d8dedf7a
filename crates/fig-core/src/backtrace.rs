//! Dependency path tracking for error reporting

use crate::descriptor::Descriptor;
use std::fmt;
use std::sync::Arc;

/// The chain of descriptors that led the planner to a configuration.
///
/// A backtrace is an immutable linked list, newest entry first. Pushing
/// returns a new backtrace that shares its tail with the receiver, so every
/// branch of a traversal can extend the same parent without copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtrace {
    head: Option<Arc<Link>>,
}

#[derive(Debug, PartialEq, Eq)]
struct Link {
    descriptor: Descriptor,
    parent: Backtrace,
    len: usize,
}

impl Backtrace {
    /// The empty backtrace, before the root descriptor is visited
    pub fn root() -> Self {
        Self::default()
    }

    /// Prepend a descriptor, leaving `self` untouched
    pub fn push(&self, descriptor: Descriptor) -> Self {
        let len = self.len() + 1;
        Self {
            head: Some(Arc::new(Link {
                descriptor,
                parent: self.clone(),
                len,
            })),
        }
    }

    /// The most recently pushed descriptor
    pub fn head(&self) -> Option<&Descriptor> {
        self.head.as_ref().map(|link| &link.descriptor)
    }

    /// The backtrace this one was pushed onto
    pub fn parent(&self) -> Option<&Backtrace> {
        self.head.as_ref().map(|link| &link.parent)
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |link| link.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate from the most recent descriptor back to the root
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self }
    }

    /// Snapshot of the trace, most recent descriptor first
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.iter().cloned().collect()
    }
}

pub struct Iter<'a> {
    next: &'a Backtrace,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Descriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next.head.as_deref()?;
        self.next = &link.parent;
        Some(&link.descriptor)
    }
}

impl<'a> IntoIterator for &'a Backtrace {
    type Item = &'a Descriptor;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One indented line per descriptor, starting from the root of the trace.
impl fmt::Display for Backtrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut descriptors: Vec<&Descriptor> = self.iter().collect();
        descriptors.reverse();
        for descriptor in descriptors {
            write!(f, "\n    {}", descriptor)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn desc(package: &str) -> Descriptor {
        Descriptor::new(package, "1.0", "")
    }

    #[test]
    fn test_root_is_empty() {
        let root = Backtrace::root();
        assert!(root.is_empty());
        assert_eq!(root.len(), 0);
        assert_eq!(root.head(), None);
        assert!(root.descriptors().is_empty());
    }

    #[test]
    fn test_push_orders_most_recent_first() {
        let trace = Backtrace::root().push(desc("d1")).push(desc("d2"));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.head(), Some(&desc("d2")));
        assert_eq!(trace.descriptors(), vec![desc("d2"), desc("d1")]);
    }

    #[test]
    fn test_push_does_not_mutate_receiver() {
        let parent = Backtrace::root().push(desc("foo"));
        let left = parent.push(desc("bar"));
        let right = parent.push(desc("baz"));

        assert_eq!(parent.descriptors(), vec![desc("foo")]);
        assert_eq!(left.descriptors(), vec![desc("bar"), desc("foo")]);
        assert_eq!(right.descriptors(), vec![desc("baz"), desc("foo")]);
        assert_eq!(left.parent(), Some(&parent));
    }

    #[test]
    fn test_descriptors_is_restartable() {
        let trace = Backtrace::root().push(desc("a")).push(desc("b"));
        assert_eq!(trace.descriptors(), trace.descriptors());
        assert_eq!(trace.iter().count(), 2);
        assert_eq!(trace.iter().count(), 2);
    }

    #[test]
    fn test_display_starts_at_root() {
        let trace = Backtrace::root()
            .push(Descriptor::new("foo", "1.2.3", "default"))
            .push(Descriptor::new("bar", "4.5", ""));
        assert_eq!(trace.to_string(), "\n    foo/1.2.3:default\n    bar/4.5\n");
    }
}
