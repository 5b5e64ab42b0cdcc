//! Deterministic UUIDv5 identifiers for batches.
//!
//! The namespace is derived from a stable tag ([`NS_TAG`]) so the id of a
//! batch is reproducible across runs for the same queued sequence, and the
//! serialization uses root-relative paths so it is independent of where the
//! project lives.

use uuid::Uuid;

use crate::constants::NS_TAG;

use super::request::{AppendRequest, WriteRequest};

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

fn serialize_append(r: &AppendRequest) -> String {
    format!("A:{}#{}", r.target.rel().display(), r.suffix.len())
}

fn serialize_write(r: &WriteRequest) -> String {
    format!("W:{}#{}", r.target.rel().display(), r.content.len())
}

/// Compute the batch id in execution order: appends first, then writes.
#[must_use]
pub fn batch_id(appends: &[AppendRequest], writes: &[WriteRequest]) -> Uuid {
    let mut s = String::new();
    for a in appends {
        s.push_str(&serialize_append(a));
        s.push('\n');
    }
    for w in writes {
        s.push_str(&serialize_write(w));
        s.push('\n');
    }
    Uuid::new_v5(&namespace(), s.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::types::request::WriteOptions;
    use crate::types::rooted::RootedPath;

    fn write(rel: &str) -> WriteRequest {
        WriteRequest {
            target: RootedPath::from_rooted(Path::new("/proj"), Path::new(rel)).unwrap(),
            content: b"x".to_vec(),
            options: WriteOptions::default(),
        }
    }

    #[test]
    fn same_sequence_same_id() {
        let a = batch_id(&[], &[write("a.txt"), write("b.txt")]);
        let b = batch_id(&[], &[write("a.txt"), write("b.txt")]);
        assert_eq!(a, b);
    }

    #[test]
    fn order_changes_the_id() {
        let a = batch_id(&[], &[write("a.txt"), write("b.txt")]);
        let b = batch_id(&[], &[write("b.txt"), write("a.txt")]);
        assert_ne!(a, b);
    }

    #[test]
    fn id_is_root_independent() {
        let other = WriteRequest {
            target: RootedPath::from_rooted(Path::new("/elsewhere"), Path::new("a.txt")).unwrap(),
            content: b"x".to_vec(),
            options: WriteOptions::default(),
        };
        assert_eq!(batch_id(&[], &[write("a.txt")]), batch_id(&[], &[other]));
    }
}
