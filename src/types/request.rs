use super::rooted::RootedPath;

/// Metadata attached to a queued mutation.
#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    /// Unix permission bits applied to the target after the mutation.
    /// `None` leaves whatever the filesystem produced in place.
    pub mode: Option<u32>,
}

/// "Create or fully replace this file."
///
/// Duplicate targets are not deduplicated; if a caller enqueues two writes
/// for one path, the later one wins.
#[derive(Clone, Debug)]
pub struct WriteRequest {
    pub target: RootedPath,
    pub content: Vec<u8>,
    pub options: WriteOptions,
}

/// "Append bytes to an existing file."
///
/// The target must exist once `flush` runs; a missing target aborts the
/// whole batch.
#[derive(Clone, Debug)]
pub struct AppendRequest {
    pub target: RootedPath,
    pub suffix: Vec<u8>,
    pub options: WriteOptions,
}
