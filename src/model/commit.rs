use gix_hash::ObjectId;

/// Minimal commit record parsed from a single history-scan line.
///
/// Holds only the fields extractable from the line itself, without a
/// follow-up object lookup. Constructed by the untargeted scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCommit {
    pub id: ObjectId,
    pub timestamp: i64,
    pub message: String,
}

/// The commit displayed next to an entry in a file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
    pub id: ObjectId,
    pub timestamp: i64,
    pub message: String,
}

impl From<PartialCommit> for LastCommit {
    fn from(c: PartialCommit) -> Self {
        Self {
            id: c.id,
            timestamp: c.timestamp,
            message: c.message,
        }
    }
}
