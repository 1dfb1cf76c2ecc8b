pub mod board;
pub mod bookmark;
pub mod identity;
pub mod marking;
pub mod record;

pub use board::{BasicSection, Board, IssueSet, Section};
pub use bookmark::{Bookmark, NewBookmark};
pub use identity::{BoardIdentity, DataIdentity, FileIdentity, Part, SequentialBoard};
pub use record::Record;
