//! Video archive and reading list.

mod book;
mod video;

pub use book::Book;
pub use video::{ArchiveVideo, Question, QUESTION_TEXT_MAX, TITLE_MAX, VIDEO_URL_MAX};
