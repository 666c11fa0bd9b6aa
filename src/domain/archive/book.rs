//! Book on the members' reading list.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{check_length, require_text, BookId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub details: Option<String>,
    pub purchase_url: Option<String>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: Option<String>,
        details: Option<String>,
        purchase_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        require_text("title", &title, 500)?;
        if let Some(author) = &author {
            check_length("author", author, 100)?;
        }
        if let Some(details) = &details {
            check_length("details", details, 1000)?;
        }
        if let Some(url) = &purchase_url {
            check_length("purchase_url", url, 200)?;
        }

        Ok(Self {
            id: BookId::new(),
            title,
            author,
            details,
            purchase_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounded_fields() {
        let book = Book::new("Refactoring", Some("Martin Fowler".into()), None, None).unwrap();
        assert_eq!(book.title, "Refactoring");
    }

    #[test]
    fn rejects_long_author() {
        let result = Book::new("t", Some("a".repeat(101)), None, None);
        assert_eq!(result, Err(ValidationError::too_long("author", 100)));
    }

    #[test]
    fn rejects_long_details() {
        assert!(Book::new("t", None, Some("d".repeat(1001)), None).is_err());
    }
}
