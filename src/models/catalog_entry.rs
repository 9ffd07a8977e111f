//! Composite catalog entry: one author with one book and one prize

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::NewAuthor, book::NewBook, prize::NewPrize};

/// Form submitted to create an author together with a book and a prize.
///
/// Image and description fields are optional, everything else is required.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCatalogEntry {
    #[validate(length(min = 1, message = "Author name is required"))]
    pub author_name: String,
    #[validate(length(min = 1, message = "Author birth date is required"))]
    pub author_birth_date: String,
    pub author_image: String,
    pub author_description: String,
    #[validate(length(min = 1, message = "Book name is required"))]
    pub book_name: String,
    #[validate(length(min = 1, message = "Book publishing date is required"))]
    pub book_publishing_date: String,
    pub book_image: String,
    pub book_description: String,
    #[validate(length(min = 1, message = "Prize name is required"))]
    pub prize_name: String,
    #[validate(length(min = 1, message = "Prize premiation date is required"))]
    pub prize_premiation_date: String,
}

impl NewCatalogEntry {
    pub fn trimmed(self) -> Self {
        let t = |s: String| s.trim().to_string();
        Self {
            author_name: t(self.author_name),
            author_birth_date: t(self.author_birth_date),
            author_image: t(self.author_image),
            author_description: t(self.author_description),
            book_name: t(self.book_name),
            book_publishing_date: t(self.book_publishing_date),
            book_image: t(self.book_image),
            book_description: t(self.book_description),
            prize_name: t(self.prize_name),
            prize_premiation_date: t(self.prize_premiation_date),
        }
    }

    /// Split the form into the three payloads sent to the catalog
    pub fn into_parts(self) -> (NewAuthor, NewBook, NewPrize) {
        (
            NewAuthor {
                name: self.author_name,
                birth_date: self.author_birth_date,
                image: self.author_image,
                description: self.author_description,
            },
            NewBook {
                name: self.book_name,
                publishing_date: self.book_publishing_date,
                image: self.book_image,
                description: self.book_description,
            },
            NewPrize {
                name: self.prize_name,
                premiation_date: self.prize_premiation_date,
            },
        )
    }
}
