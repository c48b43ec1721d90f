//! Book database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Book;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[sea_orm(unique)]
    pub isbn: String,
    pub publisher: String,
    pub year: i32,
    pub total_count: i32,
    pub available_count: i32,
    pub is_available: bool,
    pub category: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Book {
            id: model.id,
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            publisher: model.publisher,
            year: model.year,
            total_count: model.total_count,
            available_count: model.available_count,
            is_available: model.is_available,
            category: model.category,
        }
    }
}

/// Build an insertable row from a domain entity
impl From<&Book> for ActiveModel {
    fn from(book: &Book) -> Self {
        ActiveModel {
            id: Set(book.id),
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            isbn: Set(book.isbn.clone()),
            publisher: Set(book.publisher.clone()),
            year: Set(book.year),
            total_count: Set(book.total_count),
            available_count: Set(book.available_count),
            is_available: Set(book.is_available),
            category: Set(book.category.clone()),
        }
    }
}
