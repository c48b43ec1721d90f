//! Borrow record database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::BorrowRecord;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "borrow_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: DateTimeUtc,
    pub return_date: Option<DateTimeUtc>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity; fails on a corrupted status.
impl TryFrom<Model> for BorrowRecord {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(BorrowRecord {
            id: model.id,
            user_id: model.user_id,
            book_id: model.book_id,
            borrow_date: model.borrow_date,
            return_date: model.return_date,
            status: model.status.parse()?,
        })
    }
}

/// Build an insertable row from a domain entity
impl From<&BorrowRecord> for ActiveModel {
    fn from(record: &BorrowRecord) -> Self {
        ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            book_id: Set(record.book_id),
            borrow_date: Set(record.borrow_date),
            return_date: Set(record.return_date),
            status: Set(record.status.to_string()),
        }
    }
}
