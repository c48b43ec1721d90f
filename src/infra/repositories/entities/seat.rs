//! Seat database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Seat;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "seats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub seat_number: String,
    pub status: String,
    pub current_user_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity; fails on a corrupted status.
impl TryFrom<Model> for Seat {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Seat {
            id: model.id,
            seat_number: model.seat_number,
            status: model.status.parse()?,
            current_user_id: model.current_user_id,
        })
    }
}

/// Build an insertable row from a domain entity
impl From<&Seat> for ActiveModel {
    fn from(seat: &Seat) -> Self {
        ActiveModel {
            id: Set(seat.id),
            seat_number: Set(seat.seat_number.clone()),
            status: Set(seat.status.to_string()),
            current_user_id: Set(seat.current_user_id),
        }
    }
}
