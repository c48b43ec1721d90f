//! Seat reservation database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::SeatReservation;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "seat_reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub seat_id: Uuid,
    pub reserve_time: DateTimeUtc,
    pub check_in_time: Option<DateTimeUtc>,
    pub check_out_time: Option<DateTimeUtc>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity; fails on a corrupted status.
impl TryFrom<Model> for SeatReservation {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(SeatReservation {
            id: model.id,
            user_id: model.user_id,
            seat_id: model.seat_id,
            reserve_time: model.reserve_time,
            check_in_time: model.check_in_time,
            check_out_time: model.check_out_time,
            status: model.status.parse()?,
        })
    }
}

/// Build an insertable row from a domain entity
impl From<&SeatReservation> for ActiveModel {
    fn from(reservation: &SeatReservation) -> Self {
        ActiveModel {
            id: Set(reservation.id),
            user_id: Set(reservation.user_id),
            seat_id: Set(reservation.seat_id),
            reserve_time: Set(reservation.reserve_time),
            check_in_time: Set(reservation.check_in_time),
            check_out_time: Set(reservation.check_out_time),
            status: Set(reservation.status.to_string()),
        }
    }
}
