//! SeaORM entity definitions
//!
//! Database rows, kept separate from the domain models. Conversions into
//! domain types parse the persisted status strings and can fail on
//! corrupted rows.

pub mod book;
pub mod borrow_record;
pub mod seat;
pub mod seat_reservation;
pub mod user;
