//! `SeaORM` entity definitions.

pub mod images;
pub mod pets;

pub mod prelude {
    //! Entity re-exports.
    pub use super::images::Entity as Images;
    pub use super::pets::Entity as Pets;
}
