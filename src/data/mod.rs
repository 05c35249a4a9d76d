pub mod store;
pub mod track;
pub mod validate;

pub use store::{load_store, renumber_positions, save_store, TrackStore};
pub use track::{ArtianMode, Element, Outcome, ResultEntry, Track, WeaponType};
