pub mod events;
pub mod model;
pub mod store;

pub use events::{Debounce, ListenerId, Listeners};
pub use model::{Board, Card, CardRef, Group, Rect};
pub use store::CardStore;
