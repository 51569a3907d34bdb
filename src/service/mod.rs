pub mod clock;
pub mod lifecycle;
pub mod reconcile;
pub mod store;
