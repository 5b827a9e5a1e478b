pub mod positions;

pub use positions::fetch_train_positions;
