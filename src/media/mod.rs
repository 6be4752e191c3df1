pub mod item;
pub mod record;
