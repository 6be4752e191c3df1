pub mod marker;
pub mod popup;
pub mod view;
