pub mod card;
pub mod charts;
pub mod hints;
pub mod tabs;
pub mod toast;
