pub mod slug_helpers;
pub mod validation_helpers;
