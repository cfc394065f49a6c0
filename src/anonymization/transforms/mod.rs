//! Value transforms
//!
//! Pure string and date functions behind the operations of the
//! [`TransformRegistry`](crate::anonymization::registry::TransformRegistry).

pub mod date;
pub mod hash;
pub mod mask;
pub mod shuffle;

pub use date::{mask_date_text, shift_date};
pub use hash::hash_value;
pub use mask::{mask_address, mask_email, mask_phone};
pub use shuffle::{shuffle_address, shuffle_email, shuffle_phone};
