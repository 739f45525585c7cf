//! Text codecs for the two note block formats.
//!
//! Both directions are pure functions over strings. Parsing never fails: it
//! recovers whatever it can and leaves the rest absent.

pub mod creature;
pub mod initiative;
