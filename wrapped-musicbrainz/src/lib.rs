//! A barebones blocking client for the MusicBrainz release search and the Cover Art Archive.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod release;
pub use release::*;

mod search;
pub use search::*;

mod cover_art;

mod request;
