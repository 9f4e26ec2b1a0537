//! dprpbuilder packages folders of Minecraft datapack and resource pack files
//! into ready-to-load packs.
//!
//! A [`PackDescriptor`](pack::PackDescriptor) collects the content files of a
//! source folder and resolves the `pack_format` for a game version. It is then
//! written out as a zip archive or as a folder next to a generated
//! `pack.mcmeta`.

#![warn(
    missing_docs,
    missing_debug_implementations,
    nonstandard_style,
    clippy::complexity,
    clippy::style,
    clippy::suspicious
)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pack;
pub mod util;
pub mod virtual_fs;

/// The most commonly used types.
pub mod prelude {
    #[doc(inline)]
    pub use crate::{
        config::{BuildConfig, PackRequest},
        error::{PackError, Result},
        pack::{AuxFiles, BuildOptions, PackDescriptor, PackType},
    };
}
