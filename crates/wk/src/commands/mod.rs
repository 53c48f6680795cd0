//! CLI command implementations.

pub(crate) mod languages;
pub(crate) mod render;

pub(crate) use languages::LanguagesArgs;
pub(crate) use render::RenderArgs;
