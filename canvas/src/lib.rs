//! Canvas interaction, rendering, and layout engine for the sprite board.
//!
//! The crate owns the full editing session for a board of placed sprites:
//! translating raw pointer, wheel, and key events into mutations, keeping the
//! pan/zoom camera, hit-testing sprites, drawing the scene onto a [`surface`],
//! and moving layouts in and out as versioned JSON documents. It compiles for
//! native hosts and, with the `web` feature, for the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editing session state and event handlers ([`engine::EngineCore`]) |
//! | [`doc`] | Sprite assets, placed sprites, and the ordered sprite store |
//! | [`catalog`] | Asset lookup seam used to resolve persisted asset ids |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against placed sprites |
//! | [`surface`] | Drawing-surface trait and the software raster surface |
//! | [`render`] | Scene rendering (grid, sprites, selection chrome) |
//! | [`layout`] | Layout document export/import |
//! | [`export`] | Flattened raster export of the sprites |
//! | [`consts`] | Shared numeric constants: zoom limits, grid and chrome sizes |
//! | `web` | Browser host over `web_sys` (feature `web`) |

pub mod camera;
pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod surface;
#[cfg(feature = "web")]
pub mod web;
