//=========================================================================
// Input
//=========================================================================
//
// Engine-level pointer events. The platform layer produces them; the
// Controller consumes them.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{InputEvent, MouseButton};
