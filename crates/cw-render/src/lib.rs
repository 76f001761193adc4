pub mod hit;
pub mod paint;
pub mod surface;
pub mod wrap;

pub use hit::{hit_test_connect_handle, hit_test_connector, hit_test_handle, hit_test_node};
pub use paint::{Mode, RenderState, render_scene};
pub use surface::{DrawOp, LineCap, RecordingSurface, Surface, TextAlign, TextBaseline};
pub use wrap::wrap_words;
