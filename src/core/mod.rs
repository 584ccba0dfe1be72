pub mod controller;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;

pub use controller::{Button, Controller};
pub use frame::{FpsCounter, Frame, FrameClock};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
