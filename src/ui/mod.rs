mod app;
pub mod components;
mod layout;
pub mod view_state;

pub use app::App;
pub use layout::{Layout, LayoutAreas};
pub use view_state::{Notification, ViewState};
