mod detail_popup;
mod indicator_bar;
mod status_bar;
mod tooltip_panel;

pub use detail_popup::DetailPopup;
pub use indicator_bar::IndicatorBar;
pub use status_bar::StatusBar;
pub use tooltip_panel::{markdown_lines, TooltipPanel};
