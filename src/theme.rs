//! The light and dark palettes used to render the analysis.
//!
//! The theme only changes colours and classes. It is never consulted when
//! records are filtered or totalled.

/// The colour scheme the user picked on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl From<bool> for Theme {
    fn from(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }
}

/// Colours and tailwind classes for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// The ECharts theme name passed to `echarts.init`.
    pub echarts_theme: &'static str,
    /// Colour of the legend and chart labels.
    pub chart_text: &'static str,
    pub tooltip_background: &'static str,
    pub tooltip_border: &'static str,
    /// Classes for the section that wraps the chart and the lists.
    pub panel_class: &'static str,
    pub income_heading_class: &'static str,
    pub expense_heading_class: &'static str,
    pub list_item_class: &'static str,
    /// Classes for the period button that is not selected.
    pub inactive_button_class: &'static str,
}

const LIGHT_PALETTE: Palette = Palette {
    echarts_theme: "default",
    chart_text: "#333333",
    tooltip_background: "#ffffff",
    tooltip_border: "#dddddd",
    panel_class: "bg-indigo-50 text-gray-800 border border-indigo-100",
    income_heading_class: "text-green-700",
    expense_heading_class: "text-red-700",
    list_item_class: "bg-gray-100 text-gray-900",
    inactive_button_class: "bg-gray-200 text-gray-800 hover:bg-gray-300",
};

const DARK_PALETTE: Palette = Palette {
    echarts_theme: "dark",
    chart_text: "#ffffff",
    tooltip_background: "#1e1e1e",
    tooltip_border: "#555555",
    panel_class: "bg-gray-800 text-white border border-gray-700",
    income_heading_class: "text-green-400",
    expense_heading_class: "text-red-400",
    list_item_class: "bg-white/10 text-white",
    inactive_button_class: "bg-white/20 text-white hover:bg-white/30",
};

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT_PALETTE,
            Theme::Dark => &DARK_PALETTE,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}
