//! Dashboard application state.

use crate::kpi::KpiReport;
use crate::report::{DailyEnergy, ForecastPoint, MonthlyProfile, YearlyCapacity};

/// Default number of daily points shown in the mix chart.
const DEFAULT_WINDOW: usize = 180;

/// Smallest zoom level in daily points.
const MIN_WINDOW: usize = 30;

/// Scroll step in points.
const SCROLL_STEP: usize = 7;

/// Active dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Mix,
    Capacity,
    Seasonal,
    Forecast,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Mix, Tab::Capacity, Tab::Seasonal, Tab::Forecast];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Mix => "Generation Mix",
            Tab::Capacity => "Capacity Growth",
            Tab::Seasonal => "Seasonal Profile",
            Tab::Forecast => "Forecast",
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Mix => Tab::Capacity,
            Tab::Capacity => Tab::Seasonal,
            Tab::Seasonal => Tab::Forecast,
            Tab::Forecast => Tab::Mix,
        }
    }
}

/// Dashboard state over the precomputed analysis products.
pub struct App {
    pub kpi: KpiReport,
    pub daily: Vec<DailyEnergy>,
    pub monthly: Vec<MonthlyProfile>,
    pub capacity: Vec<YearlyCapacity>,
    pub forecast: Option<Vec<ForecastPoint>>,
    pub tab: Tab,
    /// Points hidden at the right edge of the scrollable charts.
    pub offset: usize,
    /// Visible points in the scrollable charts.
    pub window: usize,
    pub quit: bool,
}

impl App {
    pub fn new(
        kpi: KpiReport,
        daily: Vec<DailyEnergy>,
        monthly: Vec<MonthlyProfile>,
        capacity: Vec<YearlyCapacity>,
        forecast: Option<Vec<ForecastPoint>>,
    ) -> Self {
        Self {
            kpi,
            daily,
            monthly,
            capacity,
            forecast,
            tab: Tab::Mix,
            offset: 0,
            window: DEFAULT_WINDOW,
            quit: false,
        }
    }

    /// Length of the series the current tab scrolls over.
    fn scrollable_len(&self) -> usize {
        match self.tab {
            Tab::Mix => self.daily.len(),
            Tab::Forecast => self.forecast.as_ref().map_or(0, Vec::len),
            Tab::Capacity | Tab::Seasonal => 0,
        }
    }

    /// Visible slice bounds `(start, end)` for a series of length `len`.
    pub fn visible_range(&self, len: usize) -> (usize, usize) {
        let end = len.saturating_sub(self.offset);
        let start = end.saturating_sub(self.window);
        (start, end)
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.offset = 0;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.offset = 0;
        }
    }

    /// Scrolls back in time.
    pub fn scroll_left(&mut self) {
        let len = self.scrollable_len();
        let max_offset = len.saturating_sub(self.window);
        self.offset = (self.offset + SCROLL_STEP).min(max_offset);
    }

    /// Scrolls toward the present.
    pub fn scroll_right(&mut self) {
        self.offset = self.offset.saturating_sub(SCROLL_STEP);
    }

    pub fn zoom_in(&mut self) {
        self.window = (self.window / 2).max(MIN_WINDOW);
    }

    pub fn zoom_out(&mut self) {
        let len = self.scrollable_len().max(MIN_WINDOW);
        self.window = (self.window * 2).min(len);
    }
}
