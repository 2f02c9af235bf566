mod chart;
pub use chart::{
    scroll_to_chart, AxisRange, ChartFrame, ChartMetric, ChartSeries, ChartState, ProgressChart,
    SeriesPoint, Selection, TrackedTest, CHART_ANCHOR, LLR_AXIS_LIMIT,
};

mod table;
pub use table::{filter_summaries, table_body, TableBody, TableRow, TestsTable, TEST_SERVER};

mod state;
pub use state::{DashboardState, RenderInstruction, Status};

pub mod loader;
pub use loader::{load_dashboard_data, LoadError};

mod status;
pub use status::StatusLine;

mod filter;
pub use filter::FilterInput;
