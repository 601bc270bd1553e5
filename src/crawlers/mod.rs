pub mod frontier;
pub mod renderer;
pub mod webdriver;

pub use frontier::{CrawlSummary, CrawlTask, FetchFailure, Frontier, TaskState, VisitedSet};
pub use renderer::{CacheMode, PageResult, RenderOptions, Renderer};
pub use webdriver::WebDriverRenderer;
