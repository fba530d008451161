//! Chart recommendation for each aggregate. Rendering itself happens elsewhere.

use crate::core::aggregation::{Aggregate, LabelCount, Summary};
use serde::Serialize;

pub const COLOR_YES: &str = "#22c55e";
pub const COLOR_NO: &str = "#ef4444";
pub const COLOR_ACCENT: &str = "#3b82f6";

pub const PIE_MIN_LABELS: usize = 4;
pub const CHART_MIN_HEIGHT: u32 = 300;
pub const BAR_ROW_HEIGHT: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum Presentation {
    Pie,
    /// One color per label, in label order.
    Bar { colors: Vec<&'static str> },
    HorizontalBar { height: u32 },
    /// One series per distinct matrix column.
    GroupedBar { series: Vec<String> },
    BigNumber,
    ScrollableList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    #[serde(flatten)]
    pub aggregate: Aggregate,
    pub presentation: Presentation,
}

enum Binary {
    Yes,
    No,
}

fn binary(label: &str) -> Option<Binary> {
    match label.trim().to_lowercase().as_str() {
        "sim" => Some(Binary::Yes),
        "não" | "nao" => Some(Binary::No),
        _ => None,
    }
}

fn label_color(label: &str) -> &'static str {
    match binary(label) {
        Some(Binary::Yes) => COLOR_YES,
        Some(Binary::No) => COLOR_NO,
        None => COLOR_ACCENT,
    }
}

fn frequency(counts: &[LabelCount]) -> Presentation {
    if counts.len() >= PIE_MIN_LABELS || counts.iter().all(|c| binary(&c.label).is_none()) {
        return Presentation::Pie;
    }
    Presentation::Bar {
        colors: counts.iter().map(|c| label_color(&c.label)).collect(),
    }
}

pub fn select(summary: &Summary) -> Presentation {
    match summary {
        Summary::Frequency(counts) => frequency(counts),
        Summary::Locality(counts) => Presentation::HorizontalBar {
            height: CHART_MIN_HEIGHT.max(BAR_ROW_HEIGHT.saturating_mul(counts.len() as u32)),
        },
        Summary::CrossTab(tab) => Presentation::GroupedBar { series: tab.columns.clone() },
        Summary::Statistic(_) => Presentation::BigNumber,
        Summary::Texts(_) => Presentation::ScrollableList,
    }
}

pub fn annotate(aggregates: Vec<Aggregate>) -> Vec<ReportItem> {
    aggregates
        .into_iter()
        .map(|aggregate| ReportItem {
            presentation: select(&aggregate.summary),
            aggregate,
        })
        .collect()
}
