//! Descriptive statistics table.

use agro_data::stats::DescriptiveStats;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct StatsTableProps {
    /// One column per named series
    pub columns: Vec<(String, DescriptiveStats)>,
    #[props(default = 2)]
    pub decimals: usize,
}

#[component]
pub fn StatsTable(props: StatsTableProps) -> Element {
    let rendered: Vec<Vec<(&'static str, String)>> = props
        .columns
        .iter()
        .map(|(_, stats)| stats.table_rows(props.decimals))
        .collect();
    let labels: Vec<&'static str> = rendered
        .first()
        .map(|rows| rows.iter().map(|(label, _)| *label).collect())
        .unwrap_or_default();

    rsx! {
        table {
            style: "border-collapse: collapse; font-size: 13px; margin-bottom: 16px;",
            thead {
                tr {
                    th { style: "text-align: left; padding: 4px 12px; border-bottom: 2px solid #BDBDBD;", "" }
                    for (name, _) in props.columns.iter() {
                        th { style: "text-align: right; padding: 4px 12px; border-bottom: 2px solid #BDBDBD;", "{name}" }
                    }
                }
            }
            tbody {
                for (i, label) in labels.iter().enumerate() {
                    tr {
                        td { style: "padding: 4px 12px; border-bottom: 1px solid #EEE; font-weight: bold;", "{label}" }
                        for rows in rendered.iter() {
                            td {
                                style: "text-align: right; padding: 4px 12px; border-bottom: 1px solid #EEE;",
                                {rows[i].1.clone()}
                            }
                        }
                    }
                }
            }
        }
    }
}
