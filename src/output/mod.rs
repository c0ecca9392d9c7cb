pub mod formatter;

pub use formatter::{
    format_entrant_detail, format_json, format_ranked_table, format_score, format_summary,
    format_tsv, should_use_colors,
};
