//! Relative abundance ranking.

mod ranker;
mod view;

pub use ranker::{rank_abundance, RankOptions};
pub use view::{RankedTaxon, RankedView};

pub(crate) use view::round_to;
