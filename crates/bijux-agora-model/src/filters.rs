// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Which activity stream a feed shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum FeedFilter {
    #[default]
    All,
    Votes,
    Comments,
}

impl FeedFilter {
    #[must_use]
    pub const fn includes_votes(self) -> bool {
        matches!(self, Self::All | Self::Votes)
    }

    #[must_use]
    pub const fn includes_comments(self) -> bool {
        matches!(self, Self::All | Self::Comments)
    }
}

/// Whose activity a feed shows: everyone, the group author, or actors at or
/// above a voting-power tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum FromFilter {
    #[default]
    All,
    Author,
    Ten,
    Hundred,
    Thousand,
    TenThousand,
    HundredThousand,
    Million,
}

impl FromFilter {
    #[must_use]
    pub const fn min_voting_power(self) -> Option<f64> {
        match self {
            Self::All | Self::Author => None,
            Self::Ten => Some(10.0),
            Self::Hundred => Some(100.0),
            Self::Thousand => Some(1_000.0),
            Self::TenThousand => Some(10_000.0),
            Self::HundredThousand => Some(100_000.0),
            Self::Million => Some(1_000_000.0),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Author => "author",
            Self::Ten => "ten",
            Self::Hundred => "hundred",
            Self::Thousand => "thousand",
            Self::TenThousand => "ten-thousand",
            Self::HundredThousand => "hundred-thousand",
            Self::Million => "million",
        }
    }
}
