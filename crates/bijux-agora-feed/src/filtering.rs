// SPDX-License-Identifier: Apache-2.0

use bijux_agora_model::{FromFilter, GroupAuthor, Post, Vote};

/// Votes the `from` filter lets through. Author mode matches the group
/// author's voter addresses; tier modes compare the vote's own power.
#[must_use]
pub fn filter_votes(votes: &[Vote], from: FromFilter, author: &GroupAuthor) -> Vec<Vote> {
    votes
        .iter()
        .filter(|vote| match from {
            FromFilter::All => true,
            FromFilter::Author => author.owns_voter(&vote.voter_address),
            tier => tier
                .min_voting_power()
                .map_or(true, |min| vote.voting_power >= min),
        })
        .cloned()
        .collect()
}

/// Live posts the `from` filter lets through. Tier modes compare the
/// author's resolved voting power; posts by unresolved authors only pass
/// the `all` filter.
#[must_use]
pub fn filter_posts(posts: &[Post], from: FromFilter, author: &GroupAuthor) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| !post.deleted)
        .filter(|post| match from {
            FromFilter::All => true,
            FromFilter::Author => author.owns_username(&post.author_username),
            tier => match (tier.min_voting_power(), post.author_voting_power) {
                (None, _) => true,
                (Some(min), Some(power)) => power >= min,
                (Some(_), None) => false,
            },
        })
        .cloned()
        .collect()
}

#[must_use]
pub fn live_post_count(posts: &[Post]) -> usize {
    posts.iter().filter(|post| !post.deleted).count()
}
